//! Dockerfile 自動発見機能
//!
//! ルートディレクトリ以下を再帰的に走査し、Dockerfile ごとにバージョンを解決して
//! ビルドプランを組み立てます。
//!
//! 並び順はファイルシステムの列挙順のままで、ソートしません。
//! シンボリックリンクのディレクトリは辿りますが、正規化済みパスで訪問済みを記録して
//! ループを防ぎます。ファイル自体のシンボリックリンクで同じ Dockerfile が
//! 複数の場所から見える場合は重複してプランに載ります（重複排除はしない）。

use crate::error::{CoreError, Result};
use crate::model::{BuildPlan, BuildPlanEntry};
use crate::version::VersionResolver;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// ビルド定義ファイルのデフォルト名
pub const DEFAULT_DEFINITION_FILE: &str = "Dockerfile";

/// Dockerfile を発見してビルドプランを作る
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    definition_file: String,
    resolver: VersionResolver,
}

impl Default for ConfigDiscovery {
    fn default() -> Self {
        Self::new(DEFAULT_DEFINITION_FILE, VersionResolver::default())
    }
}

impl ConfigDiscovery {
    pub fn new(definition_file: impl Into<String>, resolver: VersionResolver) -> Self {
        Self {
            definition_file: definition_file.into(),
            resolver,
        }
    }

    /// ルートディレクトリ以下のビルドプランを作成
    ///
    /// ルートが存在しない場合は空のプラン。
    /// ルートが存在するのに読めない場合のみエラーになる。
    #[tracing::instrument(skip(self, root), fields(root = %root.display()))]
    pub fn discover(&self, root: &Path) -> Result<BuildPlan> {
        let mut plan = BuildPlan::new();

        if !root.is_dir() {
            debug!("Root directory does not exist, returning empty plan");
            return Ok(plan);
        }

        let canonical_root = root.canonicalize().map_err(|e| CoreError::DiscoveryError {
            path: root.to_path_buf(),
            message: format!("パスの正規化に失敗: {}", e),
        })?;
        let entries = std::fs::read_dir(root).map_err(|e| CoreError::DiscoveryError {
            path: root.to_path_buf(),
            message: format!("ディレクトリの読み込みに失敗: {}", e),
        })?;

        let mut visited = HashSet::new();
        visited.insert(canonical_root);

        for entry in entries {
            match entry {
                Ok(entry) => self.visit_path(&entry.path(), &mut plan, &mut visited),
                Err(e) => warn!(dir = %root.display(), error = %e, "Failed to read directory entry"),
            }
        }

        info!(definition_count = plan.len(), "Discovered build definitions");
        Ok(plan)
    }

    /// ディレクトリを再帰的に走査
    ///
    /// ルート以下の読めないディレクトリは警告を出してスキップする。
    fn visit_dir(&self, dir: &Path, plan: &mut BuildPlan, visited: &mut HashSet<PathBuf>) {
        let canonical_dir = match dir.canonicalize() {
            Ok(path) => path,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to canonicalize directory, skipping");
                return;
            }
        };

        // ループ検出: 既に訪問済みなら終了
        if !visited.insert(canonical_dir.clone()) {
            debug!(dir = %canonical_dir.display(), "Directory already visited, skipping");
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to read directory, skipping");
                return;
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) => self.visit_path(&entry.path(), plan, visited),
                Err(e) => warn!(dir = %dir.display(), error = %e, "Failed to read directory entry"),
            }
        }
    }

    fn visit_path(&self, path: &Path, plan: &mut BuildPlan, visited: &mut HashSet<PathBuf>) {
        if path.is_dir() {
            self.visit_dir(path, plan, visited);
        } else if path.file_name().and_then(|s| s.to_str()) == Some(self.definition_file.as_str())
            && path.is_file()
        {
            let location = absolute_location(path);
            let version = self.resolver.resolve(&location);
            debug!(dockerfile = %location.display(), version = %version, "Found build definition");
            plan.push(BuildPlanEntry::new(location, version));
        }
    }
}

/// デフォルト設定（Dockerfile / 2階層上の version）でビルドプランを作成
pub fn discover_build_plan(root: &Path) -> Result<BuildPlan> {
    ConfigDiscovery::default().discover(root)
}

/// 正規化した絶対パス（正規化できない場合はカレントディレクトリ基準の絶対パス）
fn absolute_location(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
