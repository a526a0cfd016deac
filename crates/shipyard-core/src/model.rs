//! ビルドプランのデータモデル

use serde::Serialize;
use std::path::{Path, PathBuf};

/// version ファイルが無い場合のタグ
pub const DEFAULT_VERSION: &str = "latest";

/// ビルドプランの1エントリ（Dockerfile とそのバージョン）
///
/// JSON では `{"Dockerfile": "...", "version": "..."}` の形で出力される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlanEntry {
    /// Dockerfile の絶対パス
    #[serde(rename = "Dockerfile")]
    location: PathBuf,

    /// イメージのバージョンタグ
    version: String,
}

impl BuildPlanEntry {
    pub fn new(location: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            version: version.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// ビルドコンテキスト（Dockerfile の親ディレクトリ）
    pub fn context_dir(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// ディレクトリ走査順に並んだビルドプラン
pub type BuildPlan = Vec<BuildPlanEntry>;
