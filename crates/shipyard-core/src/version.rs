//! バージョン解決
//!
//! Dockerfile から数階層上にある version ファイルを読み、イメージタグを決定します。

use crate::model::DEFAULT_VERSION;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// version ファイルのデフォルト名
pub const DEFAULT_VERSION_FILE: &str = "version";

/// Dockerfile から version ファイルのディレクトリまでの階層数
pub const DEFAULT_VERSION_LEVELS: usize = 2;

/// version ファイルからバージョンタグを解決する
///
/// `levels` は Dockerfile のパスから数えた祖先の段数。
/// `root/a/img/Dockerfile` で `levels = 2` の場合、`root/a/version` を参照する。
#[derive(Debug, Clone)]
pub struct VersionResolver {
    file_name: String,
    levels: usize,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_FILE, DEFAULT_VERSION_LEVELS)
    }
}

impl VersionResolver {
    pub fn new(file_name: impl Into<String>, levels: usize) -> Self {
        Self {
            file_name: file_name.into(),
            levels,
        }
    }

    /// Dockerfile に対応する version ファイルのパス
    ///
    /// ツリーが浅すぎて祖先が無い場合は None
    pub fn marker_path(&self, definition: &Path) -> Option<PathBuf> {
        definition
            .ancestors()
            .nth(self.levels)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(&self.file_name))
    }

    /// バージョンを解決
    ///
    /// 失敗しない。ファイルが無い・読めない・空の場合は "latest"。
    pub fn resolve(&self, definition: &Path) -> String {
        let Some(marker) = self.marker_path(definition) else {
            debug!(
                dockerfile = %definition.display(),
                levels = self.levels,
                "Tree too shallow for version file, using latest"
            );
            return DEFAULT_VERSION.to_string();
        };

        if !marker.is_file() {
            return DEFAULT_VERSION.to_string();
        }

        match std::fs::read_to_string(&marker) {
            Ok(content) => {
                let version = content.trim_end();
                if version.is_empty() {
                    warn!(marker = %marker.display(), "Version file is empty, using latest");
                    DEFAULT_VERSION.to_string()
                } else {
                    debug!(marker = %marker.display(), version, "Resolved version");
                    version.to_string()
                }
            }
            Err(e) => {
                // 読み込み中に削除された場合なども latest で続行
                warn!(marker = %marker.display(), error = %e, "Failed to read version file, using latest");
                DEFAULT_VERSION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_from_marker_two_levels_up() {
        let temp_dir = tempdir().unwrap();
        let img_dir = temp_dir.path().join("a/img");
        fs::create_dir_all(&img_dir).unwrap();
        fs::write(img_dir.join("Dockerfile"), "FROM alpine").unwrap();
        fs::write(temp_dir.path().join("a/version"), "2.1\n").unwrap();

        let resolver = VersionResolver::default();
        assert_eq!(resolver.resolve(&img_dir.join("Dockerfile")), "2.1");
    }

    #[test]
    fn test_resolve_strips_trailing_whitespace_only() {
        let temp_dir = tempdir().unwrap();
        let img_dir = temp_dir.path().join("a/img");
        fs::create_dir_all(&img_dir).unwrap();
        fs::write(temp_dir.path().join("a/version"), "  1.0.3 \r\n\n").unwrap();

        let resolver = VersionResolver::default();
        assert_eq!(resolver.resolve(&img_dir.join("Dockerfile")), "  1.0.3");
    }

    #[test]
    fn test_resolve_without_marker() {
        let temp_dir = tempdir().unwrap();
        let img_dir = temp_dir.path().join("a/img");
        fs::create_dir_all(&img_dir).unwrap();

        let resolver = VersionResolver::default();
        assert_eq!(resolver.resolve(&img_dir.join("Dockerfile")), "latest");
    }

    #[test]
    fn test_marker_next_to_dockerfile_is_ignored() {
        let temp_dir = tempdir().unwrap();
        let img_dir = temp_dir.path().join("a/img");
        fs::create_dir_all(&img_dir).unwrap();
        fs::write(img_dir.join("version"), "9.9").unwrap();

        let resolver = VersionResolver::default();
        assert_eq!(resolver.resolve(&img_dir.join("Dockerfile")), "latest");
    }

    #[test]
    fn test_empty_marker_falls_back_to_latest() {
        let temp_dir = tempdir().unwrap();
        let img_dir = temp_dir.path().join("a/img");
        fs::create_dir_all(&img_dir).unwrap();
        fs::write(temp_dir.path().join("a/version"), "\n  \n").unwrap();

        let resolver = VersionResolver::default();
        assert_eq!(resolver.resolve(&img_dir.join("Dockerfile")), "latest");
    }

    #[test]
    fn test_marker_directory_is_not_a_version() {
        let temp_dir = tempdir().unwrap();
        let img_dir = temp_dir.path().join("a/img");
        fs::create_dir_all(&img_dir).unwrap();
        fs::create_dir_all(temp_dir.path().join("a/version")).unwrap();

        let resolver = VersionResolver::default();
        assert_eq!(resolver.resolve(&img_dir.join("Dockerfile")), "latest");
    }

    #[test]
    fn test_shallow_path_falls_back_to_latest() {
        let resolver = VersionResolver::default();
        assert_eq!(resolver.marker_path(Path::new("Dockerfile")), None);
        assert_eq!(resolver.resolve(Path::new("Dockerfile")), "latest");
    }

    #[test]
    fn test_custom_levels_and_file_name() {
        let temp_dir = tempdir().unwrap();
        let img_dir = temp_dir.path().join("img");
        fs::create_dir_all(&img_dir).unwrap();
        fs::write(img_dir.join("VERSION.txt"), "3.0").unwrap();

        let resolver = VersionResolver::new("VERSION.txt", 1);
        assert_eq!(
            resolver.marker_path(&img_dir.join("Dockerfile")),
            Some(img_dir.join("VERSION.txt"))
        );
        assert_eq!(resolver.resolve(&img_dir.join("Dockerfile")), "3.0");
    }
}
