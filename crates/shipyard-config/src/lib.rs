pub mod error;

pub use error::*;

use serde::Deserialize;
use shipyard_core::{
    DEFAULT_AUTH_URL, DEFAULT_DEFINITION_FILE, DEFAULT_QUERY_URL, DEFAULT_VERSION_FILE,
    DEFAULT_VERSION_LEVELS,
};
use std::path::{Path, PathBuf};

/// 設定ファイルのパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "SHIPYARD_CONFIG_PATH";

/// Dockerfile 探索ルートを上書きする環境変数
pub const ROOT_ENV: &str = "SHIPYARD_ROOT";

/// トークンサービスの URL を上書きする環境変数
pub const AUTH_URL_ENV: &str = "SHIPYARD_AUTH_URL";

/// レジストリ API の URL を上書きする環境変数
pub const QUERY_URL_ENV: &str = "SHIPYARD_QUERY_URL";

/// Dockerfile 探索ルートのデフォルト
pub const DEFAULT_ROOT: &str = "dockerfiles";

/// Shipyard の設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dockerfile を探すルートディレクトリ
    pub root: PathBuf,
    /// ビルド定義のファイル名
    pub definition_file: String,
    /// バージョンファイル名
    pub version_file: String,
    /// Dockerfile から version ファイルまでの階層数
    pub version_levels: usize,
    pub auth_url: String,
    pub query_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            definition_file: DEFAULT_DEFINITION_FILE.to_string(),
            version_file: DEFAULT_VERSION_FILE.to_string(),
            version_levels: DEFAULT_VERSION_LEVELS,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            query_url: DEFAULT_QUERY_URL.to_string(),
        }
    }
}

impl Settings {
    /// YAML ファイルから読み込み（書かれていない項目はデフォルト値）
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 環境変数で上書き
    pub fn apply_env(&mut self) {
        if let Ok(root) = std::env::var(ROOT_ENV) {
            self.root = PathBuf::from(root);
        }
        if let Ok(auth_url) = std::env::var(AUTH_URL_ENV) {
            self.auth_url = auth_url;
        }
        if let Ok(query_url) = std::env::var(QUERY_URL_ENV) {
            self.query_url = query_url;
        }
    }
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 SHIPYARD_CONFIG_PATH（指定されたファイルが無ければエラー）
/// 2. ~/.config/shipyard/config.yaml（存在する場合のみ）
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.is_file() {
            return Ok(Some(path));
        }
        return Err(ConfigError::ConfigFileNotFound(path));
    }

    Ok(dirs::config_dir()
        .map(|dir| dir.join("shipyard").join("config.yaml"))
        .filter(|path| path.is_file()))
}

/// 設定を読み込む（デフォルト → 設定ファイル → 環境変数）
pub fn load_settings() -> Result<Settings> {
    let mut settings = match find_config_file()? {
        Some(path) => {
            tracing::debug!(config = %path.display(), "Loading settings file");
            Settings::from_file(&path)?
        }
        None => Settings::default(),
    };

    settings.apply_env();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const ALL_ENV: [&str; 4] = [CONFIG_PATH_ENV, ROOT_ENV, AUTH_URL_ENV, QUERY_URL_ENV];

    fn without_env<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars(ALL_ENV.map(|k| (k, None::<&str>)), f)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.root, PathBuf::from("dockerfiles"));
        assert_eq!(settings.definition_file, "Dockerfile");
        assert_eq!(settings.version_file, "version");
        assert_eq!(settings.version_levels, 2);
        assert_eq!(settings.auth_url, "https://auth.docker.io");
        assert_eq!(settings.query_url, "https://index.docker.io");
    }

    #[test]
    fn test_from_file_partial() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "root: images\nversion_levels: 1\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();

        assert_eq!(settings.root, PathBuf::from("images"));
        assert_eq!(settings.version_levels, 1);
        assert_eq!(settings.definition_file, "Dockerfile");
    }

    #[test]
    fn test_from_file_invalid_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "version_levels: [not, a, number]\n").unwrap();

        let result = Settings::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    #[serial]
    fn test_load_settings_from_env_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.yaml");
        fs::write(&path, "auth_url: http://localhost:5001\n").unwrap();

        let settings = without_env(|| {
            temp_env::with_var(CONFIG_PATH_ENV, Some(path.as_os_str()), || {
                load_settings().unwrap()
            })
        });

        assert_eq!(settings.auth_url, "http://localhost:5001");
        assert_eq!(settings.query_url, "https://index.docker.io");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "root: from-file\nquery_url: http://file\n").unwrap();

        let settings = without_env(|| {
            temp_env::with_vars(
                [
                    (CONFIG_PATH_ENV, Some(path.to_str().unwrap())),
                    (ROOT_ENV, Some("from-env")),
                    (QUERY_URL_ENV, Some("http://env")),
                ],
                || load_settings().unwrap(),
            )
        });

        assert_eq!(settings.root, PathBuf::from("from-env"));
        assert_eq!(settings.query_url, "http://env");
    }

    #[test]
    #[serial]
    fn test_missing_env_config_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.yaml");

        let result = without_env(|| {
            temp_env::with_var(CONFIG_PATH_ENV, Some(missing.as_os_str()), load_settings)
        });

        assert!(matches!(result, Err(ConfigError::ConfigFileNotFound(_))));
    }
}
