use shipyard_config::Settings;
use shipyard_core::{ConfigDiscovery, VersionResolver};
use std::path::PathBuf;

/// 設定からDockerfile探索器を作る
pub fn discovery_from(settings: &Settings) -> ConfigDiscovery {
    ConfigDiscovery::new(
        settings.definition_file.clone(),
        VersionResolver::new(settings.version_file.clone(), settings.version_levels),
    )
}

/// 探索ルートを決定する（CLI引数 > 設定）
pub fn resolve_root(cli_root: Option<PathBuf>, settings: &Settings) -> PathBuf {
    cli_root.unwrap_or_else(|| settings.root.clone())
}
