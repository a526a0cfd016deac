//! shipyard discover コマンドハンドラ

use crate::utils;
use shipyard_config::Settings;
use std::path::PathBuf;

/// ビルドプランをJSONで標準出力に表示
pub fn handle(settings: &Settings, root: Option<PathBuf>) -> anyhow::Result<()> {
    let root = utils::resolve_root(root, settings);
    let plan = utils::discovery_from(settings).discover(&root)?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
