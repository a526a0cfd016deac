//! shipyard tags コマンドハンドラ

use colored::Colorize;
use shipyard_config::Settings;
use shipyard_registry::RegistryClient;

/// レジストリに公開済みのタグを1行ずつ表示
pub async fn handle(settings: &Settings, image: &str) -> anyhow::Result<()> {
    let client = RegistryClient::new(settings.auth_url.clone(), settings.query_url.clone());

    match client.list_tags(image).await? {
        Some(tags) => {
            for tag in tags {
                println!("{}", tag);
            }
        }
        None => println!("{}", "(no tags)".dimmed()),
    }

    Ok(())
}
