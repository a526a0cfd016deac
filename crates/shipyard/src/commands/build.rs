//! shipyard build コマンドハンドラ

use crate::docker;
use colored::Colorize;
use shipyard_build::{BuildEvent, BuildOrchestrator, parse_build_args};
use std::path::Path;

/// Dockerfileを1つビルドし、ログを逐次表示
pub async fn handle(dockerfile: &Path, build_args: &str) -> anyhow::Result<()> {
    // 引数の誤りはDocker接続より前に報告する
    if let Err(e) = parse_build_args(build_args) {
        eprintln!("{} {}", "✗".red().bold(), e.user_message());
        return Err(anyhow::anyhow!("ビルド引数が不正です"));
    }

    println!(
        "Building Image from {} with build args {}.",
        dockerfile.display().to_string().cyan(),
        build_args.cyan()
    );

    let engine = docker::init_engine_with_error_handling().await?;
    let orchestrator = BuildOrchestrator::new(engine);

    let outcome = orchestrator
        .build_one(dockerfile, build_args, |event| {
            if let BuildEvent::Log(_, line) = event {
                println!("{}", line);
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if let Some(error) = &outcome.error_message {
        eprintln!("{} Error building Dockerfile:", "✗".red().bold());
        eprintln!("  {}", error);
        return Err(anyhow::anyhow!("ビルドに失敗しました"));
    }

    println!(
        "{} {}",
        "✓ ビルド完了:".green().bold(),
        outcome.entry.version().cyan()
    );
    Ok(())
}
