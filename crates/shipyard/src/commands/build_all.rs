//! shipyard build-all コマンドハンドラ

use crate::{docker, utils};
use colored::Colorize;
use shipyard_build::{BuildOrchestrator, BuildProgress};
use shipyard_config::Settings;
use std::path::PathBuf;

/// 見つかったDockerfileをすべてビルド
///
/// 失敗したビルドがあっても残りは続行し、最後にまとめて報告する。
pub async fn handle(settings: &Settings, root: Option<PathBuf>) -> anyhow::Result<()> {
    let root = utils::resolve_root(root, settings);
    let plan = utils::discovery_from(settings).discover(&root)?;

    if plan.is_empty() {
        println!(
            "{}",
            format!("ビルド対象のDockerfileがありません: {}", root.display()).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("ビルド対象 ({} 個):", plan.len()).bold()
    );
    for entry in &plan {
        println!(
            "  • {} ({})",
            entry.location().display().to_string().cyan(),
            entry.version()
        );
    }
    println!();

    let engine = docker::init_engine_with_error_handling().await?;
    let orchestrator = BuildOrchestrator::new(engine);

    let mut progress = BuildProgress::new(plan.len());
    let outcomes = orchestrator.run(&plan, |event| progress.handle(event)).await;
    progress.finish("完了");

    // 結果サマリー
    println!();
    println!("{}", "結果サマリー:".bold());
    for outcome in &outcomes {
        let location = outcome.entry.location().display().to_string();
        if outcome.success {
            println!("  {} {}: {}", "✓".green(), location, outcome.entry.version().cyan());
        } else {
            println!(
                "  {} {}: {}",
                "✗".red().bold(),
                location,
                outcome.error_message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let failed = outcomes.iter().filter(|o| !o.success).count();
    if failed > 0 {
        return Err(anyhow::anyhow!(
            "{} 個中 {} 個のビルドに失敗しました",
            outcomes.len(),
            failed
        ));
    }

    println!();
    println!("{}", "✓ すべてのイメージがビルドされました！".green().bold());
    Ok(())
}
