mod commands;
mod docker;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shipyard")]
#[command(about = "Dockerfileを見つけて、バージョン付きでビルドする。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dockerfileを探索してビルドプランをJSONで表示
    Discover {
        /// 探索するルートディレクトリ（省略時は設定の root）
        root: Option<PathBuf>,
    },
    /// Dockerfileを1つビルド
    Build {
        /// ビルドするDockerfileのパス
        #[arg(long = "dockerfile", visible_alias = "docker-file")]
        dockerfile: PathBuf,
        /// ビルド引数（key=value,key=value,...）。version の値がタグになる
        #[arg(long)]
        build_args: String,
    },
    /// 見つかったDockerfileをすべて順番にビルド
    #[command(name = "build-all")]
    BuildAll {
        /// 探索するルートディレクトリ（省略時は設定の root）
        root: Option<PathBuf>,
    },
    /// レジストリに公開済みのタグを表示
    Tags {
        /// イメージ名（library/ 配下、例: nginx）
        image: String,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdoutはビルドプランやビルドログに使うので、ログはstderrに出力
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("shipyard {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = shipyard_config::load_settings()?;
    tracing::debug!(?settings, "Loaded settings");

    match cli.command {
        Commands::Discover { root } => {
            commands::discover::handle(&settings, root)?;
        }
        Commands::Build {
            dockerfile,
            build_args,
        } => {
            commands::build::handle(&dockerfile, &build_args).await?;
        }
        Commands::BuildAll { root } => {
            commands::build_all::handle(&settings, root).await?;
        }
        Commands::Tags { image } => {
            commands::tags::handle(&settings, &image).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before settings loading");
        }
    }

    Ok(())
}
