//! Shipyard Docker Image Build functionality
//!
//! ビルドプランを Docker エンジンに対して順番に実行します。
//! 1つのビルドが失敗しても残りのビルドは続行されます。

pub mod args;
pub mod context;
pub mod docker;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod progress;

pub use args::parse_build_args;
pub use context::ContextBuilder;
pub use docker::DockerEngine;
pub use engine::{BuildEngine, BuildLogStream, BuildRequest};
pub use error::{BuildError, Result};
pub use orchestrator::{BuildEvent, BuildOrchestrator, BuildOutcome};
pub use progress::BuildProgress;
