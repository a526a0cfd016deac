//! ビルドオーケストレーター
//!
//! ビルドプランを先頭から1件ずつ実行します。各ビルドのログストリームを読み切ってから
//! 次のビルドに進むため、ビルド間でログが混ざることはありません。
//! エンジンの失敗はそのエントリの結果に記録し、バッチ全体は止めません。

use crate::args::parse_build_args;
use crate::engine::{BuildEngine, BuildRequest};
use crate::error::Result;
use futures_util::StreamExt;
use shipyard_core::{BuildPlanEntry, DEFAULT_VERSION};
use std::collections::HashMap;
use std::path::Path;

/// バッチビルドでバージョンを渡すビルド引数名
pub const VERSION_BUILD_ARG: &str = "VERSION";

/// 1エントリ分のビルド結果
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub entry: BuildPlanEntry,
    pub success: bool,
    /// エンジンが出力したログ行
    pub log_lines: Vec<String>,
    pub error_message: Option<String>,
}

/// ビルド進行中のイベント
#[derive(Debug)]
pub enum BuildEvent<'a> {
    Started(&'a BuildPlanEntry),
    Log(&'a BuildPlanEntry, &'a str),
    Finished(&'a BuildOutcome),
}

pub struct BuildOrchestrator<E> {
    engine: E,
}

impl<E: BuildEngine> BuildOrchestrator<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// ビルドプランを順番に実行
    ///
    /// 失敗したエントリがあっても必ずエントリ数と同じ数の結果を返す。
    pub async fn run<F>(&self, plan: &[BuildPlanEntry], mut on_event: F) -> Vec<BuildOutcome>
    where
        F: FnMut(BuildEvent<'_>),
    {
        let mut outcomes = Vec::with_capacity(plan.len());

        for entry in plan {
            let build_args = HashMap::from([(
                VERSION_BUILD_ARG.to_string(),
                entry.version().to_string(),
            )]);
            let outcome = self.build_entry(entry, build_args, &mut on_event).await;
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|o| !o.success).count();
        tracing::info!(
            total = outcomes.len(),
            failed,
            "Build plan finished"
        );

        outcomes
    }

    /// Dockerfile を1つだけビルド
    ///
    /// `build_args` は `key=value,key=value` 形式。パースに失敗した場合は
    /// エンジンを呼ぶ前にエラーを返す。タグは `version`（無ければ `VERSION`）の値。
    pub async fn build_one<F>(
        &self,
        definition: &Path,
        build_args: &str,
        mut on_event: F,
    ) -> Result<BuildOutcome>
    where
        F: FnMut(BuildEvent<'_>),
    {
        let build_args = parse_build_args(build_args)?;

        let version = build_args
            .get("version")
            .or_else(|| build_args.get(VERSION_BUILD_ARG))
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let location = std::path::absolute(definition)?;
        let entry = BuildPlanEntry::new(location, version);

        tracing::info!(
            "Building image from {} with build args {:?}",
            entry.location().display(),
            build_args
        );

        Ok(self.build_entry(&entry, build_args, &mut on_event).await)
    }

    async fn build_entry<F>(
        &self,
        entry: &BuildPlanEntry,
        build_args: HashMap<String, String>,
        on_event: &mut F,
    ) -> BuildOutcome
    where
        F: FnMut(BuildEvent<'_>),
    {
        on_event(BuildEvent::Started(entry));

        let request = BuildRequest {
            context_dir: entry.context_dir().to_path_buf(),
            dockerfile: entry.location().to_path_buf(),
            build_args,
            tag: entry.version().to_string(),
        };

        let mut log_lines = Vec::new();
        let mut error_message = None;

        // ストリームはこのブロックの終わりで破棄される
        {
            let mut stream = self.engine.build(request);
            while let Some(item) = stream.next().await {
                match item {
                    Ok(line) => {
                        on_event(BuildEvent::Log(entry, &line));
                        log_lines.push(line);
                    }
                    Err(e) => {
                        tracing::warn!(
                            dockerfile = %entry.location().display(),
                            error = %e,
                            "Build failed, continuing with next entry"
                        );
                        error_message = Some(e.to_string());
                        break;
                    }
                }
            }
        }

        let outcome = BuildOutcome {
            entry: entry.clone(),
            success: error_message.is_none(),
            log_lines,
            error_message,
        };

        on_event(BuildEvent::Finished(&outcome));
        outcome
    }
}
