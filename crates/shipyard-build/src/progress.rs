use crate::orchestrator::BuildEvent;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use tracing::warn;

/// バッチビルドの進捗表示
///
/// ログ行はバーを一時的に消してから出力先に書き込む。
/// 端末でなくバーが非表示の場合も、ログ行と失敗行はそのまま出力される。
pub struct BuildProgress<W: Write = io::Stdout> {
    progress_bar: ProgressBar,
    out: W,
}

impl BuildProgress {
    pub fn new(total: usize) -> Self {
        Self::with_output(ProgressBar::new(total as u64), io::stdout())
    }
}

impl<W: Write> BuildProgress<W> {
    /// 任意のプログレスバーと出力先で作成
    pub fn with_output(progress_bar: ProgressBar, out: W) -> Self {
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
        {
            progress_bar.set_style(style);
        }

        Self { progress_bar, out }
    }

    /// オーケストレーターのイベントを表示に反映
    pub fn handle(&mut self, event: BuildEvent<'_>) {
        match event {
            BuildEvent::Started(entry) => {
                self.progress_bar
                    .set_message(format!("Building {}...", entry.location().display()));
            }
            BuildEvent::Log(_, line) => {
                self.print_line(line);
            }
            BuildEvent::Finished(outcome) => {
                if let Some(error) = &outcome.error_message {
                    let line = format!("✗ {}: {}", outcome.entry.location().display(), error);
                    self.print_line(&line);
                }
                self.progress_bar.inc(1);
            }
        }
    }

    pub fn finish(&self, message: &str) {
        self.progress_bar.finish_with_message(message.to_string());
    }

    fn print_line(&mut self, line: &str) {
        let out = &mut self.out;
        let result = self.progress_bar.suspend(|| writeln!(out, "{}", line));
        if let Err(e) = result {
            warn!(error = %e, "Failed to write build output");
        }
    }
}
