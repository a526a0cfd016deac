//! ビルドエンジンの抽象化
//!
//! オーケストレーターは [`BuildEngine`] だけに依存するため、テストでは
//! 結果を台本どおりに返すフェイクエンジンに差し替えられる。

use crate::error::Result;
use futures_util::stream::BoxStream;
use std::collections::HashMap;
use std::path::PathBuf;

/// ビルドログ行のストリーム
///
/// 一度だけ読み切れる有限のストリーム。`Err` が流れた時点でビルド失敗とみなす。
pub type BuildLogStream<'a> = BoxStream<'a, Result<String>>;

/// 1回のビルドに必要な入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// ビルドコンテキスト（Dockerfile の親ディレクトリ）
    pub context_dir: PathBuf,
    /// Dockerfile のパス
    pub dockerfile: PathBuf,
    pub build_args: HashMap<String, String>,
    /// 出力イメージのタグ
    pub tag: String,
}

/// イメージをビルドするエンジン
pub trait BuildEngine {
    /// ビルドを開始し、ログ行を逐次流すストリームを返す
    fn build(&self, request: BuildRequest) -> BuildLogStream<'_>;
}
