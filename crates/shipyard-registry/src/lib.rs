//! Shipyard Registry — レジストリの公開済みタグ参照
//!
//! トークンサービスから pull スコープのトークンを取得し、
//! そのトークンでイメージのタグ一覧を問い合わせます。
//! ビルドパイプラインとは独立した読み取り専用の経路です。

pub mod client;
pub mod error;

pub use client::*;
pub use error::*;
