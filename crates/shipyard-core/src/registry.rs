//! レジストリ接続先のデフォルト
//!
//! 設定とレジストリクライアントの両方が参照する。

/// Docker Hub のトークンサービス
pub const DEFAULT_AUTH_URL: &str = "https://auth.docker.io";

/// Docker Hub のレジストリ API
pub const DEFAULT_QUERY_URL: &str = "https://index.docker.io";
