//! Registry エラー型

/// レジストリ問い合わせのエラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("認証トークンの取得に失敗しました: {image} (HTTP {status})")]
    Auth { image: String, status: u16 },

    #[error("認証レスポンスに token が含まれていません: {0}")]
    MissingToken(String),

    #[error("レジストリがエラーを返しました: {url} (HTTP {status})")]
    Status { url: String, status: u16 },

    #[error("HTTP エラー: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
