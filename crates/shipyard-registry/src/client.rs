//! Registry HTTP クライアント
//!
//! - `GET {auth_url}/token?service=registry.docker.io&scope=repository:library/{image}:pull`
//! - `GET {query_url}/v2/library/{image}/tags/list` (`Authorization: Bearer {token}`)
//!
//! タイムアウトやリトライは設定しない。必要なら呼び出し側で包む。

use crate::error::{RegistryError, Result};
use serde::Deserialize;
use tracing::debug;

pub use shipyard_core::{DEFAULT_AUTH_URL, DEFAULT_QUERY_URL};

/// トークン要求で指定するサービス名
pub const REGISTRY_SERVICE: &str = "registry.docker.io";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagListResponse {
    tags: Option<Vec<String>>,
}

/// レジストリのタグ一覧を参照するクライアント
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    auth_url: String,
    query_url: String,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_URL, DEFAULT_QUERY_URL)
    }
}

impl RegistryClient {
    pub fn new(auth_url: impl Into<String>, query_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            query_url: query_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `library/{image}` の pull トークンを取得
    pub async fn get_auth_token(&self, image: &str) -> Result<String> {
        let scope = format!("repository:library/{}:pull", image);
        debug!(image, auth_url = %self.auth_url, "Requesting registry token");

        let response = self
            .http
            .get(format!("{}/token", self.auth_url))
            .query(&[("service", REGISTRY_SERVICE), ("scope", scope.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Auth {
                image: image.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<TokenResponse>()
            .await?
            .token
            .ok_or_else(|| RegistryError::MissingToken(image.to_string()))
    }

    /// イメージのタグ一覧を取得
    ///
    /// レスポンスに `tags` が無い場合は `None`（エラーではない）。
    pub async fn get_tags(&self, image: &str, token: &str) -> Result<Option<Vec<String>>> {
        let url = format!("{}/v2/library/{}/tags/list", self.query_url, image);
        debug!(image, url = %url, "Listing registry tags");

        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.json::<TagListResponse>().await?.tags)
    }

    /// トークンを取得してタグ一覧を問い合わせる
    ///
    /// 認証に失敗した場合はタグ一覧の問い合わせを行わない。
    pub async fn list_tags(&self, image: &str) -> Result<Option<Vec<String>>> {
        let token = self.get_auth_token(image).await?;
        self.get_tags(image, &token).await
    }
}
