//! The OAuth provider the bridge delegates authorization to.

pub mod error;
pub mod github;

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::core::types::{AccessToken, AuthCode, ClientId, ClientSecret, StateToken};

pub use error::ProviderError;
pub use github::{GitHubEndpoints, GitHubProvider};

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn authorization_url(
        &self,
        client_id: &ClientId,
        client_secret: &ClientSecret,
        state: &StateToken,
    ) -> Url;

    async fn exchange_code(
        &self,
        client_id: &ClientId,
        client_secret: &ClientSecret,
        code: &AuthCode,
    ) -> Result<AccessToken, ProviderError>;
}

/// Shared outbound client. Every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
