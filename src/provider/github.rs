use async_trait::async_trait;
use reqwest::{header::ACCEPT, StatusCode};
use tracing::{event, Level};
use url::Url;

use super::{OAuthProvider, ProviderError};
use crate::core::types::{AccessToken, AuthCode, ClientId, ClientSecret, Scope, StateToken};

pub const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct GitHubEndpoints {
    pub authorize_url: Url,
    pub token_url: Url,
}

impl GitHubEndpoints {
    pub fn github() -> Result<Self, url::ParseError> {
        Ok(Self {
            authorize_url: Url::parse(AUTHORIZE_URL)?,
            token_url: Url::parse(TOKEN_URL)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GitHubProvider {
    http: reqwest::Client,
    endpoints: GitHubEndpoints,
    scope: Scope,
}

impl GitHubProvider {
    pub fn new(http: reqwest::Client, endpoints: GitHubEndpoints) -> Self {
        Self {
            http,
            endpoints,
            scope: Scope::public_repo(),
        }
    }
}

#[derive(serde::Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// GitHub answers a bad code with `200 OK` and an `error` body.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum TokenExchangeResponse {
    Granted {
        access_token: AccessToken,
    },
    Rejected {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
}

pub(crate) fn parse_token_response(status: StatusCode, body: &str) -> Result<AccessToken, ProviderError> {
    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    match serde_json::from_str(body)? {
        TokenExchangeResponse::Granted { access_token } if !access_token.0.is_empty() => {
            Ok(access_token)
        }
        TokenExchangeResponse::Granted { .. } => Err(ProviderError::MissingToken),
        TokenExchangeResponse::Rejected {
            error,
            error_description,
        } => Err(ProviderError::Rejected {
            error,
            description: error_description.unwrap_or_default(),
        }),
    }
}

#[async_trait]
impl OAuthProvider for GitHubProvider {
    fn authorization_url(
        &self,
        client_id: &ClientId,
        _client_secret: &ClientSecret,
        state: &StateToken,
    ) -> Url {
        let mut url = self.endpoints.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", client_id.as_ref())
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope.as_joined())
            .append_pair("state", state.as_ref());
        url
    }

    #[tracing::instrument(skip(self, client_secret, code))]
    async fn exchange_code(
        &self,
        client_id: &ClientId,
        client_secret: &ClientSecret,
        code: &AuthCode,
    ) -> Result<AccessToken, ProviderError> {
        let request = TokenExchangeRequest {
            client_id: client_id.as_ref(),
            client_secret: client_secret.as_ref(),
            code: code.as_ref(),
        };

        let response = self
            .http
            .post(self.endpoints.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let token = parse_token_response(status, &body)?;

        event!(Level::DEBUG, "Exchanged authorization code");
        Ok(token)
    }
}
