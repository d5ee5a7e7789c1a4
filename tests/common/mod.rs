use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use url::Url;

use kakehashi::core::models::ClientConfig;
use kakehashi::core::types::{
    AccessToken, AuthCode, ClientId, ClientSecret, RedirectUri, StateToken,
};
use kakehashi::flow::Bridge;
use kakehashi::http::proxy::ApiProxy;
use kakehashi::http::server::Server;
use kakehashi::provider::{OAuthProvider, ProviderError};
use kakehashi::registry::FileRegistry;
use kakehashi::state::StateService;
use kakehashi::util::clock::ManualClock;

/// Grants `tok_xyz` for the code `goodcode` and rejects everything else.
pub struct MockProvider;

#[async_trait]
impl OAuthProvider for MockProvider {
    fn authorization_url(
        &self,
        client_id: &ClientId,
        _client_secret: &ClientSecret,
        state: &StateToken,
    ) -> Url {
        let mut url = Url::parse("https://github.test/login/oauth/authorize").unwrap();
        url.query_pairs_mut()
            .append_pair("client_id", &client_id.0)
            .append_pair("state", &state.0);
        url
    }

    async fn exchange_code(
        &self,
        _client_id: &ClientId,
        _client_secret: &ClientSecret,
        code: &AuthCode,
    ) -> Result<AccessToken, ProviderError> {
        if code.0 == "goodcode" {
            Ok(AccessToken("tok_xyz".to_string()))
        } else {
            Err(ProviderError::Rejected {
                error: "bad_verification_code".to_string(),
                description: String::new(),
            })
        }
    }
}

pub fn clients() -> FileRegistry {
    FileRegistry::from_entries(vec![ClientConfig {
        client_id: ClientId("abc123".to_string()),
        client_secret: ClientSecret("s3cr3t".to_string()),
        redirect_uri: RedirectUri("https://app.example.com/done".to_string()),
    }])
    .unwrap()
}

pub fn server(provider: Arc<dyn OAuthProvider>, api: &str) -> Server {
    let proxy = ApiProxy::new(reqwest::Client::new(), Url::parse(api).unwrap());
    server_with_proxy(provider, proxy)
}

pub fn server_with_proxy(provider: Arc<dyn OAuthProvider>, proxy: ApiProxy) -> Server {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ));
    let states = StateService::with_clock("123password".to_string(), Duration::from_secs(600), clock);
    let bridge = Arc::new(Bridge::new(Arc::new(clients()), provider, states));
    Server::new(bridge, Arc::new(proxy))
}

pub fn query_param(location: &str, name: &str) -> Option<String> {
    Url::parse(location)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
