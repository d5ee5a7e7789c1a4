//! The login and callback flows.

mod callback;
pub mod error;
mod login;

use std::sync::Arc;

use url::Url;

use crate::core::types::{AccessToken, RedirectUri};
use crate::provider::OAuthProvider;
use crate::registry::ClientRegistry;
use crate::state::StateService;

pub use error::FlowError;

#[derive(Debug, Default)]
#[derive(serde::Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
}

#[derive(Debug, Default)]
#[derive(serde::Deserialize)]
pub struct CallbackRequest {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Where to send the browser next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Adds `token` to the query of `uri`, keeping any existing query
    /// parameters and fragment.
    pub fn with_token(uri: &RedirectUri, token: &AccessToken) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(uri.as_ref())?;
        url.query_pairs_mut().append_pair("token", token.as_ref());
        Ok(Self::to(url.as_str()))
    }
}

pub struct Bridge {
    registry: Arc<dyn ClientRegistry>,
    provider: Arc<dyn OAuthProvider>,
    states: StateService,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

impl Bridge {
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        provider: Arc<dyn OAuthProvider>,
        states: StateService,
    ) -> Self {
        Self {
            registry,
            provider,
            states,
        }
    }

    pub fn states(&self) -> &StateService {
        &self.states
    }
}
