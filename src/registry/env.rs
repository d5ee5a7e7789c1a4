use super::{ClientRegistry, RegistryError};
use crate::core::models::ClientConfig;
use crate::core::types::{ClientId, ClientSecret, RedirectUri};

pub const VARIABLE_PREFIX: &str = "CLIENT_";

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Clients read on demand from `CLIENT_<clientId>=<secret>|<redirectUrl>`.
pub struct EnvRegistry {
    lookup: Box<Lookup>,
}

impl std::fmt::Debug for EnvRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EnvRegistry {{ ... }}")
    }
}

impl Default for EnvRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvRegistry {
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    pub fn variable_name(client_id: &ClientId) -> String {
        format!("{}{}", VARIABLE_PREFIX, client_id.0)
    }
}

impl ClientRegistry for EnvRegistry {
    fn resolve(&self, client_id: &ClientId) -> Result<ClientConfig, RegistryError> {
        if client_id.0.is_empty() || client_id.0.contains(|c: char| c == '=' || c == '\0') {
            return Err(RegistryError::NotFound(client_id.clone()));
        }

        let value = (self.lookup)(&Self::variable_name(client_id))
            .ok_or_else(|| RegistryError::NotFound(client_id.clone()))?;
        parse_entry(client_id, &value)
    }
}

/// Splits on the first `|` only, so the redirect url may itself contain `|`.
pub fn parse_entry(client_id: &ClientId, value: &str) -> Result<ClientConfig, RegistryError> {
    let malformed = || RegistryError::Malformed(client_id.clone());

    let (secret, redirect) = value.split_once('|').ok_or_else(malformed)?;
    if secret.is_empty() || redirect.is_empty() {
        return Err(malformed());
    }

    let redirect_uri = RedirectUri(redirect.to_string());
    redirect_uri.validate().map_err(|_| malformed())?;

    Ok(ClientConfig {
        client_id: client_id.clone(),
        client_secret: ClientSecret(secret.to_string()),
        redirect_uri,
    })
}
