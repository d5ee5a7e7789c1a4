use super::types::*;

/// Credentials and redirect target of one registered client.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "clientId")]
    pub client_id: ClientId,
    #[serde(rename = "clientSecretId")]
    pub client_secret: ClientSecret,
    #[serde(rename = "redirectUrl")]
    pub redirect_uri: RedirectUri,
}
