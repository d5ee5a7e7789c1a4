/// Failures talking to the OAuth provider. Never shown to end users.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider rejected the code: {error} ({description})")]
    Rejected { error: String, description: String },
    #[error("failed to parse provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("provider response did not contain an access token")]
    MissingToken,
}
