use std::path::PathBuf;

use crate::core::types::ClientId;

/// Lookup failures, reported back to the requesting client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("no configuration found for client {0}")]
    NotFound(ClientId),
    #[error("configuration for client {0} is malformed")]
    Malformed(ClientId),
}

/// Failures loading configuration at startup. These are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("configuration file {} could not be read: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("configuration file {} could not be parsed to the expected json structure: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("redirect url of client {client_id} is not an absolute url: {source}")]
    InvalidRedirect {
        client_id: ClientId,
        source: url::ParseError,
    },
}
