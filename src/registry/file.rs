use std::path::Path;

use tracing::{event, Level};

use super::{ClientRegistry, ConfigError, RegistryError};
use crate::core::models::ClientConfig;
use crate::core::types::ClientId;

/// Clients loaded once from a JSON array of
/// `{"clientId", "clientSecretId", "redirectUrl"}` records.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    entries: Vec<ClientConfig>,
}

impl FileRegistry {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: Vec<ClientConfig> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<ClientConfig>) -> Result<Self, ConfigError> {
        for (i, entry) in entries.iter().enumerate() {
            entry
                .redirect_uri
                .validate()
                .map_err(|source| ConfigError::InvalidRedirect {
                    client_id: entry.client_id.clone(),
                    source,
                })?;

            if entries[..i].iter().any(|e| e.client_id == entry.client_id) {
                event!(
                    Level::WARN,
                    client_id = %entry.client_id,
                    "Duplicate client entry, the first one wins"
                );
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ClientConfig] {
        &self.entries
    }
}

impl ClientRegistry for FileRegistry {
    fn resolve(&self, client_id: &ClientId) -> Result<ClientConfig, RegistryError> {
        self.entries
            .iter()
            .find(|entry| &entry.client_id == client_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(client_id.clone()))
    }
}
