//! Lookup of per-client OAuth credentials.

pub mod env;
pub mod error;
pub mod file;

use crate::core::models::ClientConfig;
use crate::core::types::ClientId;

pub use env::EnvRegistry;
pub use error::{ConfigError, RegistryError};
pub use file::FileRegistry;

pub trait ClientRegistry: Send + Sync {
    /// Exact-match lookup. An unknown client is always an error.
    fn resolve(&self, client_id: &ClientId) -> Result<ClientConfig, RegistryError>;
}
