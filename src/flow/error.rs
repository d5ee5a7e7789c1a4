use crate::registry::RegistryError;

/// Per-request failures of the login and callback flows.
///
/// The `Display` text is what the requesting browser gets to see, so the
/// state and exchange variants deliberately carry no detail.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("The {0} method is not allowed")]
    MethodNotAllowed(String),
    #[error("The query parameter {0} is required")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("State could not be verified")]
    StateVerification,
    #[error("Authorization was denied by the provider")]
    AuthorizationDenied,
    #[error("Code was not accepted by the OAuth provider")]
    Exchange,
    #[error("Internal server error")]
    Internal,
}
