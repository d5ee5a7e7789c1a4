use tracing::{event, Level};

use super::{Bridge, FlowError, LoginRequest, Redirect};
use crate::core::types::ClientId;

impl Bridge {
    #[tracing::instrument(skip_all)]
    pub fn login(&self, req: LoginRequest) -> Result<Redirect, FlowError> {
        let client_id = req
            .client_id
            .filter(|id| !id.is_empty())
            .map(ClientId)
            .ok_or(FlowError::MissingParameter("clientId"))?;

        let client = self.registry.resolve(&client_id).map_err(|e| {
            event!(Level::INFO, client_id = %client_id, "Login for unknown client");
            e
        })?;

        let state = self.states.issue(&client_id).map_err(|e| {
            event!(Level::ERROR, error = %e, "Failed to issue state");
            FlowError::Internal
        })?;

        let url = self
            .provider
            .authorization_url(&client.client_id, &client.client_secret, &state);

        event!(Level::INFO, client_id = %client_id, "Redirecting to authorization endpoint");
        Ok(Redirect::to(url.as_str()))
    }
}
