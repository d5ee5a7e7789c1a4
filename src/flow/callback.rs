use tracing::{event, Level};

use super::{Bridge, CallbackRequest, FlowError, Redirect};
use crate::core::types::{AuthCode, StateToken};

impl Bridge {
    #[tracing::instrument(skip_all)]
    pub async fn callback(&self, req: CallbackRequest) -> Result<Redirect, FlowError> {
        if let Some(error) = req.error {
            event!(
                Level::INFO,
                error = %error,
                description = req.error_description.as_deref().unwrap_or(""),
                "Provider returned an authorization error"
            );
            return Err(FlowError::AuthorizationDenied);
        }

        let code = req
            .code
            .filter(|code| !code.is_empty())
            .map(AuthCode)
            .ok_or(FlowError::MissingParameter("code"))?;

        let state = StateToken(req.state.unwrap_or_default());
        let client_id = self.states.verify(&state).map_err(|e| {
            event!(Level::WARN, error = %e, "Error while verifying state");
            FlowError::StateVerification
        })?;

        let client = self.registry.resolve(&client_id)?;

        let token = self
            .provider
            .exchange_code(&client.client_id, &client.client_secret, &code)
            .await
            .map_err(|e| {
                event!(
                    Level::WARN,
                    client_id = %client.client_id,
                    error = %e,
                    "Error while exchanging code with the provider"
                );
                FlowError::Exchange
            })?;

        let redirect = Redirect::with_token(&client.redirect_uri, &token).map_err(|e| {
            event!(Level::ERROR, client_id = %client.client_id, error = %e, "Invalid redirect url");
            FlowError::Internal
        })?;

        event!(Level::INFO, client_id = %client.client_id, "Forwarding access token");
        Ok(redirect)
    }
}
