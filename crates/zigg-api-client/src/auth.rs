use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::info;
use zigg_core::models::Credentials;
use zigg_core::ConsoleError;

use crate::ApiClient;

impl ApiClient {
    /// `POST /login`. The token comes back in the `Authorization` response
    /// header and starts a new session.
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ConsoleError> {
        let request = self.client().post(self.build_url("/login")).json(credentials);
        let response = self.send_anonymous(request).await?;

        let token = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ConsoleError::Unauthorized("Login response carried no token".to_string())
            })?
            .to_string();

        self.session().begin(token)?;
        info!("Logged in");
        Ok(())
    }

    /// `POST /register`.
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn register(&self, credentials: &Credentials) -> Result<Value, ConsoleError> {
        let request = self
            .client()
            .post(self.build_url("/register"))
            .json(credentials);
        let response = self.send_anonymous(request).await?;
        crate::read_json(response).await
    }

    /// End the session locally. The backend has no logout endpoint.
    pub fn logout(&self) -> Result<(), ConsoleError> {
        self.session().end()?;
        info!("Logged out");
        Ok(())
    }
}
