//! User and authentication endpoints

use crate::FlyerClient;
use crate::credentials::Credentials;
use crate::error::{ClientError, Result};
use glimmer_core::domain::user::{FreeUsage, UserProfile};
use glimmer_core::dto::auth::{RegisterUser, TokenRequest, TokenResponse};
use reqwest::{Method, RequestBuilder};
use tracing::info;

impl FlyerClient {
    // =============================================================================
    // Session
    // =============================================================================

    /// Exchange a username and password for a bearer token
    ///
    /// The token is saved to the credential store and the username cached
    /// for this process.
    ///
    /// # Example
    /// ```no_run
    /// # use glimmer_client::FlyerClient;
    /// # use glimmer_client::credentials::MemoryCredentialStore;
    /// # use std::sync::Arc;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = FlyerClient::new("http://127.0.0.1:8000", Arc::new(MemoryCredentialStore::new()));
    /// let credentials = client.login("holly", "secret").await?;
    /// println!("logged in as {}", credentials.username);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(&self, username: &str, password: &str) -> Result<Credentials> {
        let response = self.token_request(username, password)?.send().await?;

        let token: TokenResponse = self.handle_response(response).await?;
        if token.access_token.is_empty() {
            return Err(ClientError::ParseError(
                "Token response carried an empty access_token".to_string(),
            ));
        }

        let credentials = Credentials {
            username: username.to_string(),
            token: token.access_token,
        };
        self.credentials.save(&credentials)?;
        self.cache_username(Some(credentials.username.clone()));

        info!("Logged in as {}", username);
        Ok(credentials)
    }

    /// Create an account; does not log in
    pub async fn register(&self, req: &RegisterUser) -> Result<UserProfile> {
        let response = self.register_request(req)?.send().await?;

        self.handle_response(response).await
    }

    /// The token endpoint only accepts a urlencoded form
    pub(crate) fn token_request(&self, username: &str, password: &str) -> Result<RequestBuilder> {
        Ok(self
            .request(Method::POST, crate::TOKEN_PATH)?
            .form(&TokenRequest::password(username, password)))
    }

    pub(crate) fn register_request(&self, req: &RegisterUser) -> Result<RequestBuilder> {
        Ok(self.request(Method::POST, "/users/register")?.json(req))
    }

    /// Drop the stored token
    pub fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.clear_credentials()
    }

    // =============================================================================
    // Profile
    // =============================================================================

    /// Profile of the authenticated user
    pub async fn current_user(&self) -> Result<UserProfile> {
        let response = self.request(Method::GET, "/users/me")?.send().await?;

        self.handle_response(response).await
    }

    /// Free-tier image allowance of the authenticated user
    pub async fn free_usage(&self) -> Result<FreeUsage> {
        let response = self
            .request(Method::GET, "/users/free-usage")?
            .send()
            .await?;

        self.handle_response(response).await
    }
}
