//! Glimmer HTTP Client
//!
//! A typed HTTP client for the flyer generation backend.
//!
//! Every request goes through one gateway that attaches the stored bearer
//! token (except when requesting a token), serializes JSON or form bodies,
//! and decodes error bodies into a single human readable message.
//!
//! # Example
//!
//! ```no_run
//! use glimmer_client::FlyerClient;
//! use glimmer_client::credentials::MemoryCredentialStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FlyerClient::new("http://127.0.0.1:8000", Arc::new(MemoryCredentialStore::new()));
//!
//!     client.login("holly", "secret").await?;
//!     for job in client.list_jobs().await? {
//!         println!("{} {}", job.id, job.title());
//!     }
//!     Ok(())
//! }
//! ```

pub mod credentials;
pub mod error;
mod addresses;
mod billing;
mod jobs;
mod users;

// Re-export commonly used types
pub use credentials::{CredentialStore, Credentials};
pub use error::{ClientError, Result};

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Token acquisition endpoint; the only request sent without a bearer token
pub const TOKEN_PATH: &str = "/users/token";

/// HTTP client for the flyer backend API
///
/// Cheap to clone; clones share the credential store and username cache.
#[derive(Debug, Clone)]
pub struct FlyerClient {
    /// Base URL of the backend (e.g., "http://127.0.0.1:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Durable token storage
    credentials: Arc<dyn CredentialStore>,
    /// Username cached for the lifetime of this process
    session_username: Arc<RwLock<Option<String>>>,
}

impl FlyerClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API
    /// * `credentials` - Where the bearer token is read from and saved to
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self::with_client(base_url, Client::new(), credentials)
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        client: Client,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
            session_username: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Whether a token is stored
    pub fn is_logged_in(&self) -> bool {
        matches!(self.credentials.load(), Ok(Some(_)))
    }

    /// Username of the stored session, served from the in-process cache when warm
    pub fn username(&self) -> Option<String> {
        if let Ok(cached) = self.session_username.read() {
            if cached.is_some() {
                return cached.clone();
            }
        }

        let username = self.credentials.load().ok().flatten().map(|c| c.username);
        self.cache_username(username.clone());
        username
    }

    fn cache_username(&self, username: Option<String>) {
        if let Ok(mut cached) = self.session_username.write() {
            *cached = username;
        }
    }

    /// Forgets stored credentials and the cached username
    pub fn clear_credentials(&self) -> Result<()> {
        self.cache_username(None);
        self.credentials.clear()
    }

    // =============================================================================
    // Request Gateway
    // =============================================================================

    /// Start a request to `path`, attaching the bearer token when required
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let builder = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json");

        if !requires_bearer(path) {
            return Ok(builder);
        }

        match self.credentials.load()? {
            Some(credentials) => Ok(builder.bearer_auth(credentials.token)),
            None => Ok(builder),
        }
    }

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no meaningful content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = decode_error_message(status.as_u16(), &body);
        debug!("Request failed with status {}: {}", status, message);
        Err(ClientError::from_status(status.as_u16(), message))
    }
}

/// Whether requests to `path` carry the bearer token
pub fn requires_bearer(path: &str) -> bool {
    path.split('?').next() != Some(TOKEN_PATH)
}

/// Extracts a human readable message from an error response body
///
/// Checks, in order: a `detail` string, a `detail` array of `{msg}` objects
/// (joined with `", "`) and a `msg` string. Anything else, including a body
/// that is not JSON, yields a generic message.
pub fn decode_error_message(status: u16, body: &str) -> String {
    let generic = format!("Request failed with status {}", status);

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return generic;
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => return detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    serde_json::Value::Object(_) => item
                        .get("msg")
                        .or_else(|| item.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string),
                    serde_json::Value::String(s) => Some(s.clone()),
                    _ => None,
                })
                .collect();
            if !messages.is_empty() {
                return messages.join(", ");
            }
        }
        _ => {}
    }

    value
        .get("msg")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or(generic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;

    fn client(base_url: &str) -> FlyerClient {
        FlyerClient::new(base_url, Arc::new(MemoryCredentialStore::new()))
    }

    #[test]
    fn test_client_creation() {
        let client = client("http://127.0.0.1:8000");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = client("http://127.0.0.1:8000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url("/jobs/"), "http://127.0.0.1:8000/jobs/");
    }

    #[test]
    fn test_token_endpoint_skips_bearer() {
        assert!(!requires_bearer("/users/token"));
        assert!(requires_bearer("/users/register"));
        assert!(requires_bearer("/jobs/"));
    }

    #[test]
    fn test_bearer_attached_when_logged_in() {
        let store = Arc::new(MemoryCredentialStore::with(Credentials {
            username: "holly".to_string(),
            token: "tok-123".to_string(),
        }));
        let client = FlyerClient::new("http://127.0.0.1:8000", store);

        let jobs = client.request(Method::GET, "/jobs/").unwrap().build().unwrap();
        assert_eq!(
            jobs.headers().get("authorization").unwrap(),
            "Bearer tok-123"
        );

        let token = client
            .request(Method::POST, TOKEN_PATH)
            .unwrap()
            .build()
            .unwrap();
        assert!(token.headers().get("authorization").is_none());
    }

    fn body_text(req: &reqwest::Request) -> String {
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_token_request_is_form_encoded() {
        let client = client("http://127.0.0.1:8000");
        let req = client.token_request("holly", "s3cret").unwrap().build().unwrap();

        assert_eq!(req.url().path(), TOKEN_PATH);
        assert_eq!(
            req.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        let body = body_text(&req);
        assert!(body.contains("grant_type=password"));
        assert!(body.contains("username=holly"));
    }

    #[test]
    fn test_register_request_is_json() {
        let client = client("http://127.0.0.1:8000");
        let register = glimmer_core::dto::auth::RegisterUser {
            username: "holly".to_string(),
            email: "holly@example.com".to_string(),
            password: "s3cret".to_string(),
            phone: None,
            company_name: None,
        };
        let req = client.register_request(&register).unwrap().build().unwrap();

        assert_eq!(req.url().path(), "/users/register");
        assert_eq!(
            req.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_str(&body_text(&req)).unwrap();
        assert_eq!(body["email"], "holly@example.com");
        assert!(body.get("phone").is_none());
    }

    #[test]
    fn test_username_cache() {
        let store = Arc::new(MemoryCredentialStore::with(Credentials {
            username: "holly".to_string(),
            token: "tok-123".to_string(),
        }));
        let client = FlyerClient::new("http://127.0.0.1:8000", store);

        assert_eq!(client.username().as_deref(), Some("holly"));
        client.clear_credentials().unwrap();
        assert_eq!(client.username(), None);
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_decode_detail_string() {
        let body = r#"{"detail": "Incorrect username or password", "msg": "ignored"}"#;
        assert_eq!(decode_error_message(401, body), "Incorrect username or password");
    }

    #[test]
    fn test_decode_detail_array() {
        let body = r#"{"detail": [{"msg": "field required"}, {"msg": "value is not a valid email"}]}"#;
        assert_eq!(
            decode_error_message(422, body),
            "field required, value is not a valid email"
        );
    }

    #[test]
    fn test_decode_msg_field() {
        assert_eq!(decode_error_message(400, r#"{"msg": "Bad input"}"#), "Bad input");
    }

    #[test]
    fn test_decode_generic() {
        assert_eq!(
            decode_error_message(500, "<html>oops</html>"),
            "Request failed with status 500"
        );
        assert_eq!(
            decode_error_message(404, r#"{"error": "x"}"#),
            "Request failed with status 404"
        );
    }
}
