//! Sync configuration
//!
//! Defines all configurable parameters of the sync engine including the
//! backend URL, polling interval, request timeout and the quota policy.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SyncError};

/// Backend used when none is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// What to do when a campaign needs more renders than the free allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuotaPolicy {
    /// Check the allowance first and refuse to submit
    #[default]
    Reject,
    /// Submit, then delete the created job if it exceeds the allowance
    DeleteJob,
}

impl FromStr for QuotaPolicy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(QuotaPolicy::Reject),
            "delete-job" | "delete_job" | "delete" => Ok(QuotaPolicy::DeleteJob),
            other => Err(SyncError::Config(format!(
                "unknown quota policy '{}' (expected 'reject' or 'delete-job')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for QuotaPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaPolicy::Reject => write!(f, "reject"),
            QuotaPolicy::DeleteJob => write!(f, "delete-job"),
        }
    }
}

/// Sync engine configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Backend base URL (e.g., "http://127.0.0.1:8000")
    pub api_url: String,

    /// How often the job list is polled
    pub poll_interval: Duration,

    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,

    /// Handling of campaigns that exceed the free allowance
    pub quota_policy: QuotaPolicy,

    /// File holding the bearer token between runs
    pub credentials_path: PathBuf,
}

impl SyncConfig {
    /// Creates a new configuration with defaults
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            quota_policy: QuotaPolicy::default(),
            credentials_path: default_credentials_path(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - GLIMMER_API_URL (default: http://127.0.0.1:8000)
    /// - GLIMMER_POLL_INTERVAL (seconds, default: 5)
    /// - GLIMMER_REQUEST_TIMEOUT (seconds, default: 30)
    /// - GLIMMER_QUOTA_POLICY (`reject` or `delete-job`, default: reject)
    /// - GLIMMER_CREDENTIALS (path, default: ~/.config/glimmer/credentials.json)
    pub fn from_env() -> Result<Self> {
        let api_url =
            std::env::var("GLIMMER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(api_url);

        if let Some(secs) = env_secs("GLIMMER_POLL_INTERVAL")? {
            config.poll_interval = secs;
        }

        if let Some(secs) = env_secs("GLIMMER_REQUEST_TIMEOUT")? {
            config.request_timeout = secs;
        }

        if let Ok(policy) = std::env::var("GLIMMER_QUOTA_POLICY") {
            config.quota_policy = policy.parse()?;
        }

        if let Ok(path) = std::env::var("GLIMMER_CREDENTIALS") {
            config.credentials_path = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(SyncError::Config("api_url cannot be empty".to_string()));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(SyncError::Config(
                "api_url must start with http:// or https://".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(SyncError::Config(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(SyncError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn env_secs(name: &str) -> Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| SyncError::Config(format!("{} must be a whole number of seconds", name))),
        Err(_) => Ok(None),
    }
}

/// `~/.config/glimmer/credentials.json`, or the working directory without a home
pub fn default_credentials_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home)
            .join(".config")
            .join("glimmer")
            .join("credentials.json"),
        None => PathBuf::from(".glimmer-credentials.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.quota_policy, QuotaPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SyncConfig::default();

        config.api_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://api.example.com".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quota_policy_parse() {
        assert_eq!("reject".parse::<QuotaPolicy>().unwrap(), QuotaPolicy::Reject);
        assert_eq!(
            "Delete-Job".parse::<QuotaPolicy>().unwrap(),
            QuotaPolicy::DeleteJob
        );
        assert!("ignore".parse::<QuotaPolicy>().is_err());
        assert_eq!(QuotaPolicy::DeleteJob.to_string(), "delete-job");
    }
}
