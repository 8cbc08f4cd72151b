//! Error types for the sync engine

use glimmer_client::ClientError;
use glimmer_core::view::SESSION_EXPIRED_MESSAGE;
use thiserror::Error;

use crate::service::campaign::ValidationErrors;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors surfaced by the sync engine
#[derive(Debug, Error)]
pub enum SyncError {
    /// A backend call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The backend rejected the session; state has been cleared
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    /// No stored credentials
    #[error("Not logged in. Run `glimmer auth login` first.")]
    NotLoggedIn,

    /// The session ended while the operation was in flight; its result was discarded
    #[error("Session ended before the operation finished")]
    Cancelled,

    /// The campaign form is incomplete
    #[error("Invalid campaign: {0}")]
    InvalidCampaign(ValidationErrors),

    /// The campaign needs more renders than the free allowance has left
    #[error("{message}")]
    QuotaExceeded {
        required: u32,
        remaining: u32,
        /// Whether the already-created job was deleted
        job_deleted: bool,
        message: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether the user has to log in again
    pub fn is_auth_failure(&self) -> bool {
        match self {
            SyncError::SessionExpired | SyncError::NotLoggedIn => true,
            SyncError::Client(e) => e.is_auth_failure(),
            _ => false,
        }
    }
}
