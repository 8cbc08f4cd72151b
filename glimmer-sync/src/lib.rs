//! Glimmer Sync
//!
//! Keeps the dashboard view model in step with the flyer backend.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Repository: Trait seam over the HTTP client (jobs, addresses, usage)
//! - Store: Session-guarded owner of the [`SyncState`] reducer
//! - Services: Flyer resolution for completed jobs, campaign submission
//! - Scheduler: The job status poller
//! - Session: The [`Dashboard`] facade tying the above to one login
//!
//! [`SyncState`]: glimmer_core::view::SyncState

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{QuotaPolicy, SyncConfig};
pub use error::{Result, SyncError};
pub use scheduler::{CycleReport, JobPoller};
pub use session::Dashboard;
pub use store::{SessionGuard, Store};
