//! Scheduler layer for the sync engine
//!
//! This layer polls the backend for the job list and status reports,
//! resolves newly completed jobs into flyers and feeds the results into
//! the session-guarded store.

pub mod poller;

pub use poller::{CycleReport, JobPoller};
