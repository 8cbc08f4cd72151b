//! Dashboard view model
//!
//! Everything the presentation layer reads: the active job collection, the
//! street-grouped library of completed flyers and statistics derived from
//! both. State only changes through [`SyncState::apply`], a pure reducer, so
//! concurrent producers can be serialized by whoever owns the state.

pub mod library;
pub mod state;
pub mod stats;

pub use library::{CompletedJobRecord, Completion, FlyerLibrary, StreetMap};
pub use state::{SESSION_EXPIRED_MESSAGE, SyncEvent, SyncState};
pub use stats::{DashboardStats, JobSummary, ProgressDisplay};
