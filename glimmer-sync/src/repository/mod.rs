//! Repository layer
//!
//! Repositories are stateless seams over the HTTP client. They expose the
//! subset of backend calls the sync engine needs, without business logic,
//! so the poller and services can be exercised against in-memory fakes.

mod jobs;

// Re-export traits
pub use jobs::JobRepository;

// Re-export implementations
pub use jobs::HttpJobRepository;
