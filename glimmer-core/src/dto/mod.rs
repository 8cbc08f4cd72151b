//! Data Transfer Objects for the backend API
//!
//! Request bodies sent to the backend and small response envelopes that
//! have no domain meaning of their own.

pub mod auth;
pub mod billing;
pub mod job;
