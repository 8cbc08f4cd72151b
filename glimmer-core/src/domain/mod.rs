//! Core domain types
//!
//! This module contains the entities exchanged with the flyer backend.
//! They are shared between the HTTP client (decodes them), the sync engine
//! (reconciles them) and the CLI (renders them).

pub mod address;
pub mod billing;
pub mod flyer;
pub mod job;
pub mod user;
