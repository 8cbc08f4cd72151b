//! Glimmer Core
//!
//! Core types and abstractions for the Glimmer flyer dashboard.
//!
//! This crate contains:
//! - Domain types: Backend entities (Job, Address, user profile, billing)
//! - DTOs: Request and response bodies for the backend API
//! - View model: Street-grouped flyer library, sync state reducer and
//!   dashboard statistics

pub mod domain;
pub mod dto;
pub mod view;
mod wire;
