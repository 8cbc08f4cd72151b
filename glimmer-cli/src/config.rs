//! Configuration module
//!
//! Combines the sync engine's environment configuration with CLI flags.

use anyhow::{Context, Result};
use glimmer_sync::{Dashboard, SyncConfig};
use std::path::PathBuf;
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub sync: SyncConfig,
}

impl Config {
    /// Reads `GLIMMER_*` variables, then applies the flags on top
    pub fn load(api_url: String, credentials: Option<PathBuf>) -> Result<Self> {
        let mut sync = SyncConfig::from_env().context("Failed to read configuration")?;
        sync.api_url = api_url;
        if let Some(path) = credentials {
            sync.credentials_path = path;
        }
        sync.validate().context("Invalid configuration")?;
        debug!(
            "Using backend {} (credentials: {})",
            sync.api_url,
            sync.credentials_path.display()
        );
        Ok(Self { sync })
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        Dashboard::from_config(self.sync.clone()).context("Failed to set up the backend client")
    }
}
