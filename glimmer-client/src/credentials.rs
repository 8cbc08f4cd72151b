//! Credential persistence
//!
//! The bearer token and username survive restarts in a JSON file, the way
//! the browser dashboard kept them in local storage. An in-memory store is
//! provided for tests and throwaway sessions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

use crate::error::{ClientError, Result};

/// A logged-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

/// Durable storage for the current credentials
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Returns the stored credentials, if any
    fn load(&self) -> Result<Option<Credentials>>;

    /// Replaces the stored credentials
    fn save(&self, credentials: &Credentials) -> Result<()>;

    /// Forgets the stored credentials; a no-op when nothing is stored
    fn clear(&self) -> Result<()>;
}

/// Credentials kept as JSON in a single file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            ClientError::Storage(format!("Corrupt credentials file {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let raw = serde_json::to_string_pretty(credentials)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| {
            ClientError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed credentials file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Credentials that live as long as the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(Some(credentials)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Credentials>>> {
        self.inner
            .lock()
            .map_err(|_| ClientError::Storage("credential lock poisoned".to_string()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        *self.lock()? = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            username: "holly".to_string(),
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn test_file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("credentials.json"));

        assert_eq!(store.load().unwrap(), None);

        store.save(&credentials()).unwrap();
        assert_eq!(store.load().unwrap(), Some(credentials()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(path);
        assert!(matches!(store.load(), Err(ClientError::Storage(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        store.save(&credentials()).unwrap();
        assert_eq!(store.load().unwrap(), Some(credentials()));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
