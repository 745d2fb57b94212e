// src/session/cache.rs

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

use crate::profile::models::UserAccount;

#[derive(Debug, Error)]
pub enum SessionCacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache payload is not a valid session: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Local mirror of the session object: one key, one JSON document of shape
/// `{id, email, role, createdAt, profile}`.
pub trait SessionCache: Send + Sync {
    fn load(&self) -> Result<Option<UserAccount>, SessionCacheError>;
    fn store(&self, account: &UserAccount) -> Result<(), SessionCacheError>;
    fn clear(&self) -> Result<(), SessionCacheError>;
}

/// File-backed cache, the shell's stand-in for browser local storage.
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionCache for FileSessionCache {
    fn load(&self) -> Result<Option<UserAccount>, SessionCacheError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn store(&self, account: &UserAccount) -> Result<(), SessionCacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string(account)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionCacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
