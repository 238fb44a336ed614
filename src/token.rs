//! Refresh token persistence.
//!
//! The platform's credential dance only has to be walked through once; the
//! refresh token it yields is kept in a plain file so later runs can skip
//! straight to authorization. A missing or unreadable file simply means
//! "authorize from scratch", never an error.

use crate::config::StorageConfig;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at the configured `refresh_token_file` path.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.refresh_token_file)
    }

    /// The stored token, if any. Surrounding whitespace is stripped and an
    /// empty file counts as no token.
    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            tracing::debug!(path = %self.path.display(), "token_file_empty");
            return None;
        }
        tracing::debug!(path = %self.path.display(), "token_loaded");
        Some(token.to_string())
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        tracing::info!(path = %self.path.display(), "token_saved");
        Ok(())
    }

    /// Forget the stored token, e.g. after the platform rejects it.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "token_deleted");
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
