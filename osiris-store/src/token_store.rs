//! Bearer token persistence.
//!
//! The token lives in a single owner-only file holding nothing but the token
//! text. Its contents are never logged.

use osiris_core::BearerToken;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::persistence::{default_token_path, remove_file, save_text};

/// Stores the token between runs.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store backed by `~/.osiris_token`.
    pub fn default_location() -> Self {
        Self::with_path(default_token_path())
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored token.
    ///
    /// A missing file or a file holding only whitespace yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Option<BearerToken>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored token");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            debug!("Stored token is empty");
            return Ok(None);
        }
        Ok(Some(BearerToken::new(content)?))
    }

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be written.
    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    pub async fn save(&self, token: &BearerToken) -> Result<(), StoreError> {
        save_text(&self.path, token.as_str()).await?;
        debug!("Token saved");
        Ok(())
    }

    /// Removes the stored token. Returns whether one was present.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if an existing file cannot be removed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn clear(&self) -> Result<bool, StoreError> {
        let removed = remove_file(&self.path).await?;
        debug!(removed, "Token cleared");
        Ok(removed)
    }
}
