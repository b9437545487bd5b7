//! Stored-hash repository: a flat file holding the last extracted hash

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::{ExtractedHash, HashwatchError, Result};

/// Default file name, relative to the working directory
pub const DEFAULT_HASH_FILE: &str = "HASH";

/// Single-value store backed by one text file
#[derive(Debug, Clone)]
pub struct HashStore {
    path: PathBuf,
}

impl HashStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored hash.
    ///
    /// A missing or empty file is `Ok(None)`; surrounding whitespace is trimmed.
    pub async fn try_load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored hash at {:?}", self.path);
                Ok(None)
            }
            Err(source) => Err(HashwatchError::StorageIo {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Read the stored hash, treating read failures as "no prior value"
    pub async fn load(&self) -> Option<String> {
        match self.try_load().await {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unreadable stored hash: {}", e);
                None
            }
        }
    }

    /// Overwrite the file with `hash`
    pub async fn save(&self, hash: &ExtractedHash) -> Result<()> {
        fs::write(&self.path, hash.as_str())
            .await
            .map_err(|source| HashwatchError::StorageIo {
                path: self.path.clone(),
                source,
            })?;

        debug!("Stored hash {} to {:?}", hash, self.path);
        Ok(())
    }
}

impl Default for HashStore {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_FILE)
    }
}
