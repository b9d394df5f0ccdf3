//! Pairing token persistence.
//!
//! The TV issues a token the first time the user accepts this client on the
//! on-screen prompt.  Presenting it on later connections skips the prompt.
//! There is exactly one slot: the token belongs to the fixed client name,
//! not to a particular TV.
//!
//! [`TokenStore`] is the seam.  [`FileTokenStore`] keeps the token in a small
//! plaintext file; [`MemoryTokenStore`] keeps it in memory for tests and for
//! runs without a token file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, info};
use tv_remote_core::protocol::endpoint::token_prefix;

/// Error type for token persistence.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the token file failed.
    #[error("I/O error accessing token file at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load/save access to the single pairing-token slot.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` if there is none yet.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] for storage failures other than "absent".
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the token cannot be written.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// Stores the token as the whole content of one plaintext file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by `path`.  The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    return Ok(None);
                }
                info!("loaded saved token: {}…", token_prefix(token));
                Ok(Some(token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no token file at {}", self.path.display());
                Ok(None)
            }
            Err(source) => Err(TokenStoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| TokenStoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, token).map_err(|source| TokenStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!("token saved to {}", self.path.display());
        Ok(())
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Keeps the token in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Current content, for assertions.
    pub fn current(&self) -> Option<String> {
        self.token.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.current())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_token_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("tv_remote_test_{}", Uuid::new_v4()))
            .join("tv_token")
    }

    #[test]
    fn test_file_store_load_returns_none_when_absent() {
        // Arrange
        let store = FileTokenStore::new(temp_token_path());

        // Act
        let token = store.load().unwrap();

        // Assert
        assert_eq!(token, None);
    }

    #[test]
    fn test_file_store_save_then_load_round_trip() {
        // Arrange
        let path = temp_token_path();
        let store = FileTokenStore::new(&path);

        // Act
        store.save("12345678").unwrap();
        let loaded = store.load().unwrap();

        // Assert
        assert_eq!(loaded.as_deref(), Some("12345678"));

        // Cleanup
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_file_store_save_overwrites_previous_token() {
        let path = temp_token_path();
        let store = FileTokenStore::new(&path);

        store.save("old-token").unwrap();
        store.save("new").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("new"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_file_store_trims_whitespace_and_treats_blank_as_absent() {
        let path = temp_token_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        std::fs::write(&path, "  abc\n").unwrap();
        assert_eq!(FileTokenStore::new(&path).load().unwrap().as_deref(), Some("abc"));

        std::fs::write(&path, "\n").unwrap();
        assert_eq!(FileTokenStore::new(&path).load().unwrap(), None);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_file_store_load_of_directory_is_io_error() {
        // Arrange: point the store at a directory, which cannot be read as a file
        let dir = std::env::temp_dir().join(format!("tv_remote_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        // Act
        let result = FileTokenStore::new(&dir).load();

        // Assert
        assert!(matches!(result, Err(TokenStoreError::Io { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_memory_store_starts_empty_and_overwrites() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("a").unwrap();
        store.save("b").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_memory_store_with_token() {
        let store = MemoryTokenStore::with_token("seed");
        assert_eq!(store.current().as_deref(), Some("seed"));
    }
}
