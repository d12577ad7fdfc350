//! Session credential storage.
//!
//! The bearer token lives in a single key/value cell keyed by
//! [`SESSION_TOKEN_KEY`]. The client reads it before every request and clears
//! it when the backend answers 401; a login flow writes it. There is no
//! compare-and-swap: the last writer wins.

use crate::error::Result;
use secrecy::{ExposeSecret, SecretString};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Fixed storage key of the session token.
pub const SESSION_TOKEN_KEY: &str = "harbory_token";

/// Abstraction over wherever the session token is persisted.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Read the current token. `None` means unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self) -> Result<Option<SecretString>>;

    /// Replace the current token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, token: SecretString) -> Result<()>;

    /// Remove the current token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn clear(&self) -> Result<()>;
}

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<SecretString>> {
        let guard = self
            .token
            .read()
            .map_err(|_| crate::Error::CredentialStore("token lock poisoned".to_string()))?;
        Ok(guard
            .as_ref()
            .map(|token| SecretString::from(token.expose_secret().to_owned())))
    }

    fn set(&self, token: SecretString) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| crate::Error::CredentialStore("token lock poisoned".to_string()))?;
        *guard = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| crate::Error::CredentialStore("token lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Credential store persisting the token in a file named [`SESSION_TOKEN_KEY`]
/// inside a directory, so a session survives process restarts.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_TOKEN_KEY),
        }
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<SecretString>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_owned())))
                }
            }
            Err(err) if err.kind() == IoErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, token: SecretString) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file and rename so readers never see a partial token.
        let temp_path = self
            .path
            .with_file_name(format!("{SESSION_TOKEN_KEY}.tmp.{}", std::process::id()));
        if let Err(err) = write_private(&temp_path, token.expose_secret().as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        debug!(path = %self.path.display(), "Stored session token");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed session token");
                Ok(())
            }
            Err(err) if err.kind() == IoErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Create `path` readable by the owner only and write `contents` to it.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
