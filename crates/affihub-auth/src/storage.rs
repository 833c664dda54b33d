//! Identity store: durable record of the current user.
//!
//! [`FileIdentityStore`] keeps a single JSON record at
//! `<dataDir>/<recordName>.json` with file permissions 0o600. Loading is
//! fail-soft: an unreadable record yields `None`, and a malformed one is also
//! deleted so the next start begins clean.
//!
//! [`MemoryIdentityStore`] holds the record in process memory and backs
//! sessions configured with `persist = false`.

use std::path::{Path, PathBuf};

use affihub_core::User;
use affihub_settings::StorageSettings;
use parking_lot::Mutex;

use crate::errors::AuthError;

/// Where the session mirrors its current user.
pub trait IdentityStore: Send + Sync {
    /// The saved user, or `None` if there is none or it could not be read.
    fn load(&self) -> Option<User>;

    /// Persist `user`, replacing any previous record.
    fn save(&self, user: &User) -> Result<(), AuthError>;

    /// Remove the record. Removing a missing record succeeds.
    fn clear(&self) -> Result<(), AuthError>;
}

/// JSON file backed identity store.
#[derive(Clone, Debug)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Store the record at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the record where `storage` says: `<dataDir>/<recordName>.json`.
    pub fn from_settings(storage: &StorageSettings) -> Self {
        Self::new(storage.record_path())
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn discard_corrupt(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = ?self.path, "removed corrupt user record"),
            Err(e) => tracing::warn!(path = ?self.path, "failed to remove corrupt user record: {e}"),
        }
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Option<User> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = ?self.path, "failed to read user record: {e}");
                return None;
            }
        };

        match serde_json::from_str::<User>(&data) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(path = ?self.path, "failed to parse user record, discarding: {e}");
                self.discard_corrupt();
                None
            }
        }
    }

    /// Writes to a staging file and renames it over the record, so a reader
    /// never sees a half-written record.
    fn save(&self, user: &User) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(user)?;
        let staging = self.staging_path();
        std::fs::write(&staging, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&staging, perms);
        }

        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Io(e)),
        }
    }
}

/// In-process identity store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    record: Mutex<Option<User>>,
}

impl MemoryIdentityStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `user`, as if a previous run had saved it.
    pub fn with_user(user: User) -> Self {
        Self {
            record: Mutex::new(Some(user)),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Option<User> {
        self.record.lock().clone()
    }

    fn save(&self, user: &User) -> Result<(), AuthError> {
        *self.record.lock() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.record.lock() = None;
        Ok(())
    }
}
