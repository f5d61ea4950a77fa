//! Session persistence capability
//!
//! The customer's cart and table binding survive reloads through a
//! [`SessionStore`] injected by the caller.

use super::CustomerSession;
use super::SessionError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// load()/save() persistence for a [`CustomerSession`]
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<CustomerSession>, SessionError>;

    fn save(&self, session: &CustomerSession) -> Result<(), SessionError>;
}

/// JSON file on disk, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<Option<CustomerSession>, SessionError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &CustomerSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "Customer session saved");
        Ok(())
    }
}

/// In-memory store holding the serialized form (tests and previews)
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<CustomerSession>, SessionError> {
        match self.slot.lock().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &CustomerSession) -> Result<(), SessionError> {
        let json = serde_json::to_string(session)?;
        *self.slot.lock() = Some(json);
        Ok(())
    }
}
