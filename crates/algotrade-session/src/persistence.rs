//! Durable storage for the current session.
//!
//! The store never touches storage directly. It goes through
//! [`SessionPersistence`], a key/value interface shaped like a browser's
//! local storage: `load`, `save`, `clear`, all keyed by a string. That
//! keeps the session logic testable with [`MemoryPersistence`] and lets a
//! desktop or CLI client use [`FilePersistence`].
//!
//! The values are opaque strings here. What goes inside them is
//! [`SessionRecord`](crate::SessionRecord)'s business.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::SessionError;

/// Key/value storage for the persisted session record.
///
/// Calls are synchronous: the store makes at most one of them per
/// operation and they are expected to be quick, like `localStorage`.
pub trait SessionPersistence: Send + Sync + 'static {
    /// Returns the stored value, or `None` if nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Stores `value` under `key`, replacing what was there.
    fn save(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Removes `key`. Clearing a missing key is not an error.
    fn clear(&self, key: &str) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// MemoryPersistence
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, String>,
    saves: usize,
    fail_writes: bool,
}

/// In-process storage. Clones share the same map, so a test can hand one
/// clone to a store, drop the store, and hand another clone to a fresh
/// store to simulate a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw value under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Writes a raw value, bypassing the store. Used to plant corrupt or
    /// outdated records.
    pub fn set_raw(&self, key: &str, value: &str) {
        self.lock().values.insert(key.to_string(), value.to_string());
    }

    /// How many successful `save` calls have been made.
    pub fn saves(&self) -> usize {
        self.lock().saves
    }

    /// Makes `save` and `clear` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(SessionError::Storage("memory storage is read-only".into()));
        }
        state.values.insert(key.to_string(), value.to_string());
        state.saves += 1;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(SessionError::Storage("memory storage is read-only".into()));
        }
        state.values.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FilePersistence
// ---------------------------------------------------------------------------

/// Storage backed by one JSON file per key inside a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves either the old record or the new one.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
}

impl FilePersistence {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> SessionError {
    SessionError::Storage(format!("{action} {}: {err}", path.display()))
}

impl SessionPersistence for FilePersistence {
    fn load(&self, key: &str) -> Result<Option<String>, SessionError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error("read", &path, err)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir).map_err(|e| storage_error("create", &self.dir, e))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|e| storage_error("write", &tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_error("rename", &path, e))
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error("remove", &path, err)),
        }
    }
}
