//! The persisted session record.
//!
//! What lands in storage is a small versioned envelope around the user:
//!
//! ```json
//! { "version": 1, "user": { "id": "4", "email": "user@platform.com", ... } }
//! ```
//!
//! The version comes first so a future layout can be told apart from a
//! damaged one. Anything that doesn't decode cleanly into the current
//! version is treated as corrupt and thrown away by the store.

use serde::{Deserialize, Serialize};

use crate::{SessionError, User};

/// The record layout this build writes and accepts.
pub const RECORD_VERSION: u32 = 1;

/// A persisted session: the authenticated user plus a layout version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub version: u32,
    pub user: User,
}

/// Reads just the version, ignoring the rest of the object.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl SessionRecord {
    /// Wraps `user` in a current-version record.
    pub fn new(user: User) -> Self {
        Self {
            version: RECORD_VERSION,
            user,
        }
    }

    /// Serializes the record to JSON.
    ///
    /// # Errors
    /// [`SessionError::Storage`] if serialization fails.
    pub fn encode(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::Storage(format!("encode: {e}")))
    }

    /// Parses a stored value and returns the user inside it.
    ///
    /// # Errors
    /// [`SessionError::RestoreCorrupt`] if the value is not JSON, has no
    /// or an unknown version, doesn't match the layout, or holds an
    /// inactive account.
    pub fn decode(raw: &str) -> Result<User, SessionError> {
        let probe: VersionProbe = serde_json::from_str(raw)
            .map_err(|e| SessionError::RestoreCorrupt(format!("unreadable record: {e}")))?;
        if probe.version != RECORD_VERSION {
            return Err(SessionError::RestoreCorrupt(format!(
                "unsupported record version {}",
                probe.version
            )));
        }

        let record: SessionRecord = serde_json::from_str(raw)
            .map_err(|e| SessionError::RestoreCorrupt(format!("malformed record: {e}")))?;
        if !record.user.is_active {
            return Err(SessionError::RestoreCorrupt(format!(
                "account {} is inactive",
                record.user.id
            )));
        }
        Ok(record.user)
    }
}
