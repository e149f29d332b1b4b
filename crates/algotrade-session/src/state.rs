//! Session state and configuration.

use algotrade_access::{Permission, PermissionSet, Role};
use serde::{Deserialize, Serialize};

use crate::User;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage key the session record is kept under. Default: `"user"`.
    pub storage_key: String,

    /// Whether [`SessionStore::spawn`](crate::SessionStore::spawn) restores
    /// a persisted session before returning. Default: `true`.
    pub restore_on_start: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "user".to_string(),
            restore_on_start: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Who is logged in, as published by the store.
///
/// ```text
///                   login/register            accepted
///   Idle, LoginFailed ────────────→ LoggingIn ─────────→ Authenticated(user) ↺ restore
///       ↑    ↑                          │                   │     ↑
///       │    └───────── refused ────────┘    login/register │     │ accepted or refused
///       │                                                   ↓     │
///       │                                         Reauthenticating(user)
///       └──────────────── logout (from Authenticated) ─────────────
/// ```
///
/// `Idle` and `LoginFailed` are both anonymous. `LoginFailed` only exists
/// so a login form can show `message` until the next attempt. An attempt
/// made while someone is logged in goes through `Reauthenticating`, which
/// still holds that user, and a refusal goes back to them: only `logout`
/// ends an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nobody is logged in.
    #[default]
    Idle,

    /// A login or registration is in flight. Anonymous.
    LoggingIn,

    /// A user is logged in.
    Authenticated(User),

    /// A user is logged in and another login or registration is in flight.
    Reauthenticating(User),

    /// The last attempt was refused. Anonymous.
    LoginFailed { message: String },
}

impl SessionState {
    /// The logged-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) | SessionState::Reauthenticating(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// `true` while a login or registration is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            SessionState::LoggingIn | SessionState::Reauthenticating(_)
        )
    }

    /// The message from the last refused attempt.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::LoginFailed { message } => Some(message),
            _ => None,
        }
    }

    /// The role whose permissions apply right now.
    ///
    /// Anonymous states report USER, so menus rendered before login show
    /// the same entries a fresh user would get. Access decisions don't
    /// rely on this; the guard checks authentication first.
    pub fn effective_role(&self) -> Role {
        self.user().map(|u| u.role).unwrap_or(Role::User)
    }

    /// Permissions for [`effective_role`](Self::effective_role), derived
    /// fresh on every call.
    pub fn permissions(&self) -> PermissionSet {
        self.effective_role().permissions()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().get(permission)
    }
}
