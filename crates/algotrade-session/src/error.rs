//! Error types for the session layer.
//!
//! None of these escape the [`SessionHandle`](crate::SessionHandle): login
//! and registration resolve to a `bool` plus a message on the published
//! state, and a corrupt stored session is quietly discarded. The enum
//! exists so the collaborators (directory, persistence) have something
//! precise to return, and so the store can log what actually happened.

/// Why an authentication attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// No active account matches the email (and role, if one was given).
    ///
    /// Bad email, inactive account, and role mismatch are deliberately
    /// folded together so a login form can't be used to probe which one
    /// it was.
    #[error("no matching active account")]
    NoMatchingAccount,

    /// Registration with an email that is already in the directory.
    #[error("email already registered")]
    EmailTaken,

    /// The backend call itself failed (simulated outage, timeout, ...).
    #[error("directory call failed: {0}")]
    Backend(String),
}

/// Errors that can occur inside the session layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Credentials or registration data were rejected.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(AuthFailure),

    /// The persisted session record could not be used: malformed JSON,
    /// unknown version, or an account that is no longer active.
    #[error("stored session is unusable: {0}")]
    RestoreCorrupt(String),

    /// Reading or writing the persisted record failed.
    #[error("session storage failed: {0}")]
    Storage(String),

    /// The store task is gone (shut down, or every handle was dropped).
    #[error("session store is unavailable")]
    Unavailable,
}

impl SessionError {
    /// A message that can be shown to the person at the login form.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::AuthenticationFailed(AuthFailure::NoMatchingAccount) => {
                "invalid credentials or role mismatch"
            }
            SessionError::AuthenticationFailed(AuthFailure::EmailTaken) => {
                "an account with this email already exists"
            }
            SessionError::AuthenticationFailed(AuthFailure::Backend(_))
            | SessionError::Storage(_)
            | SessionError::Unavailable => "authentication service unavailable",
            SessionError::RestoreCorrupt(_) => "please sign in again",
        }
    }
}

impl From<AuthFailure> for SessionError {
    fn from(failure: AuthFailure) -> Self {
        SessionError::AuthenticationFailed(failure)
    }
}
