//! Session management for AlgoTrade.
//!
//! This crate answers one question: who is logged in right now?
//!
//! 1. **Directory**: where user records come from ([`UserDirectory`]
//!    trait, with [`MockDirectory`] standing in for a real backend)
//! 2. **Persistence**: where the current session survives a reload
//!    ([`SessionPersistence`] trait, [`MemoryPersistence`],
//!    [`FilePersistence`])
//! 3. **Store**: the single owner of the session state
//!    ([`SessionStore`] actor, driven through a [`SessionHandle`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Guard Layer (above)  ← reads SessionState on every navigation
//!     ↕
//! Session Layer (this crate)  ← login / register / logout / restore
//!     ↕
//! Access Layer (below)  ← Role, PermissionSet
//! ```

#![allow(async_fn_in_trait)]

mod directory;
mod error;
mod persistence;
mod record;
mod state;
mod store;
mod user;

pub use directory::{DEMO_PASSWORD, DirectoryConfig, MockDirectory, UserDirectory};
pub use error::{AuthFailure, SessionError};
pub use persistence::{FilePersistence, MemoryPersistence, SessionPersistence};
pub use record::{RECORD_VERSION, SessionRecord};
pub use state::{SessionConfig, SessionState};
pub use store::{SessionHandle, SessionStore};
pub use user::{Credentials, Registration, User, UserId};
