//! # AlgoTrade
//!
//! Role-based access control for the AlgoTrade platform: who may log in,
//! who is logged in, and what they may see.
//!
//! The work is split across three crates, re-exported here:
//!
//! - [`access`]: roles, permissions, and the role to permission table
//! - [`session`]: the session store actor, its directory and persistence
//! - [`guard`]: route decisions, the route table, and sidebar visibility
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use algotrade::prelude::*;
//!
//! # async fn run() -> Result<(), AlgotradeError> {
//! let config = AlgotradeConfig::default();
//! let session = SessionStore::spawn(
//!     MockDirectory::seeded(config.directory.clone()),
//!     MemoryPersistence::new(),
//!     config.session.clone(),
//! );
//! session.login(Credentials::new("user@platform.com", DEMO_PASSWORD)).await;
//!
//! let routes = RouteTable::platform(config.guard.clone());
//! let _next = routes.navigate("/api-keys", &session.state());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use algotrade_access as access;
pub use algotrade_guard as guard;
pub use algotrade_session as session;

pub use config::AlgotradeConfig;
pub use error::AlgotradeError;

pub mod prelude {
    pub use crate::AlgotradeConfig;
    pub use crate::AlgotradeError;
    pub use algotrade_access::{Permission, PermissionSet, Role, derive_permissions};
    pub use algotrade_guard::{
        Decision, GuardConfig, NavItem, NavMenu, Navigation, Requirement, Route, RouteTable,
        Visibility, evaluate,
    };
    pub use algotrade_session::{
        Credentials, DEMO_PASSWORD, DirectoryConfig, FilePersistence, MemoryPersistence,
        MockDirectory, Registration, SessionConfig, SessionHandle, SessionPersistence,
        SessionState, SessionStore, User, UserDirectory, UserId,
    };
}
