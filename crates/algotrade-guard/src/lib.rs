//! Access guarding for AlgoTrade views.
//!
//! The guard is a pure decision: given the current [`SessionState`] and
//! what a view requires, say whether to render it or where to send the
//! user instead. It never navigates and never mutates the session.
//!
//! # Key types
//!
//! - [`evaluate`]: the three-way decision ([`Decision`])
//! - [`Requirement`]: what a destination asks for (role, permission, both, or nothing)
//! - [`RouteTable`]: the declarations a router consults per path
//! - [`NavMenu`]: which sidebar entries to show for a session
//! - [`GuardConfig`]: where the redirects point
//!
//! [`SessionState`]: algotrade_session::SessionState

mod config;
mod decision;
mod menu;
mod routes;

pub use config::GuardConfig;
pub use decision::{Decision, Requirement, evaluate};
pub use menu::{NavItem, NavMenu, Visibility};
pub use routes::{Navigation, Route, RouteTable};
