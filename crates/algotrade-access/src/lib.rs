//! Role and permission model for AlgoTrade.
//!
//! This crate is the bottom of the stack. It knows nothing about sessions
//! or routes, only about:
//!
//! - **Roles** ([`Role`]): the four ranked identity tiers
//! - **Permissions** ([`Permission`], [`PermissionSet`]): the 20 named
//!   capabilities and the fixed-shape record of them
//! - **The table** ([`derive_permissions`]): the pure mapping from a role
//!   to its permission set
//!
//! # How it fits in the stack
//!
//! ```text
//! Guard Layer (above)    ← decides allow/redirect for a navigation target
//!     ↕
//! Session Layer          ← holds who is logged in
//!     ↕
//! Access Layer (this crate)  ← role → permissions, no state
//! ```

mod error;
mod permission;
mod role;

pub use error::AccessError;
pub use permission::{Permission, PermissionSet, derive_permissions};
pub use role::Role;
