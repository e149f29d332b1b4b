//! The four ranked roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AccessError, PermissionSet, derive_permissions};

/// An identity tier.
///
/// Variants are declared from least to most privileged, so the derived
/// `Ord` agrees with [`rank`](Self::rank):
///
/// ```text
/// User (1) < Broker (2) < Admin (3) < SuperAdmin (4)
/// ```
///
/// This is a closed enum on purpose. Adding a fifth role breaks every
/// exhaustive `match` on it, including the permission table in
/// [`derive_permissions`], so the compiler lists every place that needs
/// a decision.
///
/// On the wire a role is its snake_case name: `"super_admin"`, `"admin"`,
/// `"broker"`, `"user"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// End user trading with their own API keys.
    User,
    /// Manages a book of users and their strategies.
    Broker,
    /// Manages brokers and platform-wide strategy approval.
    Admin,
    /// Owns the platform.
    SuperAdmin,
}

impl Role {
    /// Every role, lowest rank first.
    pub const ALL: [Role; 4] = [Role::User, Role::Broker, Role::Admin, Role::SuperAdmin];

    /// Numeric position in the hierarchy, 1 (USER) through 4 (SUPER_ADMIN).
    pub fn rank(self) -> u8 {
        match self {
            Role::User => 1,
            Role::Broker => 2,
            Role::Admin => 3,
            Role::SuperAdmin => 4,
        }
    }

    /// Returns `true` if this role is at least as high as `required`.
    ///
    /// This is the minimum-rank gate the guard uses for role-gated routes.
    /// It says nothing about permissions, which are looked up per role.
    pub fn meets(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// The permission set for this role. Shorthand for
    /// [`derive_permissions`].
    pub fn permissions(self) -> PermissionSet {
        derive_permissions(self)
    }

    /// The snake_case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Broker => "broker",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}
