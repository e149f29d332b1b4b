//! The guard decision.

use algotrade_access::{Permission, Role};
use algotrade_session::SessionState;
use serde::{Deserialize, Serialize};

/// What a destination asks of the session.
///
/// Both parts are optional; an empty requirement only asks that someone be
/// logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Requirement {
    /// Minimum role. Any role of equal or higher rank passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// A permission the user's role must grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
}

impl Requirement {
    /// Authenticated, nothing else.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn role(role: Role) -> Self {
        Self::none().and_role(role)
    }

    pub fn permission(permission: Permission) -> Self {
        Self::none().and_permission(permission)
    }

    pub fn and_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn and_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Render the destination.
    Allow,
    /// Nobody is logged in.
    RedirectToLogin,
    /// Logged in, but the role is too low or the permission is missing.
    RedirectToUnauthorized,
}

/// Decides whether `state` may see a destination requiring `requirement`.
///
/// Rules, first match wins:
///
/// 1. not authenticated: [`Decision::RedirectToLogin`]
/// 2. a role is required and the user's rank is below it:
///    [`Decision::RedirectToUnauthorized`]
/// 3. a permission is required and the user's role doesn't grant it:
///    [`Decision::RedirectToUnauthorized`]
/// 4. otherwise [`Decision::Allow`]
///
/// Permissions are derived from the role on every call, so a role change is
/// picked up immediately. A first login still in flight counts as
/// anonymous; a second one keeps the current user's access until it resolves.
pub fn evaluate(state: &SessionState, requirement: &Requirement) -> Decision {
    let Some(user) = state.user() else {
        tracing::debug!(?requirement, "guard: anonymous, redirecting to login");
        return Decision::RedirectToLogin;
    };

    if let Some(required) = requirement.role {
        if !user.role.meets(required) {
            tracing::debug!(user_id = %user.id, role = %user.role, %required, "guard: role too low");
            return Decision::RedirectToUnauthorized;
        }
    }

    if let Some(permission) = requirement.permission {
        if !user.role.permissions().get(permission) {
            tracing::debug!(user_id = %user.id, role = %user.role, %permission, "guard: permission missing");
            return Decision::RedirectToUnauthorized;
        }
    }

    Decision::Allow
}
