//! Sidebar entries and who gets to see them.
//!
//! Visibility is a display concern, separate from [`evaluate`](crate::evaluate):
//! hiding an entry doesn't protect the page behind it, and the two can
//! disagree. An anonymous session, for instance, sees the permission-gated
//! entries a fresh USER would, because [`SessionState::has_permission`]
//! falls back to the USER table.

use algotrade_access::{Permission, Role};
use algotrade_session::SessionState;

/// Who an entry is shown to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Only these exact roles. Rank doesn't count, and anonymous sessions
    /// never match.
    Roles(Vec<Role>),
    /// Whoever [`SessionState::has_permission`] says holds this permission.
    Permission(Permission),
    Always,
}

impl Visibility {
    pub fn allows(&self, state: &SessionState) -> bool {
        match self {
            Visibility::Roles(roles) => state.user().is_some_and(|u| roles.contains(&u.role)),
            Visibility::Permission(permission) => state.has_permission(*permission),
            Visibility::Always => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub path: String,
    pub label: String,
    pub visibility: Visibility,
}

impl NavItem {
    pub fn new(path: impl Into<String>, label: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            visibility,
        }
    }
}

/// An ordered list of sidebar entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavMenu {
    items: Vec<NavItem>,
}

impl NavMenu {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self { items }
    }

    /// The AlgoTrade sidebar, in display order.
    pub fn platform() -> Self {
        use Permission::*;
        use Visibility::Permission as Perm;

        let root_only = || Visibility::Roles(vec![Role::SuperAdmin]);

        Self::new(vec![
            NavItem::new("/dashboard", "Dashboard", Perm(ViewDashboard)),
            NavItem::new("/strategy-builder", "AI Strategy Builder", Perm(SelectStrategies)),
            NavItem::new("/social-trading", "Social Trading", Perm(SelectStrategies)),
            NavItem::new("/portfolio", "Portfolio", Perm(ViewDashboard)),
            NavItem::new("/analytics", "Analytics", Perm(ViewAnalytics)),
            NavItem::new("/super-admin", "Super Admin", root_only()),
            NavItem::new("/platform-settings", "Platform Settings", root_only()),
            NavItem::new("/audit-logs", "Audit Logs", root_only()),
            NavItem::new("/admin", "Admin Panel", Perm(ManageBrokers)),
            NavItem::new("/user-management", "User Management", Perm(ManageUsers)),
            NavItem::new("/broker-panel", "Broker Panel", Perm(CreateUsers)),
            NavItem::new("/api-keys", "API Keys", Perm(AddApiKeys)),
            NavItem::new("/settings", "Settings", Perm(ViewDashboard)),
        ])
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// The entries `state` should see, in order.
    pub fn visible<'a>(&'a self, state: &SessionState) -> Vec<&'a NavItem> {
        self.items
            .iter()
            .filter(|item| item.visibility.allows(state))
            .collect()
    }
}
