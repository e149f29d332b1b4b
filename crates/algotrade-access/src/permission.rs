//! Permissions and the role-to-permission table.
//!
//! There are two views of the same 20 capabilities:
//!
//! - [`Permission`] names ONE capability. Route declarations and the
//!   guard use it ("this page needs `viewPnL`").
//! - [`PermissionSet`] is the full record of 20 booleans for a role.
//!   UI code that wants to show or hide several things at once uses it.
//!
//! [`PermissionSet::get`] connects the two with an exhaustive match, so a
//! new capability can't be added to one view and forgotten in the other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AccessError, Role};

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

/// A single named capability.
///
/// Serialized in camelCase (`"manageBrokers"`, `"viewPnL"`), which is also
/// what [`Display`](fmt::Display) and [`FromStr`] use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    // -- Platform (super admin) --
    ManagePlatform,
    ManageAllAdmins,
    ManageAllBrokers,
    ViewPlatformAnalytics,
    ManageSubscriptions,
    ManageAuditLogs,

    // -- Admin --
    ManageBrokers,
    ManageUsers,
    ApproveStrategies,
    SetBrokerRules,
    ViewAnalytics,

    // -- Broker --
    CreateUsers,
    ApproveUserStrategies,
    CreateBrokerStrategies,
    ViewPnL,
    SendNotifications,

    // -- User --
    AddApiKeys,
    SelectStrategies,
    ViewDashboard,
    ViewTradeLogs,
}

impl Permission {
    /// Every permission, in table order.
    pub const ALL: [Permission; 20] = [
        Permission::ManagePlatform,
        Permission::ManageAllAdmins,
        Permission::ManageAllBrokers,
        Permission::ViewPlatformAnalytics,
        Permission::ManageSubscriptions,
        Permission::ManageAuditLogs,
        Permission::ManageBrokers,
        Permission::ManageUsers,
        Permission::ApproveStrategies,
        Permission::SetBrokerRules,
        Permission::ViewAnalytics,
        Permission::CreateUsers,
        Permission::ApproveUserStrategies,
        Permission::CreateBrokerStrategies,
        Permission::ViewPnL,
        Permission::SendNotifications,
        Permission::AddApiKeys,
        Permission::SelectStrategies,
        Permission::ViewDashboard,
        Permission::ViewTradeLogs,
    ];

    /// The camelCase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ManagePlatform => "managePlatform",
            Permission::ManageAllAdmins => "manageAllAdmins",
            Permission::ManageAllBrokers => "manageAllBrokers",
            Permission::ViewPlatformAnalytics => "viewPlatformAnalytics",
            Permission::ManageSubscriptions => "manageSubscriptions",
            Permission::ManageAuditLogs => "manageAuditLogs",
            Permission::ManageBrokers => "manageBrokers",
            Permission::ManageUsers => "manageUsers",
            Permission::ApproveStrategies => "approveStrategies",
            Permission::SetBrokerRules => "setBrokerRules",
            Permission::ViewAnalytics => "viewAnalytics",
            Permission::CreateUsers => "createUsers",
            Permission::ApproveUserStrategies => "approveUserStrategies",
            Permission::CreateBrokerStrategies => "createBrokerStrategies",
            Permission::ViewPnL => "viewPnL",
            Permission::SendNotifications => "sendNotifications",
            Permission::AddApiKeys => "addApiKeys",
            Permission::SelectStrategies => "selectStrategies",
            Permission::ViewDashboard => "viewDashboard",
            Permission::ViewTradeLogs => "viewTradeLogs",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AccessError::UnknownPermission(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// PermissionSet
// ---------------------------------------------------------------------------

/// The full capability record for a role.
///
/// This is a plain value: it is produced by [`derive_permissions`] and
/// never edited in place. Holding on to one across a role change would
/// give stale answers, so callers recompute from the current role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub manage_platform: bool,
    pub manage_all_admins: bool,
    pub manage_all_brokers: bool,
    pub view_platform_analytics: bool,
    pub manage_subscriptions: bool,
    pub manage_audit_logs: bool,

    pub manage_brokers: bool,
    pub manage_users: bool,
    pub approve_strategies: bool,
    pub set_broker_rules: bool,
    pub view_analytics: bool,

    pub create_users: bool,
    pub approve_user_strategies: bool,
    pub create_broker_strategies: bool,
    // camelCase would give "viewPnl".
    #[serde(rename = "viewPnL")]
    pub view_pnl: bool,
    pub send_notifications: bool,

    pub add_api_keys: bool,
    pub select_strategies: bool,
    pub view_dashboard: bool,
    pub view_trade_logs: bool,
}

impl PermissionSet {
    /// The set with nothing granted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Looks up one capability.
    pub fn get(&self, permission: Permission) -> bool {
        match permission {
            Permission::ManagePlatform => self.manage_platform,
            Permission::ManageAllAdmins => self.manage_all_admins,
            Permission::ManageAllBrokers => self.manage_all_brokers,
            Permission::ViewPlatformAnalytics => self.view_platform_analytics,
            Permission::ManageSubscriptions => self.manage_subscriptions,
            Permission::ManageAuditLogs => self.manage_audit_logs,
            Permission::ManageBrokers => self.manage_brokers,
            Permission::ManageUsers => self.manage_users,
            Permission::ApproveStrategies => self.approve_strategies,
            Permission::SetBrokerRules => self.set_broker_rules,
            Permission::ViewAnalytics => self.view_analytics,
            Permission::CreateUsers => self.create_users,
            Permission::ApproveUserStrategies => self.approve_user_strategies,
            Permission::CreateBrokerStrategies => self.create_broker_strategies,
            Permission::ViewPnL => self.view_pnl,
            Permission::SendNotifications => self.send_notifications,
            Permission::AddApiKeys => self.add_api_keys,
            Permission::SelectStrategies => self.select_strategies,
            Permission::ViewDashboard => self.view_dashboard,
            Permission::ViewTradeLogs => self.view_trade_logs,
        }
    }

    /// The granted capabilities, in table order.
    pub fn granted(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.get(*p))
    }
}

// ---------------------------------------------------------------------------
// The table
// ---------------------------------------------------------------------------

/// Maps a role to its permission set.
///
/// This is a lookup table, not a computed union: each arm spells out all
/// 20 fields, so nothing is `false` just because someone forgot a line.
/// SUPER_ADMIN happens to hold everything, but ADMIN and BROKER are
/// disjoint apart from `viewDashboard`, and BROKER has no `viewTradeLogs`.
pub fn derive_permissions(role: Role) -> PermissionSet {
    match role {
        Role::SuperAdmin => PermissionSet {
            manage_platform: true,
            manage_all_admins: true,
            manage_all_brokers: true,
            view_platform_analytics: true,
            manage_subscriptions: true,
            manage_audit_logs: true,
            manage_brokers: true,
            manage_users: true,
            approve_strategies: true,
            set_broker_rules: true,
            view_analytics: true,
            create_users: true,
            approve_user_strategies: true,
            create_broker_strategies: true,
            view_pnl: true,
            send_notifications: true,
            add_api_keys: true,
            select_strategies: true,
            view_dashboard: true,
            view_trade_logs: true,
        },
        Role::Admin => PermissionSet {
            manage_platform: false,
            manage_all_admins: false,
            manage_all_brokers: false,
            view_platform_analytics: false,
            manage_subscriptions: false,
            manage_audit_logs: false,
            manage_brokers: true,
            manage_users: true,
            approve_strategies: true,
            set_broker_rules: true,
            view_analytics: true,
            create_users: false,
            approve_user_strategies: false,
            create_broker_strategies: false,
            view_pnl: false,
            send_notifications: false,
            add_api_keys: false,
            select_strategies: false,
            view_dashboard: true,
            view_trade_logs: false,
        },
        Role::Broker => PermissionSet {
            manage_platform: false,
            manage_all_admins: false,
            manage_all_brokers: false,
            view_platform_analytics: false,
            manage_subscriptions: false,
            manage_audit_logs: false,
            manage_brokers: false,
            manage_users: false,
            approve_strategies: false,
            set_broker_rules: false,
            view_analytics: false,
            create_users: true,
            approve_user_strategies: true,
            create_broker_strategies: true,
            view_pnl: true,
            send_notifications: true,
            add_api_keys: false,
            select_strategies: false,
            view_dashboard: true,
            view_trade_logs: false,
        },
        Role::User => PermissionSet {
            manage_platform: false,
            manage_all_admins: false,
            manage_all_brokers: false,
            view_platform_analytics: false,
            manage_subscriptions: false,
            manage_audit_logs: false,
            manage_brokers: false,
            manage_users: false,
            approve_strategies: false,
            set_broker_rules: false,
            view_analytics: false,
            create_users: false,
            approve_user_strategies: false,
            create_broker_strategies: false,
            view_pnl: false,
            send_notifications: false,
            add_api_keys: true,
            select_strategies: true,
            view_dashboard: true,
            view_trade_logs: true,
        },
    }
}
