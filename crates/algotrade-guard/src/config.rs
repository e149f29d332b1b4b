//! Guard configuration.

use serde::{Deserialize, Serialize};

/// Where the guard sends people it turns away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Redirect for anonymous sessions. A route can override it.
    pub login_path: String,

    /// Redirect for authenticated sessions that lack the role or permission.
    pub unauthorized_path: String,

    /// Landing page after login, and the target of the `/` alias.
    pub home_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}
