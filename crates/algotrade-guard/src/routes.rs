//! The route table: which paths exist and what each one requires.

use std::collections::HashMap;

use algotrade_access::{Permission, Role};
use algotrade_session::SessionState;

use crate::{Decision, GuardConfig, Requirement, evaluate};

/// How many alias hops [`RouteTable::navigate`] follows before giving up.
const MAX_ALIAS_HOPS: usize = 8;

/// One entry in the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Rendered for anyone, logged in or not.
    Public,

    /// Rendered only when [`evaluate`] allows it.
    Protected {
        requirement: Requirement,
        /// Where anonymous visitors go instead of the configured login path.
        fallback: Option<String>,
    },

    /// Forwards to another path.
    Alias { to: String },
}

impl Route {
    pub fn protected(requirement: Requirement) -> Self {
        Route::Protected {
            requirement,
            fallback: None,
        }
    }

    pub fn alias(to: impl Into<String>) -> Self {
        Route::Alias { to: to.into() }
    }
}

/// What a router should do for a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render { path: String },
    Redirect { to: String },
    NotFound,
}

/// Path to [`Route`] lookup plus the redirect targets.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
    config: GuardConfig,
}

impl RouteTable {
    /// An empty table.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            routes: HashMap::new(),
            config,
        }
    }

    /// The AlgoTrade application's routes.
    ///
    /// `/` forwards to the configured home path. `/login` and
    /// `/unauthorized` take their paths from `config`.
    pub fn platform(config: GuardConfig) -> Self {
        use Permission::*;

        let home = config.home_path.clone();
        let login = config.login_path.clone();
        let unauthorized = config.unauthorized_path.clone();

        let mut table = Self::new(config).with_route("/", Route::alias(home));
        table.insert(login, Route::Public);
        table.insert(unauthorized, Route::Public);

        let by_permission = [
            ("/dashboard", ViewDashboard),
            ("/portfolio", ViewDashboard),
            ("/settings", ViewDashboard),
            ("/strategy-builder", SelectStrategies),
            ("/social-trading", SelectStrategies),
            ("/analytics", ViewAnalytics),
            ("/admin", ManageBrokers),
            ("/user-management", ManageUsers),
            ("/broker-panel", CreateUsers),
            ("/api-keys", AddApiKeys),
        ];
        for (path, permission) in by_permission {
            table.insert(path, Route::protected(Requirement::permission(permission)));
        }

        for path in ["/super-admin", "/platform-settings", "/audit-logs"] {
            table.insert(path, Route::protected(Requirement::role(Role::SuperAdmin)));
        }

        table
    }

    /// Adds or replaces the route at `path`.
    pub fn insert(&mut self, path: impl Into<String>, route: Route) {
        self.routes.insert(path.into(), route);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_route(mut self, path: impl Into<String>, route: Route) -> Self {
        self.insert(path, route);
        self
    }

    pub fn get(&self, path: &str) -> Option<&Route> {
        self.routes.get(path)
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Every declared path, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Decides what to do with a request for `path`.
    ///
    /// Aliases are followed first; a request for `/` is reported as a
    /// redirect to wherever the alias chain ends, so the address the user
    /// sees matches the page. Chains longer than [`MAX_ALIAS_HOPS`], cycles,
    /// and unknown paths give [`Navigation::NotFound`].
    pub fn navigate(&self, path: &str, state: &SessionState) -> Navigation {
        let Some((target, route)) = self.resolve(path) else {
            tracing::debug!(path, "no route");
            return Navigation::NotFound;
        };
        if target != path {
            return Navigation::Redirect {
                to: target.to_string(),
            };
        }

        match route {
            Route::Public => Navigation::Render {
                path: target.to_string(),
            },
            Route::Protected {
                requirement,
                fallback,
            } => match evaluate(state, requirement) {
                Decision::Allow => Navigation::Render {
                    path: target.to_string(),
                },
                Decision::RedirectToLogin => Navigation::Redirect {
                    to: fallback
                        .clone()
                        .unwrap_or_else(|| self.config.login_path.clone()),
                },
                Decision::RedirectToUnauthorized => Navigation::Redirect {
                    to: self.config.unauthorized_path.clone(),
                },
            },
            // resolve never returns an alias
            Route::Alias { .. } => Navigation::NotFound,
        }
    }

    /// Follows aliases from `path` to a non-alias route.
    fn resolve<'a>(&'a self, path: &'a str) -> Option<(&'a str, &'a Route)> {
        let mut current = path;
        for _ in 0..=MAX_ALIAS_HOPS {
            match self.routes.get(current)? {
                Route::Alias { to } => current = to.as_str(),
                route => return Some((current, route)),
            }
        }
        tracing::warn!(path, "alias chain too long");
        None
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::platform(GuardConfig::default())
    }
}
