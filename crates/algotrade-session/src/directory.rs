//! The user directory: where login and registration look users up.
//!
//! AlgoTrade doesn't authenticate anyone itself. A real deployment puts an
//! identity provider or backend API behind [`UserDirectory`]; the store
//! only needs "give me the user for these credentials" and "create this
//! user". [`MockDirectory`] is the in-memory stand-in used by the demo
//! and the tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use algotrade_access::Role;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{AuthFailure, Credentials, Registration, SessionError, User, UserId};

/// The password shared by every demo account. The mock never checks it.
pub const DEMO_PASSWORD: &str = "password";

/// Looks up and creates users on behalf of the session store.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store task may run on any runtime thread.
/// - `'static` → the directory lives as long as the store.
///
/// Both methods report refusals as
/// [`SessionError::AuthenticationFailed`]; the store turns every error
/// into a `false` for the caller.
pub trait UserDirectory: Send + Sync + 'static {
    /// Returns the active user matching `credentials`.
    ///
    /// # Errors
    /// - `AuthenticationFailed(NoMatchingAccount)` when nothing matches
    /// - `AuthenticationFailed(Backend)` when the call itself failed
    fn find_user(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<User, SessionError>> + Send;

    /// Creates and returns a new user.
    ///
    /// # Errors
    /// - `AuthenticationFailed(EmailTaken)` for a duplicate email
    /// - `AuthenticationFailed(Backend)` when the call itself failed
    fn create_user(
        &self,
        registration: Registration,
    ) -> impl std::future::Future<Output = Result<User, SessionError>> + Send;
}

// ---------------------------------------------------------------------------
// DirectoryConfig
// ---------------------------------------------------------------------------

/// Settings for [`MockDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Artificial delay before each lookup, standing in for network
    /// latency. Default: 1 second.
    pub latency: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
        }
    }
}

// ---------------------------------------------------------------------------
// MockDirectory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct DirectoryState {
    users: Vec<User>,
    unavailable: bool,
}

/// An in-memory directory that lives for the whole process.
///
/// Clones share the same user list, so a test can keep one clone to
/// inspect while the store owns another.
///
/// Matching rules, applied after the configured latency:
///
/// - email: exact, case-sensitive
/// - account: must be active
/// - role: if the credentials name one, it must be equal
/// - password: accepted as given, never verified
#[derive(Debug, Clone)]
pub struct MockDirectory {
    state: Arc<Mutex<DirectoryState>>,
    config: DirectoryConfig,
}

impl MockDirectory {
    /// An empty directory.
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(DirectoryState::default())),
            config,
        }
    }

    /// A directory holding one demo account per role.
    ///
    /// | id | email | role |
    /// |---|---|---|
    /// | 1 | superadmin@platform.com | super_admin |
    /// | 2 | admin@platform.com | admin |
    /// | 3 | broker@platform.com | broker (admin 2) |
    /// | 4 | user@platform.com | user (broker 3) |
    pub fn seeded(config: DirectoryConfig) -> Self {
        let directory = Self::new(config);
        {
            let mut state = directory.lock();
            state.users = demo_users();
        }
        directory
    }

    /// Number of users in the directory.
    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    /// Returns `true` if the directory has no users.
    pub fn is_empty(&self) -> bool {
        self.lock().users.is_empty()
    }

    /// A copy of every user record.
    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    /// Looks a user up by exact email, without latency or filters.
    pub fn get(&self, email: &str) -> Option<User> {
        self.lock().users.iter().find(|u| u.email == email).cloned()
    }

    /// Activates or deactivates an account. Returns `false` if the email
    /// is unknown.
    pub fn set_active(&self, email: &str, active: bool) -> bool {
        let mut state = self.lock();
        match state.users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.is_active = active;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Makes every following call fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryState> {
        // Every critical section leaves the list consistent, so a poisoned
        // lock still holds usable data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_call(&self) -> Result<(), SessionError> {
        tokio::time::sleep(self.config.latency).await;
        if self.lock().unavailable {
            return Err(AuthFailure::Backend("directory unavailable".into()).into());
        }
        Ok(())
    }
}

impl UserDirectory for MockDirectory {
    async fn find_user(&self, credentials: &Credentials) -> Result<User, SessionError> {
        self.simulate_call().await?;

        let state = self.lock();
        state
            .users
            .iter()
            .find(|u| {
                u.email == credentials.email
                    && u.is_active
                    && credentials.role.is_none_or(|role| u.role == role)
            })
            .cloned()
            .ok_or_else(|| AuthFailure::NoMatchingAccount.into())
    }

    async fn create_user(&self, registration: Registration) -> Result<User, SessionError> {
        self.simulate_call().await?;

        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == registration.email) {
            return Err(AuthFailure::EmailTaken.into());
        }

        let id = loop {
            let candidate = generate_id();
            if !state.users.iter().any(|u| u.id == candidate) {
                break candidate;
            }
        };
        let now = Utc::now();
        let user = User {
            id,
            email: registration.email,
            name: registration.name,
            role: registration.role.unwrap_or(Role::User),
            is_active: true,
            created_at: now,
            updated_at: now,
            broker_id: None,
            admin_id: None,
        };
        state.users.push(user.clone());

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }
}

fn demo_users() -> Vec<User> {
    let now = Utc::now();
    let demo = |id: &str, email: &str, name: &str, role: Role| User {
        id: UserId::from(id),
        email: email.to_string(),
        name: name.to_string(),
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
        broker_id: None,
        admin_id: None,
    };

    vec![
        demo("1", "superadmin@platform.com", "Super Admin", Role::SuperAdmin),
        demo("2", "admin@platform.com", "Platform Admin", Role::Admin),
        User {
            admin_id: Some(UserId::from("2")),
            ..demo("3", "broker@platform.com", "Broker User", Role::Broker)
        },
        User {
            broker_id: Some(UserId::from("3")),
            ..demo("4", "user@platform.com", "Regular User", Role::User)
        },
    ]
}

/// A random 32-character hex id (128 bits).
fn generate_id() -> UserId {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    UserId(bytes.iter().map(|b| format!("{b:02x}")).collect())
}
