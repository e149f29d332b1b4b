//! Integration tests for the session store actor.
//!
//! Every async test runs with `start_paused = true`: the mock directory's
//! one-second latency elapses instantly because Tokio auto-advances the
//! clock whenever the runtime is idle.

use algotrade_access::{Permission, Role};
use algotrade_session::{
    Credentials, DEMO_PASSWORD, DirectoryConfig, FilePersistence, MemoryPersistence,
    MockDirectory, Registration, SessionConfig, SessionHandle, SessionPersistence, SessionRecord,
    SessionState, SessionStore,
};

// =========================================================================
// Helpers
// =========================================================================

const KEY: &str = "user";

fn directory() -> MockDirectory {
    MockDirectory::seeded(DirectoryConfig::default())
}

fn spawn(directory: &MockDirectory, storage: &MemoryPersistence) -> SessionHandle {
    SessionStore::spawn(directory.clone(), storage.clone(), SessionConfig::default())
}

fn demo(email: &str) -> Credentials {
    Credentials::new(email, DEMO_PASSWORD)
}

fn stored_user(storage: &MemoryPersistence) -> Option<algotrade_session::User> {
    storage
        .get(KEY)
        .map(|raw| SessionRecord::decode(&raw).expect("stored record should decode"))
}

// =========================================================================
// Startup
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_spawn_without_record_starts_idle() {
    let handle = spawn(&directory(), &MemoryPersistence::new());
    assert_eq!(handle.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_with_corrupt_record_clears_it_and_stays_idle() {
    let storage = MemoryPersistence::new();
    storage.set_raw(KEY, "{ definitely not a user");

    let handle = spawn(&directory(), &storage);

    assert_eq!(handle.state(), SessionState::Idle);
    assert_eq!(storage.get(KEY), None, "corrupt record should be removed");
}

#[tokio::test(start_paused = true)]
async fn test_spawn_with_unknown_version_clears_it() {
    let storage = MemoryPersistence::new();
    let user = directory().get("admin@platform.com").unwrap();
    let mut record = serde_json::to_value(SessionRecord::new(user)).unwrap();
    record["version"] = serde_json::json!(99);
    storage.set_raw(KEY, &record.to_string());

    let handle = spawn(&directory(), &storage);

    assert_eq!(handle.state(), SessionState::Idle);
    assert_eq!(storage.get(KEY), None);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_with_restore_disabled_ignores_record() {
    let dir = directory();
    let storage = MemoryPersistence::new();
    let first = spawn(&dir, &storage);
    assert!(first.login(demo("user@platform.com")).await);

    let config = SessionConfig {
        restore_on_start: false,
        ..SessionConfig::default()
    };
    let second = SessionStore::spawn(dir, storage.clone(), config);

    assert_eq!(second.state(), SessionState::Idle);
    assert!(storage.get(KEY).is_some(), "record is left alone");
}

// =========================================================================
// login()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_login_demo_user_with_role_authenticates() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);

    let ok = handle
        .login(demo("user@platform.com").with_role(Role::User))
        .await;

    assert!(ok);
    let state = handle.state();
    let user = state.user().expect("should be authenticated");
    assert_eq!(user.role, Role::User);
    assert!(state.has_permission(Permission::AddApiKeys));
    assert!(!state.has_permission(Permission::ManageBrokers));
    assert_eq!(stored_user(&storage).as_ref(), Some(user));
}

#[tokio::test(start_paused = true)]
async fn test_login_role_mismatch_fails_and_stays_anonymous() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);

    let ok = handle
        .login(demo("broker@platform.com").with_role(Role::Admin))
        .await;

    assert!(!ok);
    let state = handle.state();
    assert!(!state.is_authenticated());
    assert_eq!(
        state.error_message(),
        Some("invalid credentials or role mismatch")
    );
    assert_eq!(storage.get(KEY), None);
    assert_eq!(storage.saves(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_login_unknown_email_fails() {
    let handle = spawn(&directory(), &MemoryPersistence::new());
    assert!(!handle.login(demo("nobody@platform.com")).await);
    assert!(matches!(handle.state(), SessionState::LoginFailed { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_login_inactive_account_fails() {
    let dir = directory();
    dir.set_active("admin@platform.com", false);
    let handle = spawn(&dir, &MemoryPersistence::new());

    assert!(!handle.login(demo("admin@platform.com")).await);
    assert!(!handle.state().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_login_backend_failure_resolves_to_false() {
    let dir = directory();
    dir.set_unavailable(true);
    let handle = spawn(&dir, &MemoryPersistence::new());

    assert!(!handle.login(demo("user@platform.com")).await);
    assert_eq!(
        handle.state().error_message(),
        Some("authentication service unavailable")
    );
}

#[tokio::test(start_paused = true)]
async fn test_login_storage_failure_resolves_to_false() {
    let storage = MemoryPersistence::new();
    storage.set_fail_writes(true);
    let handle = spawn(&directory(), &storage);

    assert!(!handle.login(demo("user@platform.com")).await);
    assert!(!handle.state().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_login_publishes_loading_then_result() {
    let handle = spawn(&directory(), &MemoryPersistence::new());
    let mut rx = handle.subscribe();

    let task = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.login(demo("admin@platform.com")).await })
    };

    rx.wait_for(|s| s.is_loading()).await.unwrap();
    assert!(task.await.unwrap());
    rx.wait_for(|s| s.is_authenticated()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_login_refused_while_authenticated_keeps_current_user() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);
    assert!(handle.login(demo("broker@platform.com")).await);

    assert!(!handle.login(demo("ghost@platform.com")).await);

    let state = handle.state();
    assert_eq!(state.user().map(|u| u.role), Some(Role::Broker));
    assert_eq!(stored_user(&storage).map(|u| u.role), Some(Role::Broker));
}

#[tokio::test(start_paused = true)]
async fn test_login_in_flight_while_authenticated_keeps_current_user() {
    let handle = spawn(&directory(), &MemoryPersistence::new());
    assert!(handle.login(demo("admin@platform.com")).await);
    let mut rx = handle.subscribe();

    let task = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.login(demo("ghost@platform.com")).await })
    };

    let during = rx.wait_for(|s| s.is_loading()).await.unwrap().clone();
    assert!(during.is_authenticated());
    assert_eq!(during.user().map(|u| u.role), Some(Role::Admin));
    assert!(during.has_permission(Permission::ManageBrokers));

    assert!(!task.await.unwrap());
    let after = handle.state();
    assert!(!after.is_loading());
    assert_eq!(after.user().map(|u| u.role), Some(Role::Admin));
}

#[tokio::test(start_paused = true)]
async fn test_login_again_replaces_user() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);

    assert!(handle.login(demo("user@platform.com")).await);
    assert!(handle.login(demo("superadmin@platform.com")).await);

    assert_eq!(handle.state().user().map(|u| u.role), Some(Role::SuperAdmin));
    assert_eq!(stored_user(&storage).map(|u| u.role), Some(Role::SuperAdmin));
}

// =========================================================================
// register()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_register_new_email_authenticates_and_persists() {
    let dir = directory();
    let storage = MemoryPersistence::new();
    let handle = spawn(&dir, &storage);

    let ok = handle
        .register(Registration::new("new@platform.com", "pw", "New Trader"))
        .await;

    assert!(ok);
    let state = handle.state();
    let user = state.user().expect("should be authenticated");
    assert_eq!(user.role, Role::User);
    assert_eq!(user.name, "New Trader");
    assert_eq!(dir.len(), 5);
    assert_eq!(stored_user(&storage).as_ref(), Some(user));
}

#[tokio::test(start_paused = true)]
async fn test_register_existing_email_fails_and_leaves_directory_unchanged() {
    let dir = directory();
    let before = dir.users();
    let storage = MemoryPersistence::new();
    let handle = spawn(&dir, &storage);

    let ok = handle
        .register(Registration::new("admin@platform.com", "pw", "Second Admin"))
        .await;

    assert!(!ok);
    assert_eq!(dir.users(), before);
    assert!(!handle.state().is_authenticated());
    assert_eq!(
        handle.state().error_message(),
        Some("an account with this email already exists")
    );
    assert_eq!(storage.get(KEY), None);
}

#[tokio::test(start_paused = true)]
async fn test_register_storage_failure_keeps_account_for_login() {
    let dir = directory();
    let storage = MemoryPersistence::new();
    storage.set_fail_writes(true);
    let handle = spawn(&dir, &storage);
    let registration = || Registration::new("new@platform.com", "pw", "New Trader");

    assert!(!handle.register(registration()).await);
    assert_eq!(
        handle.state().error_message(),
        Some("authentication service unavailable")
    );
    assert_eq!(storage.get(KEY), None);
    // The directory accepted the account; only the local copy failed.
    assert_eq!(dir.len(), 5);
    assert!(dir.get("new@platform.com").is_some());

    storage.set_fail_writes(false);
    assert!(!handle.register(registration()).await);
    assert_eq!(
        handle.state().error_message(),
        Some("an account with this email already exists")
    );
    assert!(handle.login(demo("new@platform.com")).await);
    assert_eq!(
        stored_user(&storage).map(|u| u.email),
        Some("new@platform.com".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_registered_user_can_log_in_later() {
    let dir = directory();
    let handle = spawn(&dir, &MemoryPersistence::new());
    assert!(
        handle
            .register(Registration::new("later@platform.com", "pw", "Later").with_role(Role::Broker))
            .await
    );
    handle.logout().await;

    assert!(
        handle
            .login(demo("later@platform.com").with_role(Role::Broker))
            .await
    );
}

// =========================================================================
// logout()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_logout_twice_stays_idle_and_storage_empty() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);
    assert!(handle.login(demo("user@platform.com")).await);

    handle.logout().await;
    assert_eq!(handle.state(), SessionState::Idle);
    assert_eq!(storage.get(KEY), None);

    handle.logout().await;
    assert_eq!(handle.state(), SessionState::Idle);
    assert_eq!(storage.get(KEY), None);
}

#[tokio::test(start_paused = true)]
async fn test_logout_clears_login_failed_message() {
    let handle = spawn(&directory(), &MemoryPersistence::new());
    assert!(!handle.login(demo("ghost@platform.com")).await);

    handle.logout().await;

    assert_eq!(handle.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_logout_with_failing_storage_still_goes_idle() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);
    assert!(handle.login(demo("user@platform.com")).await);
    storage.set_fail_writes(true);

    handle.logout().await;

    assert_eq!(handle.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_logout_during_login_is_applied_after_it() {
    // The store runs one command at a time, so a logout sent while a
    // login is waiting on the directory takes effect once it finishes.
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);
    let mut rx = handle.subscribe();

    let login = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.login(demo("user@platform.com")).await })
    };
    rx.wait_for(|s| s.is_loading()).await.unwrap();

    handle.logout().await;

    assert!(login.await.unwrap(), "the login itself still succeeded");
    assert_eq!(handle.state(), SessionState::Idle);
    assert_eq!(storage.get(KEY), None, "logout came last, storage is empty");
}

// =========================================================================
// restore()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_restore_after_reload_yields_identical_user() {
    let dir = directory();
    let storage = MemoryPersistence::new();

    let before = {
        let handle = spawn(&dir, &storage);
        assert!(handle.login(demo("broker@platform.com").with_role(Role::Broker)).await);
        let user = handle.state().user().cloned().unwrap();
        handle.shutdown().await;
        user
    };

    // A new store over the same storage is a page reload.
    let reloaded = spawn(&dir, &storage);

    assert_eq!(reloaded.state(), SessionState::Authenticated(before));
}

#[tokio::test(start_paused = true)]
async fn test_restore_replaces_held_user() {
    let dir = directory();
    let storage = MemoryPersistence::new();
    let handle = spawn(&dir, &storage);
    assert!(handle.login(demo("user@platform.com")).await);

    let admin = dir.get("admin@platform.com").unwrap();
    storage.set_raw(KEY, &SessionRecord::new(admin.clone()).encode().unwrap());

    assert!(handle.restore().await);
    assert_eq!(handle.state(), SessionState::Authenticated(admin));
}

#[tokio::test(start_paused = true)]
async fn test_restore_without_record_keeps_state() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);
    assert!(handle.login(demo("user@platform.com")).await);
    let held = handle.state();

    storage.clear(KEY).unwrap();

    assert!(!handle.restore().await);
    assert_eq!(handle.state(), held);
}

#[tokio::test(start_paused = true)]
async fn test_restore_corrupt_record_logs_out() {
    let storage = MemoryPersistence::new();
    let handle = spawn(&directory(), &storage);
    assert!(handle.login(demo("user@platform.com")).await);

    storage.set_raw(KEY, "null");

    assert!(!handle.restore().await);
    assert_eq!(handle.state(), SessionState::Idle);
    assert_eq!(storage.get(KEY), None);
}

#[tokio::test(start_paused = true)]
async fn test_file_storage_survives_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = directory();

    let before = {
        let handle = SessionStore::spawn(
            dir.clone(),
            FilePersistence::new(tmp.path()),
            SessionConfig::default(),
        );
        assert!(handle.login(demo("superadmin@platform.com")).await);
        handle.state().user().cloned().unwrap()
    };

    let reloaded = SessionStore::spawn(
        dir,
        FilePersistence::new(tmp.path()),
        SessionConfig::default(),
    );
    assert_eq!(reloaded.state().user(), Some(&before));
}

// =========================================================================
// shutdown()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_commands_after_shutdown_resolve_quietly() {
    let handle = spawn(&directory(), &MemoryPersistence::new());
    handle.shutdown().await;
    // Give the task a chance to exit.
    tokio::task::yield_now().await;

    assert!(!handle.login(demo("user@platform.com")).await);
    assert!(!handle.register(Registration::new("x@y.z", "pw", "X")).await);
    assert!(!handle.restore().await);
    handle.logout().await;
}
