//! The session store: the single owner of "who is logged in".
//!
//! The store runs as one Tokio task (actor model). Everything that wants
//! to change the session sends a command through a [`SessionHandle`];
//! everything that wants to read it looks at a `watch` channel the task
//! publishes to. No locks, no ambient globals.
//!
//! # Ordering
//!
//! Commands are handled one at a time, to completion, in the order they
//! arrive, including the wait on the directory. A `logout` sent while a
//! `login` is still waiting on the directory is queued behind it, so the
//! logout wins and storage ends up empty. The in-memory state and the
//! persisted record can't drift apart because only this task touches
//! either.
//!
//! Dropping a handle's future (e.g. a `login`) does not cancel the
//! command; the task finishes it and the reply goes nowhere.

use tokio::sync::{mpsc, oneshot, watch};

use crate::{
    Credentials, Registration, SessionConfig, SessionError, SessionPersistence, SessionRecord,
    SessionState, User, UserDirectory,
};

/// How many commands can queue up before senders wait.
const COMMAND_BUFFER: usize = 32;

/// Commands sent to the store task.
///
/// The `oneshot::Sender` in each variant is the reply channel.
enum SessionCommand {
    Login {
        credentials: Credentials,
        reply: oneshot::Sender<bool>,
    },
    Register {
        registration: Registration,
        reply: oneshot::Sender<bool>,
    },
    Logout {
        reply: oneshot::Sender<()>,
    },
    Restore {
        reply: oneshot::Sender<bool>,
    },
    Shutdown,
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Handle to a running session store.
///
/// Cheap to clone: one `mpsc::Sender` and one `watch::Receiver`. Hand a
/// clone to every component that needs the session (router, header, ...)
/// instead of reaching for a global.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// The current state. Never waits.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// A receiver that is notified on every state change.
    ///
    /// Call `changed().await` on it to wait for the next transition, or
    /// `borrow()` to read the latest value.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Logs in against the directory.
    ///
    /// Returns `true` on success. On refusal the published state becomes
    /// [`SessionState::LoginFailed`] with a message for the form. Never
    /// returns an error; a dead store also answers `false`.
    pub async fn login(&self, credentials: Credentials) -> bool {
        self.request(|reply| SessionCommand::Login { credentials, reply })
            .await
            .unwrap_or(false)
    }

    /// Registers a new account and logs it in.
    ///
    /// Returns `false` if the email is already taken (the directory is left
    /// unchanged), the directory call fails, or the session can't be saved.
    /// In the last case the account already exists in the directory and
    /// can be logged into once storage works again.
    pub async fn register(&self, registration: Registration) -> bool {
        self.request(|reply| SessionCommand::Register {
            registration,
            reply,
        })
        .await
        .unwrap_or(false)
    }

    /// Ends the session and clears storage. Never fails; calling it when
    /// nobody is logged in is fine.
    pub async fn logout(&self) {
        // A dead store already holds no session to end.
        let _ = self.request(|reply| SessionCommand::Logout { reply }).await;
    }

    /// Re-reads the persisted record, as a page reload would.
    ///
    /// Returns `true` if a valid record was found and is now the session.
    pub async fn restore(&self) -> bool {
        self.request(|reply| SessionCommand::Restore { reply })
            .await
            .unwrap_or(false)
    }

    /// Tells the store task to stop. Queued commands ahead of this one
    /// still run.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(SessionCommand::Shutdown).await;
    }

    /// Sends a command and waits for its reply.
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Unavailable)?;
        reply_rx.await.map_err(|_| SessionError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// The store task's state. Only reachable through a [`SessionHandle`].
pub struct SessionStore<D: UserDirectory, P: SessionPersistence> {
    directory: D,
    persistence: P,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<D: UserDirectory, P: SessionPersistence> SessionStore<D, P> {
    /// Starts a store and returns a handle to it.
    ///
    /// The store starts `Idle`. If `config.restore_on_start` is set, the
    /// persisted record is restored before this returns, so the first
    /// state a caller sees is already the restored one.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn spawn(directory: D, persistence: P, config: SessionConfig) -> SessionHandle {
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);

        let mut store = SessionStore {
            directory,
            persistence,
            config,
            state: state_tx,
            receiver: cmd_rx,
        };
        if store.config.restore_on_start {
            store.restore();
        }
        tokio::spawn(store.run());

        SessionHandle {
            sender: cmd_tx,
            state: state_rx,
        }
    }

    /// Processes commands until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::debug!(storage_key = %self.config.storage_key, "session store started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Login { credentials, reply } => {
                    let ok = self.login(credentials).await;
                    let _ = reply.send(ok);
                }
                SessionCommand::Register {
                    registration,
                    reply,
                } => {
                    let ok = self.register(registration).await;
                    let _ = reply.send(ok);
                }
                SessionCommand::Logout { reply } => {
                    self.logout();
                    let _ = reply.send(());
                }
                SessionCommand::Restore { reply } => {
                    let ok = self.restore();
                    let _ = reply.send(ok);
                }
                SessionCommand::Shutdown => break,
            }
        }

        tracing::debug!("session store stopped");
    }

    async fn login(&mut self, credentials: Credentials) -> bool {
        let previous = self.begin();
        let result = match self.directory.find_user(&credentials).await {
            Ok(user) => self.persist(user),
            Err(err) => Err(err),
        };
        self.finish("login", previous, result)
    }

    async fn register(&mut self, registration: Registration) -> bool {
        let previous = self.begin();
        let result = match self.directory.create_user(registration).await {
            Ok(user) => self.persist(user),
            Err(err) => Err(err),
        };
        self.finish("registration", previous, result)
    }

    fn logout(&mut self) {
        if let Err(err) = self.persistence.clear(&self.config.storage_key) {
            tracing::warn!(error = %err, "could not clear stored session");
        }
        if let Some(user) = self.state.borrow().user() {
            tracing::info!(user_id = %user.id, "logged out");
        }
        self.state.send_replace(SessionState::Idle);
    }

    /// Loads the persisted record into the session.
    ///
    /// A missing record leaves the state alone. A record that can't be
    /// used is removed from storage and the session drops to `Idle`.
    fn restore(&mut self) -> bool {
        let raw = match self.persistence.load(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored session");
                return false;
            }
        };

        match SessionRecord::decode(&raw) {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "session restored");
                self.state.send_replace(SessionState::Authenticated(user));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding stored session");
                if let Err(err) = self.persistence.clear(&self.config.storage_key) {
                    tracing::warn!(error = %err, "could not clear stored session");
                }
                self.state.send_replace(SessionState::Idle);
                false
            }
        }
    }

    /// Publishes the loading state, returning the user that was logged in
    /// before. A logged-in user stays visible while the attempt runs.
    fn begin(&mut self) -> Option<User> {
        let previous = self.state.borrow().user().cloned();
        let loading = match &previous {
            Some(user) => SessionState::Reauthenticating(user.clone()),
            None => SessionState::LoggingIn,
        };
        self.state.send_replace(loading);
        previous
    }

    /// Writes the record for `user`; the user is handed back on success.
    fn persist(&self, user: User) -> Result<User, SessionError> {
        let record = SessionRecord::new(user);
        let raw = record.encode()?;
        self.persistence.save(&self.config.storage_key, &raw)?;
        Ok(record.user)
    }

    /// Publishes the outcome of a login or registration.
    fn finish(
        &mut self,
        action: &'static str,
        previous: Option<User>,
        result: Result<User, SessionError>,
    ) -> bool {
        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "{action} succeeded");
                self.state.send_replace(SessionState::Authenticated(user));
                true
            }
            Err(err) => {
                tracing::info!(error = %err, "{action} refused");
                let next = match previous {
                    Some(user) => SessionState::Authenticated(user),
                    None => SessionState::LoginFailed {
                        message: err.user_message().to_string(),
                    },
                };
                self.state.send_replace(next);
                false
            }
        }
    }
}
