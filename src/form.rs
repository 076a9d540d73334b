//! Headless login form.
//!
//! Holds what a login screen holds: the prefilled settings, whether a
//! request is in flight, and the outcome. The network round trip runs on a
//! spawned task, but its result is only applied through `finish`, which
//! takes `&mut self` and therefore runs wherever the form lives. Session
//! and settings are never touched from the transport side.
//!
//! Dropping a `PendingLogin` (or the `submit` future holding it) aborts the
//! request and frees the form; the last settled state is shown again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::api::LoginHandler;
use crate::config::{CredentialStore, RememberedCredentials};
use crate::errors::LoginError;
use crate::types::{Credentials, LoginResult, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    /// Inputs should be disabled.
    Submitting,
    Authenticated(Session),
    /// Message for the error label.
    Failed(String),
}

static SUBMITTING: FormState = FormState::Submitting;

/// An attempt running on the runtime. Await it with `wait`, then hand the
/// outcome to `LoginForm::finish`.
#[derive(Debug)]
pub struct PendingLogin {
    handle: JoinHandle<LoginResult>,
    busy: Arc<AtomicBool>,
    password: String,
    remember_me: bool,
}

#[derive(Debug)]
pub struct CompletedLogin {
    pub result: LoginResult,
    password: String,
    remember_me: bool,
}

impl PendingLogin {
    pub async fn wait(mut self) -> CompletedLogin {
        let result = match (&mut self.handle).await {
            Ok(result) => result,
            Err(error) => LoginResult::failure(format!("Login task ended unexpectedly: {error}")),
        };
        CompletedLogin {
            result,
            password: std::mem::take(&mut self.password),
            remember_me: self.remember_me,
        }
    }
}

impl Drop for PendingLogin {
    fn drop(&mut self) {
        // No-op once the task has finished.
        self.handle.abort();
        self.busy.store(false, Ordering::Release);
    }
}

pub struct LoginForm<S: CredentialStore> {
    handler: LoginHandler,
    store: S,
    prefill: RememberedCredentials,
    /// Last settled state; never `Submitting`.
    state: FormState,
    busy: Arc<AtomicBool>,
    session: Option<Session>,
}

impl<S: CredentialStore> LoginForm<S> {
    /// Loads remembered settings for prefill.
    pub fn new(handler: LoginHandler, store: S) -> Result<Self> {
        let prefill = store.load().context("Could not load login settings")?;
        Ok(Self {
            handler,
            store,
            prefill,
            state: FormState::Idle,
            busy: Arc::new(AtomicBool::new(false)),
            session: None,
        })
    }

    pub fn prefill(&self) -> &RememberedCredentials {
        &self.prefill
    }

    pub fn state(&self) -> &FormState {
        if self.is_submitting() {
            &SUBMITTING
        } else {
            &self.state
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates, marks the form busy and starts the request.
    ///
    /// Fails without touching the network when a field is empty, and
    /// refuses to start while another attempt is pending.
    pub fn start(
        &mut self,
        credentials: Credentials,
        remember_me: bool,
    ) -> Result<PendingLogin, LoginError> {
        if self.is_submitting() {
            return Err(LoginError::AlreadySubmitting);
        }
        if !credentials.is_complete() {
            self.state = FormState::Failed(LoginError::MissingCredentials.to_string());
            return Err(LoginError::MissingCredentials);
        }

        self.busy.store(true, Ordering::Release);
        let password = credentials.password.clone();
        let handler = self.handler.clone();
        let handle = tokio::spawn(async move { handler.submit(&credentials).await });

        Ok(PendingLogin {
            handle,
            busy: Arc::clone(&self.busy),
            password,
            remember_me,
        })
    }

    /// Applies a finished attempt: on success records the session and saves
    /// the remember-me settings; on failure only updates the state.
    ///
    /// Errors only if the settings could not be written. The session is
    /// established regardless.
    pub fn finish(&mut self, completed: CompletedLogin) -> Result<LoginResult> {
        let CompletedLogin {
            result,
            password,
            remember_me,
        } = completed;

        match &result {
            LoginResult::Success {
                username,
                session_id,
            } => {
                let session = Session {
                    username: username.clone(),
                    session_id: session_id.clone(),
                };
                // The server's spelling of the username is the one remembered.
                let remembered =
                    RememberedCredentials::after_login(&session.username, &password, remember_me);
                self.state = FormState::Authenticated(session.clone());
                self.session = Some(session);
                self.prefill = remembered.clone();
                self.store
                    .save(&remembered)
                    .context("Logged in, but failed to save login settings")?;
            }
            LoginResult::Failure { message } => {
                self.state = FormState::Failed(message.clone());
            }
        }
        Ok(result)
    }

    /// `start`, wait, `finish` in one call.
    pub async fn submit(&mut self, credentials: Credentials, remember_me: bool) -> Result<LoginResult> {
        match self.start(credentials, remember_me) {
            Ok(pending) => {
                let completed = pending.wait().await;
                self.finish(completed)
            }
            Err(error) => Ok(error.into()),
        }
    }
}
