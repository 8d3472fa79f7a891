//! Session lifecycle manager
//!
//! Owns the observable session state (`checking -> authenticated |
//! unauthenticated`) and is its only writer. Observers subscribe to a
//! `tokio::sync::watch` channel and always see the latest snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use carelink_common::Liveness;
use carelink_domain::constants::{HOME_ROUTE, LOGIN_ROUTE};
use carelink_domain::{
    AuthenticatedUser, CareLinkError, LoginRequest, RegisterRequest, Result, SessionSnapshot,
    SessionStatus,
};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::credentials::CredentialStore;
use super::ports::IdentityApi;
use super::unauthorized::{HookRegistration, UnauthorizedHook};
use crate::navigation::ports::{NavigateOptions, Navigator};

/// Handle tying the manager to the lifetime of its owner.
///
/// Holding a scope keeps the unauthorized reaction registered. Dropping it
/// marks the owner gone, which suppresses late bootstrap writes, and removes
/// the reaction unless another scope has registered since.
#[must_use = "dropping the scope unregisters the unauthorized reaction"]
pub struct SessionScope {
    liveness: Liveness,
    hook: Arc<UnauthorizedHook>,
    registration: HookRegistration,
}

impl SessionScope {
    /// Whether the owner is still around.
    pub fn is_live(&self) -> bool {
        self.liveness.is_live()
    }

    /// Liveness flag shared with in-flight work.
    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        self.liveness.kill();
        self.hook.clear_if(&self.registration);
    }
}

impl std::fmt::Debug for SessionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionScope").field("live", &self.is_live()).finish_non_exhaustive()
    }
}

/// Authentication session state machine
pub struct SessionManager {
    credentials: CredentialStore,
    identity: Arc<dyn IdentityApi>,
    navigator: Arc<dyn Navigator>,
    hook: Arc<UnauthorizedHook>,
    state: watch::Sender<SessionSnapshot>,
    bootstrapped: AtomicBool,
    /// Serializes the unauthorized reaction so a burst tears down once.
    teardown: Mutex<()>,
    /// Location captured by the last redirect to the login route.
    return_to: Mutex<Option<String>>,
}

impl SessionManager {
    /// Manager in the `checking` state; call [`SessionManager::attach`] before use.
    pub fn new(
        credentials: CredentialStore,
        identity: Arc<dyn IdentityApi>,
        navigator: Arc<dyn Navigator>,
        hook: Arc<UnauthorizedHook>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            credentials,
            identity,
            navigator,
            hook,
            state,
            bootstrapped: AtomicBool::new(false),
            teardown: Mutex::new(()),
            return_to: Mutex::new(None),
        }
    }

    /// Register the unauthorized reaction and return the owning scope.
    ///
    /// The reaction holds a weak reference, so the hook never keeps the
    /// manager alive.
    pub fn attach(self: &Arc<Self>) -> SessionScope {
        let manager: Weak<Self> = Arc::downgrade(self);
        let registration = self.hook.set(move |rejected| {
            if let Some(manager) = manager.upgrade() {
                manager.handle_unauthorized(rejected);
            }
        });
        SessionScope { liveness: Liveness::new(), hook: Arc::clone(&self.hook), registration }
    }

    /// Receive every session transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Current status and identity.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status
    }

    /// Current identity, if authenticated.
    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.state.borrow().user.clone()
    }

    /// Underlying credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Establish the initial session state.
    ///
    /// Runs at most once per manager unless the owning scope ends before the
    /// identity check resolves; the next scope then bootstraps again.
    ///
    /// A cached identity makes the session usable immediately; the backend is
    /// still asked to confirm it. Transport failures keep the last known good
    /// state. Nothing is written once `scope` is no longer live.
    #[instrument(skip_all)]
    pub async fn bootstrap(&self, scope: &SessionScope) -> SessionStatus {
        if self.bootstrapped.swap(true, Ordering::AcqRel) {
            debug!("session already bootstrapped");
            return self.status();
        }
        let live = scope.liveness().clone();
        if !live.is_live() {
            self.bootstrapped.store(false, Ordering::Release);
            return self.status();
        }

        if self.credentials.token().is_none() {
            self.publish(SessionStatus::Unauthenticated, None);
            return self.status();
        }

        let cached = self.credentials.cached_user();
        match &cached {
            Some(user) => self.publish(SessionStatus::Authenticated, Some(user.clone())),
            None => self.publish(SessionStatus::Checking, None),
        }

        let outcome = self.identity.current_user().await;
        if !live.is_live() {
            debug!("session scope ended during bootstrap; discarding result");
            // The next scope re-runs the identity check.
            self.bootstrapped.store(false, Ordering::Release);
            return self.status();
        }

        match outcome {
            Ok(user) => {
                self.credentials.set_cached_user(&user);
                self.publish(SessionStatus::Authenticated, Some(user));
            }
            Err(err) if err.is_authorization() => {
                info!(error = %err, "stored credential rejected during bootstrap");
                self.credentials.clear();
                self.publish(SessionStatus::Unauthenticated, None);
            }
            Err(err) => {
                warn!(error = %err, kind = err.label(), "identity check failed; keeping last known state");
                match cached {
                    Some(user) => self.publish(SessionStatus::Authenticated, Some(user)),
                    None => self.publish(SessionStatus::Unauthenticated, None),
                }
            }
        }
        self.status()
    }

    /// Re-validate the credential on demand.
    ///
    /// Returns `Ok(None)` without a credential. Authorization failures clear
    /// the session; other failures keep a held identity authenticated. Both
    /// are returned as errors.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<Option<AuthenticatedUser>> {
        if self.credentials.token().is_none() {
            self.publish(SessionStatus::Unauthenticated, None);
            return Ok(None);
        }

        let held = self.user().or_else(|| self.credentials.cached_user());
        self.publish(SessionStatus::Checking, held.clone());

        match self.identity.current_user().await {
            Ok(user) => {
                self.credentials.set_cached_user(&user);
                self.publish(SessionStatus::Authenticated, Some(user.clone()));
                Ok(Some(user))
            }
            Err(err) if err.is_authorization() => {
                self.credentials.clear();
                self.publish(SessionStatus::Unauthenticated, None);
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, kind = err.label(), "session refresh failed");
                match held {
                    Some(user) => self.publish(SessionStatus::Authenticated, Some(user)),
                    None => self.publish(SessionStatus::Unauthenticated, None),
                }
                Err(err)
            }
        }
    }

    /// Persist a freshly issued credential and identity.
    pub fn set_session(&self, token: &str, user: AuthenticatedUser) {
        self.credentials.set_token(token);
        self.credentials.set_cached_user(&user);
        self.publish(SessionStatus::Authenticated, Some(user));
    }

    /// Sign out locally and go to the login route.
    pub fn logout(&self) {
        self.credentials.clear();
        self.publish(SessionStatus::Unauthenticated, None);
        self.navigator.navigate(LOGIN_ROUTE, NavigateOptions::replace());
    }

    /// Reaction to the gateway's unauthorized signal.
    ///
    /// `rejected` is the credential the rejected request carried. Returns
    /// `false` when the session was already torn down, which makes a burst of
    /// concurrent rejections produce a single redirect, or when a newer
    /// credential has been stored since the request was sent.
    pub fn handle_unauthorized(&self, rejected: Option<&str>) -> bool {
        let _guard = self.teardown.lock();
        let current = self.credentials.token();
        if current.is_none() && self.status() == SessionStatus::Unauthenticated {
            debug!("session already torn down; ignoring unauthorized signal");
            return false;
        }
        if current.is_some() && current.as_deref() != rejected {
            debug!("rejected credential was replaced; ignoring unauthorized signal");
            return false;
        }

        info!("credential rejected by backend; signing out");
        self.credentials.clear();
        self.publish(SessionStatus::Unauthenticated, None);

        let location = self.navigator.current_location();
        *self.return_to.lock() = Some(location.clone());
        self.navigator.navigate(LOGIN_ROUTE, NavigateOptions::replace().with_return_to(location));
        true
    }

    /// Sign in with email and password.
    ///
    /// On success the user is sent back to the location captured by the last
    /// login redirect, or home.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let request = LoginRequest { email: email.to_string(), password: password.to_string() };
        let response = self.identity.login(&request).await.map_err(|err| match err {
            CareLinkError::Validation { status: 404, .. } => {
                CareLinkError::AccountNotFound { email: email.to_string() }
            }
            CareLinkError::Validation { status: 400 | 422, .. } => CareLinkError::InvalidCredentials,
            other => other,
        })?;

        let user = response.user;
        self.set_session(&response.access_token, user.clone());
        let target = self.return_to.lock().take().unwrap_or_else(|| HOME_ROUTE.to_string());
        self.navigator.navigate(&target, NavigateOptions::replace());
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Create an account and sign it in.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthenticatedUser> {
        let response = self.identity.register(request).await?;
        let user = response.user;
        self.set_session(&response.access_token, user.clone());
        self.return_to.lock().take();
        self.navigator.navigate(HOME_ROUTE, NavigateOptions::replace());
        info!(user_id = %user.id, "registered");
        Ok(user)
    }

    fn publish(&self, status: SessionStatus, user: Option<AuthenticatedUser>) {
        let previous = self.state.send_replace(SessionSnapshot { status, user });
        if previous.status != status {
            info!(from = %previous.status, to = %status, "session status changed");
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").field("status", &self.status()).finish_non_exhaustive()
    }
}
