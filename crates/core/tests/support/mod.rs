//! Shared test helpers for `carelink-core` integration tests.
//!
//! In-memory implementations of every core port plus fixture builders, so the
//! tests can focus on lifecycle behaviour instead of wiring.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use carelink_core::{
    DependentApi, IdentityApi, KeyValueStore, NavigateOptions, Navigator, SessionApi, StorageError,
};
use carelink_domain::{
    AuthResponse, AuthenticatedUser, CareLinkError, CommunicationLevel, DependentProfile,
    LoginRequest, Mood, NewDependentProfile, NewSituationalSession, Personality, RegisterRequest,
    Result as DomainResult, Role, SituationalSession,
};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn user(id: &str) -> AuthenticatedUser {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    AuthenticatedUser {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        display_name: format!("User {id}"),
        role: Role::Guardian,
        created_at: at,
        updated_at: at,
        last_login_at: None,
    }
}

pub fn auth_response(token: &str, id: &str) -> AuthResponse {
    AuthResponse { access_token: token.to_string(), token_type: "bearer".into(), user: user(id) }
}

pub fn dependent(id: &str) -> DependentProfile {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    DependentProfile {
        id: id.to_string(),
        nickname: format!("Kid {id}"),
        age: 7,
        comm_level: CommunicationLevel::Medium,
        personality: Personality::Curious,
        sensitive_topics: "loud noises".into(),
        interests: "trains, drawing".into(),
        target_skills: "turn taking".into(),
        created_at: at,
        updated_at: at,
    }
}

pub fn new_dependent(nickname: &str) -> NewDependentProfile {
    NewDependentProfile {
        nickname: nickname.to_string(),
        age: 6,
        comm_level: CommunicationLevel::Low,
        personality: Personality::Shy,
        sensitive_topics_raw: None,
        interests_raw: Some("dinosaurs".into()),
        target_skills_raw: None,
    }
}

pub fn session(id: &str, dependent_id: &str, prompt: &str) -> SituationalSession {
    SituationalSession {
        id: id.to_string(),
        dependent_id: dependent_id.to_string(),
        mood: Mood::Anxious,
        environment_tags: vec!["loc_indoor".into(), "noise_noisy".into()],
        situation_narrative: "Crowded waiting room".into(),
        generated_prompt: prompt.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap(),
    }
}

pub fn new_session(dependent_id: &str) -> NewSituationalSession {
    NewSituationalSession {
        dependent_id: dependent_id.to_string(),
        mood: Mood::Tired,
        environment_tags: vec!["loc_outdoor".into()],
        situation_narrative: "Long walk home".into(),
    }
}

pub fn unauthorized() -> CareLinkError {
    CareLinkError::from_status(401, "Not authenticated")
}

pub fn offline() -> CareLinkError {
    CareLinkError::TransientNetwork("connection refused".into())
}

// ---------------------------------------------------------------------------
// Key-value store
// ---------------------------------------------------------------------------

/// HashMap-backed key-value store.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn seed(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Navigator that records every navigation.
pub struct RecordingNavigator {
    location: Mutex<String>,
    history: Mutex<Vec<(String, NavigateOptions)>>,
}

impl RecordingNavigator {
    pub fn at(location: &str) -> Arc<Self> {
        Arc::new(Self { location: Mutex::new(location.to_string()), history: Mutex::new(Vec::new()) })
    }

    pub fn history(&self) -> Vec<(String, NavigateOptions)> {
        self.history.lock().clone()
    }

    pub fn visits_to(&self, route: &str) -> usize {
        self.history.lock().iter().filter(|(r, _)| r == route).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str, options: NavigateOptions) {
        *self.location.lock() = route.to_string();
        self.history.lock().push((route.to_string(), options));
    }

    fn current_location(&self) -> String {
        self.location.lock().clone()
    }
}

// ---------------------------------------------------------------------------
// Identity API
// ---------------------------------------------------------------------------

type InFlightHook = Box<dyn Fn() + Send + Sync>;

/// Identity API returning scripted results.
pub struct MockIdentityApi {
    current_user: Mutex<DomainResult<AuthenticatedUser>>,
    login: Mutex<DomainResult<AuthResponse>>,
    register: Mutex<DomainResult<AuthResponse>>,
    during_current_user: Mutex<Option<InFlightHook>>,
    pub current_user_calls: AtomicUsize,
    pub logins: Mutex<Vec<LoginRequest>>,
}

impl MockIdentityApi {
    pub fn new() -> Self {
        Self {
            current_user: Mutex::new(Err(unauthorized())),
            login: Mutex::new(Err(CareLinkError::Internal("login not scripted".into()))),
            register: Mutex::new(Err(CareLinkError::Internal("register not scripted".into()))),
            during_current_user: Mutex::new(None),
            current_user_calls: AtomicUsize::new(0),
            logins: Mutex::new(Vec::new()),
        }
    }

    pub fn with_current_user(self, result: DomainResult<AuthenticatedUser>) -> Self {
        *self.current_user.lock() = result;
        self
    }

    pub fn with_login(self, result: DomainResult<AuthResponse>) -> Self {
        *self.login.lock() = result;
        self
    }

    pub fn with_register(self, result: DomainResult<AuthResponse>) -> Self {
        *self.register.lock() = result;
        self
    }

    /// Run `hook` while the current-user request is "in flight".
    pub fn during_current_user(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        *self.during_current_user.lock() = Some(Box::new(hook));
        self
    }

    pub fn set_current_user(&self, result: DomainResult<AuthenticatedUser>) {
        *self.current_user.lock() = result;
    }

    pub fn calls(&self) -> usize {
        self.current_user_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityApi for MockIdentityApi {
    async fn current_user(&self) -> DomainResult<AuthenticatedUser> {
        self.current_user_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.during_current_user.lock().as_ref() {
            hook();
        }
        tokio::task::yield_now().await;
        self.current_user.lock().clone()
    }

    async fn login(&self, request: &LoginRequest) -> DomainResult<AuthResponse> {
        self.logins.lock().push(request.clone());
        self.login.lock().clone()
    }

    async fn register(&self, _request: &RegisterRequest) -> DomainResult<AuthResponse> {
        self.register.lock().clone()
    }
}

// ---------------------------------------------------------------------------
// Dependent API
// ---------------------------------------------------------------------------

/// Dependent API backed by a vector.
#[derive(Default)]
pub struct MockDependentApi {
    dependents: Mutex<Vec<DependentProfile>>,
    pub list_calls: AtomicUsize,
}

impl MockDependentApi {
    pub fn with(dependents: Vec<DependentProfile>) -> Self {
        Self { dependents: Mutex::new(dependents), list_calls: AtomicUsize::new(0) }
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DependentApi for MockDependentApi {
    async fn create(&self, profile: &NewDependentProfile) -> DomainResult<DependentProfile> {
        let mut dependents = self.dependents.lock();
        let mut created = dependent(&format!("c{}", dependents.len() + 1));
        created.nickname = profile.nickname.clone();
        dependents.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> DomainResult<Vec<DependentProfile>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dependents.lock().clone())
    }

    async fn get(&self, id: &str) -> DomainResult<DependentProfile> {
        self.dependents
            .lock()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| CareLinkError::from_status(404, "Child not found"))
    }
}

// ---------------------------------------------------------------------------
// Session API
// ---------------------------------------------------------------------------

/// Session API with scripted reads and call timing.
#[derive(Default)]
pub struct MockSessionApi {
    /// Responses for `get`, consumed in order; the last one repeats.
    get_script: Mutex<VecDeque<DomainResult<SituationalSession>>>,
    latest: Mutex<HashMap<String, DomainResult<Option<SituationalSession>>>>,
    pub get_calls: Mutex<Vec<Instant>>,
    pub latest_calls: AtomicUsize,
    pub created: Mutex<Vec<NewSituationalSession>>,
}

impl MockSessionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_get(self, responses: Vec<DomainResult<SituationalSession>>) -> Self {
        *self.get_script.lock() = responses.into();
        self
    }

    pub fn with_latest(self, dependent_id: &str, result: DomainResult<Option<SituationalSession>>) -> Self {
        self.latest.lock().insert(dependent_id.to_string(), result);
        self
    }

    pub fn get_count(&self) -> usize {
        self.get_calls.lock().len()
    }

    /// Offsets of each `get` call relative to `origin`, in milliseconds.
    pub fn get_offsets_ms(&self, origin: Instant) -> Vec<u128> {
        self.get_calls.lock().iter().map(|at| at.duration_since(origin).as_millis()).collect()
    }
}

#[async_trait]
impl SessionApi for MockSessionApi {
    async fn create(&self, session: &NewSituationalSession) -> DomainResult<SituationalSession> {
        self.created.lock().push(session.clone());
        Ok(self::session("s-new", &session.dependent_id, ""))
    }

    async fn get(&self, _id: &str) -> DomainResult<SituationalSession> {
        self.get_calls.lock().push(Instant::now());
        let mut script = self.get_script.lock();
        if script.len() > 1 {
            script.pop_front().unwrap_or_else(|| Err(offline()))
        } else {
            script.front().cloned().unwrap_or_else(|| Err(offline()))
        }
    }

    async fn latest_for_dependent(
        &self,
        dependent_id: &str,
    ) -> DomainResult<Option<SituationalSession>> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.latest.lock().get(dependent_id).cloned().unwrap_or(Ok(None))
    }
}
