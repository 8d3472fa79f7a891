//! Shared fixtures for `carelink-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use carelink_domain::ClientConfig;
use carelink_infra::{ClientContext, InMemoryNavigator, MemoryStore};
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn user_json(id: &str) -> Value {
    json!({
        "user_id": id,
        "email": format!("{id}@example.com"),
        "full_name": format!("User {id}"),
        "role": "parent",
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": "2024-05-01T09:00:00Z",
        "last_login_at": null
    })
}

pub fn auth_json(token: &str, id: &str) -> Value {
    json!({ "access_token": token, "token_type": "bearer", "user": user_json(id) })
}

pub fn dependent_json(id: &str) -> Value {
    json!({
        "child_id": id,
        "nickname": format!("Kid {id}"),
        "age": 7,
        "comm_level": "medium",
        "personality": "calm",
        "triggers": "sirens, crowds",
        "interests": "trains",
        "target_skills": "waiting",
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": "2024-05-01T09:00:00Z"
    })
}

pub fn session_json(id: &str, dependent_id: &str, prompt: Option<&str>) -> Value {
    json!({
        "session_id": id,
        "child_id": dependent_id,
        "mood": "anxious",
        "environment": "loc_indoor,noise_noisy,crowd_many",
        "situation": "Busy supermarket checkout",
        "prompt": prompt,
        "created_at": "2024-05-02T10:00:00Z"
    })
}

/// Client wired against a mock backend with in-memory storage.
pub struct TestClient {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<InMemoryNavigator>,
    pub context: ClientContext,
}

impl TestClient {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(tweak: impl FnOnce(&mut ClientConfig)) -> Self {
        let server = MockServer::start().await;
        let mut config = ClientConfig::default();
        config.api.base_url = server.uri();
        config.api.timeout_secs = 5;
        config.polling.delay_ms = 50;
        tweak(&mut config);

        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(InMemoryNavigator::starting_at("/children/c1"));
        let context = ClientContext::new(config, store.clone(), navigator.clone())
            .expect("client context should build");
        Self { server, store, navigator, context }
    }

    /// Count of navigations to `route`.
    pub fn visits_to(&self, route: &str) -> usize {
        self.navigator.history().iter().filter(|entry| entry.route == route).count()
    }
}
