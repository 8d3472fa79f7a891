//! Session endpoints (`/api/sessions`, `/api/children/{id}/sessions/latest`)

use async_trait::async_trait;
use carelink_core::SessionApi;
use carelink_domain::{NewSituationalSession, Result, SituationalSession};

use crate::http::HttpGateway;

/// [`SessionApi`] over HTTP
#[derive(Debug, Clone)]
pub struct SessionClient {
    gateway: HttpGateway,
}

impl SessionClient {
    /// Client over `gateway`.
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl SessionApi for SessionClient {
    async fn create(&self, session: &NewSituationalSession) -> Result<SituationalSession> {
        self.gateway.post("/api/sessions", session).await
    }

    async fn get(&self, id: &str) -> Result<SituationalSession> {
        self.gateway.get(&format!("/api/sessions/{id}")).await
    }

    async fn latest_for_dependent(&self, dependent_id: &str) -> Result<Option<SituationalSession>> {
        self.gateway.get(&format!("/api/children/{dependent_id}/sessions/latest")).await
    }
}
