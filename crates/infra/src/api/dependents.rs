//! Dependent endpoints (`/api/children`)

use async_trait::async_trait;
use carelink_core::DependentApi;
use carelink_domain::{DependentList, DependentProfile, NewDependentProfile, Result};

use crate::http::HttpGateway;

/// [`DependentApi`] over HTTP
#[derive(Debug, Clone)]
pub struct DependentClient {
    gateway: HttpGateway,
}

impl DependentClient {
    /// Client over `gateway`.
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl DependentApi for DependentClient {
    async fn create(&self, profile: &NewDependentProfile) -> Result<DependentProfile> {
        self.gateway.post("/api/children", profile).await
    }

    async fn list(&self) -> Result<Vec<DependentProfile>> {
        let list: DependentList = self.gateway.get("/api/children").await?;
        Ok(list.children)
    }

    async fn get(&self, id: &str) -> Result<DependentProfile> {
        self.gateway.get(&format!("/api/children/{id}")).await
    }
}
