//! Identity endpoints (`/api/auth/*`)

use async_trait::async_trait;
use carelink_core::IdentityApi;
use carelink_domain::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, Result};

use crate::http::{HttpGateway, RequestOptions};

/// [`IdentityApi`] over HTTP
#[derive(Debug, Clone)]
pub struct IdentityClient {
    gateway: HttpGateway,
}

impl IdentityClient {
    /// Client over `gateway`.
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl IdentityApi for IdentityClient {
    async fn current_user(&self) -> Result<AuthenticatedUser> {
        self.gateway.get("/api/auth/me").await
    }

    // Credential exchange must not trigger the global sign-out on 401.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let options = RequestOptions::post(request)?.skip_auth_handling();
        self.gateway.call("/api/auth/login", options).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let options = RequestOptions::post(request)?.skip_auth_handling();
        self.gateway.call("/api/auth/register", options).await
    }
}
