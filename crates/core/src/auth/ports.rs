//! Port interfaces for identity operations
//!
//! These traits define the boundaries between the session lifecycle and the
//! HTTP layer that talks to the identity endpoints.

use async_trait::async_trait;
use carelink_domain::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, Result};

/// Supplies the bearer credential for outgoing requests
pub trait AccessTokenProvider: Send + Sync {
    /// Current access token, if the user is signed in.
    fn access_token(&self) -> Option<String>;
}

/// Identity endpoints of the care backend
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Validate the stored credential and return the user it belongs to.
    async fn current_user(&self) -> Result<AuthenticatedUser>;

    /// Exchange email and password for a credential.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    /// Create an account and sign it in.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;
}
