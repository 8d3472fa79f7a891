//! Authenticated user and identity endpoint payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Account role. The backend still names these `parent` and `therapist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "parent")]
    Guardian,
    #[serde(rename = "therapist")]
    Specialist,
}

impl_domain_status_conversions!(Role {
    Guardian => "parent",
    Specialist => "therapist",
});

/// Identity returned by the backend and cached locally as a fast-path hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    #[serde(rename = "user_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "full_name")]
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthenticatedUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Credentials posted to the login endpoint
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account creation payload
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn user_decodes_backend_names() {
        let json = r#"{
            "user_id": "u-1",
            "email": "sam@example.com",
            "full_name": "Sam Lee",
            "role": "therapist",
            "created_at": "2025-01-02T03:04:05Z",
            "updated_at": "2025-01-02T03:04:05Z",
            "last_login_at": null
        }"#;

        let user: AuthenticatedUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.display_name, "Sam Lee");
        assert_eq!(user.role, Role::Specialist);
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn auth_response_defaults_token_type() {
        let json = r#"{
            "access_token": "tok",
            "user": {
                "user_id": "u-1",
                "email": "a@b.c",
                "full_name": "A",
                "role": "parent",
                "created_at": "2025-01-02T03:04:05Z",
                "updated_at": "2025-01-02T03:04:05Z"
            }
        }"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.user.role, Role::Guardian);
    }

    #[test]
    fn role_string_round_trip() {
        assert_eq!(Role::Guardian.to_string(), "parent");
        assert_eq!(Role::from_str("Therapist").unwrap(), Role::Specialist);
    }

    #[test]
    fn login_request_debug_hides_password() {
        let request = LoginRequest { email: "a@b.c".into(), password: "hunter2".into() };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("a@b.c"));
    }
}
