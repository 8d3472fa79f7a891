//! Authentication session status

use serde::{Deserialize, Serialize};

use super::user::AuthenticatedUser;
use crate::impl_domain_status_conversions;

/// Where the session lifecycle currently stands. Starts at `Checking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

impl_domain_status_conversions!(SessionStatus {
    Checking => "checking",
    Authenticated => "authenticated",
    Unauthenticated => "unauthenticated",
});

/// Value published to session observers after every transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub user: Option<AuthenticatedUser>,
}

impl SessionSnapshot {
    /// Whether the status is `authenticated`.
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}
