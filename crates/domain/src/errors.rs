//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CareLink
///
/// The variants follow the failure classes the client reacts to differently:
/// transport failures degrade to cached state, authorization failures tear
/// the session down, validation failures are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CareLinkError {
    /// No response could be obtained (connection refused, timeout, reset).
    #[error("Network error: {0}")]
    TransientNetwork(String),

    /// The backend rejected the credential (401/403).
    #[error("Authorization failed ({status}): {message}")]
    Authorization { status: u16, message: String },

    /// Business-rule rejection (4xx other than 401/403).
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// Backend failure (5xx).
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The poller used up its attempt budget.
    #[error("Resource still unavailable after {attempts} attempts")]
    ExhaustedRetry { attempts: u32 },

    #[error("No account is registered for {email}")]
    AccountNotFound { email: String },

    #[error("Incorrect password. Please try again.")]
    InvalidCredentials,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CareLinkError {
    /// Build the error matching an HTTP status code.
    ///
    /// Success codes are not expected here; anything that is not a 4xx/5xx
    /// is reported as a server error carrying the raw status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Authorization { status, message },
            400..=499 => Self::Validation { status, message },
            _ => Self::Server { status, message },
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authorization { status, .. }
            | Self::Validation { status, .. }
            | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401/403 rejections.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }

    /// Failures where no response was received.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetwork(_))
    }

    /// Failures that may clear up on a later attempt: no response, a 5xx,
    /// or a 404 for a resource the backend has not produced yet.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransientNetwork(_) | Self::Server { .. } | Self::Validation { status: 404, .. }
        )
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TransientNetwork(_) => "transient_network",
            Self::Authorization { .. } => "authorization",
            Self::Validation { .. } => "validation",
            Self::Server { .. } => "server",
            Self::ExhaustedRetry { .. } => "exhausted_retry",
            Self::AccountNotFound { .. } => "account_not_found",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::Internal(_) => "internal",
        }
    }

    /// Message intended for display in the UI layer.
    pub fn user_message(&self) -> String {
        match self {
            Self::TransientNetwork(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            Self::Authorization { .. } => "Your session has expired. Please sign in again.".into(),
            Self::ExhaustedRetry { .. } => {
                "The prompt is still being generated. Try again in a moment.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for CareLink operations
pub type Result<T> = std::result::Result<T, CareLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_error_classes() {
        assert!(CareLinkError::from_status(401, "x").is_authorization());
        assert!(CareLinkError::from_status(403, "x").is_authorization());
        assert!(matches!(
            CareLinkError::from_status(422, "bad"),
            CareLinkError::Validation { status: 422, .. }
        ));
        assert!(matches!(
            CareLinkError::from_status(503, "down"),
            CareLinkError::Server { status: 503, .. }
        ));
    }

    #[test]
    fn validation_message_is_verbatim() {
        let err = CareLinkError::from_status(400, "Email already registered");
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn status_is_only_present_for_http_errors() {
        assert_eq!(CareLinkError::from_status(404, "missing").status(), Some(404));
        assert_eq!(CareLinkError::TransientNetwork("reset".into()).status(), None);
        assert_eq!(CareLinkError::ExhaustedRetry { attempts: 3 }.status(), None);
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = CareLinkError::Authorization { status: 401, message: "expired".into() };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Authorization");
        assert_eq!(json["message"]["status"], 401);

        let back: CareLinkError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn only_unavailable_resources_are_retryable() {
        assert!(CareLinkError::TransientNetwork("timeout".into()).is_retryable());
        assert!(CareLinkError::from_status(502, "bad gateway").is_retryable());
        assert!(CareLinkError::from_status(404, "not yet").is_retryable());
        assert!(!CareLinkError::from_status(422, "bad id").is_retryable());
        assert!(!CareLinkError::from_status(400, "bad").is_retryable());
        assert!(!CareLinkError::from_status(401, "expired").is_retryable());
        assert!(!CareLinkError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(CareLinkError::TransientNetwork(String::new()).label(), "transient_network");
        assert_eq!(CareLinkError::InvalidCredentials.label(), "invalid_credentials");
    }
}
