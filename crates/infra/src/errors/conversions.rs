//! Conversions from external infrastructure errors into domain errors.

use std::path::PathBuf;

use carelink_core::StorageError;
use carelink_domain::CareLinkError;
use reqwest::Error as HttpError;
use thiserror::Error;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CareLinkError);

impl From<InfraError> for CareLinkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CareLinkError> for InfraError {
    fn from(value: CareLinkError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CareLinkError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        InfraError(map_http_error(&err))
    }
}

fn map_http_error(err: &HttpError) -> CareLinkError {
    if err.is_builder() {
        return CareLinkError::Internal(format!("invalid request: {err}"));
    }
    if err.is_decode() {
        return CareLinkError::Decode(err.to_string());
    }
    if err.is_timeout() {
        return CareLinkError::TransientNetwork(format!("request timed out: {err}"));
    }
    if err.is_connect() {
        return CareLinkError::TransientNetwork(format!("connection failed: {err}"));
    }
    // Request, body and redirect failures all mean no usable response.
    CareLinkError::TransientNetwork(err.to_string())
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / serde_json::Error → StorageError */
/* -------------------------------------------------------------------------- */

pub(crate) fn io_storage_error(context: &str, err: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{context}: {err}"))
}

pub(crate) fn json_storage_error(context: &str, err: &serde_json::Error) -> StorageError {
    StorageError::Corrupt(format!("{context}: {err}"))
}

/* -------------------------------------------------------------------------- */
/* Configuration */
/* -------------------------------------------------------------------------- */

/// Failure while loading or validating client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} in {}: {message}", .path.display())]
    Parse { path: PathBuf, format: &'static str, message: String },

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue { key: String, value: String, reason: String },
}

impl From<ConfigError> for CareLinkError {
    fn from(err: ConfigError) -> Self {
        CareLinkError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connection_refused_is_transient() {
        // Port 9 (discard) on localhost is reliably closed in test sandboxes.
        let err = reqwest::Client::new().get("http://127.0.0.1:9/").send().await.unwrap_err();
        let mapped: CareLinkError = InfraError::from(err).into();
        assert!(mapped.is_transient(), "unexpected mapping: {mapped:?}");
    }

    #[test]
    fn config_errors_become_domain_config_errors() {
        let err: CareLinkError = ConfigError::InvalidValue {
            key: "CARELINK_POLL_DELAY_MS".into(),
            value: "soon".into(),
            reason: "not a number".into(),
        }
        .into();
        assert!(matches!(err, CareLinkError::Config(message) if message.contains("CARELINK_POLL_DELAY_MS")));
    }
}
