//! Tracing subscriber installation
//!
//! `RUST_LOG` wins over the configured level so a single run can be made
//! verbose without editing configuration.

use carelink_domain::{CareLinkError, LoggingSettings, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, falling back to `settings.level`.
///
/// # Errors
/// Returns `CareLinkError::Config` when the configured directive is invalid.
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level).map_err(|e| {
        CareLinkError::Config(format!("invalid log filter {:?}: {e}", settings.level))
    })
}

/// Install the global tracing subscriber.
///
/// # Errors
/// Returns `CareLinkError::Config` for an invalid filter or when a global
/// subscriber is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = build_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if settings.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| CareLinkError::Config(format!("failed to install tracing subscriber: {e}")))
}
