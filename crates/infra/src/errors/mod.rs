//! Infrastructure error types and their conversions into [`CareLinkError`].
//!
//! [`CareLinkError`]: carelink_domain::CareLinkError

pub(crate) mod conversions;

pub use conversions::{ConfigError, InfraError};
