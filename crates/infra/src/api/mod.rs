//! Care backend API clients
//!
//! Thin adapters implementing the core API ports on top of [`HttpGateway`].
//!
//! [`HttpGateway`]: crate::http::HttpGateway

mod dependents;
mod identity;
mod sessions;

pub use dependents::DependentClient;
pub use identity::IdentityClient;
pub use sessions::SessionClient;
