//! # CareLink Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP gateway and the care backend API clients
//! - Key-value stores (in-memory and JSON file)
//! - An in-memory navigator
//! - Configuration loading and tracing setup
//! - [`ClientContext`], which wires everything together
//!
//! ## Architecture
//! - Implements traits defined in `carelink-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod navigation;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::{DependentClient, IdentityClient, SessionClient};
pub use context::ClientContext;
pub use errors::{ConfigError, InfraError};
pub use http::{HttpGateway, HttpGatewayBuilder, RequestOptions};
pub use navigation::InMemoryNavigator;
pub use storage::{FileStore, MemoryStore};
