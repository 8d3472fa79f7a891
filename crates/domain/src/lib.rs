//! # CareLink Domain
//!
//! Business domain types and models for the CareLink client.
//!
//! This crate contains:
//! - Wire types exchanged with the care backend (users, dependents, sessions)
//! - The client error taxonomy and Result alias
//! - Configuration structures
//! - Domain constants (storage keys, TTLs, polling budget)
//!
//! ## Architecture
//! - No dependencies on other CareLink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
