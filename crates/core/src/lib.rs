//! # CareLink Core
//!
//! Client-side synchronization logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the backend API, key-value storage and
//!   navigation
//! - The credential store and session lifecycle manager
//! - TTL-bounded persistent entity caches
//! - Dependent/session services and the eventually-consistent prompt poller
//!
//! ## Architecture Principles
//! - Only depends on `carelink-common` and `carelink-domain`
//! - No HTTP, filesystem, or platform code
//! - All external dependencies via traits

pub mod auth;
pub mod cache;
pub mod care;
pub mod navigation;
pub mod polling;
pub mod storage;

pub use auth::ports::{AccessTokenProvider, IdentityApi};
pub use auth::{CredentialStore, HookRegistration, SessionManager, SessionScope, UnauthorizedHook};
pub use cache::{EntityCache, KeyedEntityCache};
pub use care::ports::{DependentApi, SessionApi};
pub use care::{DependentDirectory, SessionService};
pub use navigation::ports::{NavigateOptions, Navigator};
pub use polling::{
    PollSnapshot, PollState, PollTarget, Poller, PollerConfig, PromptPoller, SessionPromptTarget,
};
pub use storage::ports::{KeyValueStore, StorageError};
