//! Domain types and models
//!
//! Field names follow the backend's JSON contract through serde renames; the
//! Rust names describe what the fields mean.

pub mod dependent;
pub mod session;
pub mod status;
pub mod user;

pub use dependent::{
    CommunicationLevel, DependentList, DependentProfile, NewDependentProfile, Personality,
};
pub use session::{Mood, NewSituationalSession, SituationalSession};
pub use status::{SessionSnapshot, SessionStatus};
pub use user::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, Role};
