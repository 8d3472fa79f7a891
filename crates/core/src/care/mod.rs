//! Dependent profiles and situational sessions

pub mod dependents;
pub mod ports;
pub mod sessions;

pub use dependents::DependentDirectory;
pub use sessions::SessionService;
