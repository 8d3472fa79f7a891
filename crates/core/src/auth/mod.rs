//! Authentication: credential persistence, the unauthorized signal and the
//! session lifecycle.

pub mod credentials;
pub mod ports;
pub mod session_manager;
pub mod unauthorized;

pub use credentials::CredentialStore;
pub use session_manager::{SessionManager, SessionScope};
pub use unauthorized::{HookRegistration, UnauthorizedHook};
