//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

// Persistent storage keys
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const CACHED_USER_KEY: &str = "auth_cached_user";
pub const DEPENDENTS_CACHE_KEY: &str = "children_cache_v1";
pub const LATEST_SESSION_CACHE_KEY: &str = "latest_session_cache_v1";

// Cache freshness
pub const DEPENDENTS_TTL_MS: u64 = 40_000;
pub const LATEST_SESSION_TTL_MS: u64 = 40_000;

// Prompt polling
pub const POLL_MAX_ATTEMPTS: u32 = 3;
pub const POLL_DELAY_MS: u64 = 4_000;

// Navigation
pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

// HTTP
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("carelink-client/", env!("CARGO_PKG_VERSION"));

// Session input vocabularies
pub const MOODS: [&str; 6] = ["calm", "happy", "anxious", "uncomfortable", "angry", "tired"];
pub const ENVIRONMENT_LOCATIONS: [&str; 2] = ["loc_indoor", "loc_outdoor"];
pub const ENVIRONMENT_NOISE: [&str; 3] = ["noise_quiet", "noise_moderate", "noise_noisy"];
pub const ENVIRONMENT_CROWD: [&str; 3] = ["crowd_alone", "crowd_few", "crowd_many"];
