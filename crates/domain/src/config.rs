//! Client configuration structures
//!
//! Loaded by `carelink_infra::config` from the environment or a TOML/JSON
//! file. Every section has defaults so a partial file is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEPENDENTS_TTL_MS, POLL_DELAY_MS,
    POLL_MAX_ATTEMPTS,
};

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub cache: CacheSettings,
    pub polling: PollingSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute http(s) URL prepended to every API path.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ApiConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Entity cache freshness window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_ms: DEPENDENTS_TTL_MS }
    }
}

impl CacheSettings {
    /// Cache freshness window.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Prompt poller budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self { max_attempts: POLL_MAX_ATTEMPTS, delay_ms: POLL_DELAY_MS }
    }
}

impl PollingSettings {
    /// Delay between poll attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Persistent key-value storage location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON file backing the store. `None` keeps everything in memory.
    pub path: Option<PathBuf>,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
