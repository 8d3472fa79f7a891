//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Read `.env` into the process environment (if present)
//! 2. Start from the first config file found by [`probe_config_paths`], or
//!    from defaults when there is none
//! 3. Apply environment variable overrides
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `CARELINK_API_BASE_URL`: backend base URL
//! - `CARELINK_API_TIMEOUT_SECS`: request timeout in seconds
//! - `CARELINK_CACHE_TTL_MS`: entity cache TTL in milliseconds
//! - `CARELINK_POLL_MAX_ATTEMPTS`: prompt poll attempts
//! - `CARELINK_POLL_DELAY_MS`: delay between prompt poll attempts
//! - `CARELINK_STORAGE_PATH`: JSON file for persistent storage
//! - `CARELINK_LOG_LEVEL`: default tracing filter
//! - `CARELINK_LOG_JSON`: emit JSON logs (true/false)
//!
//! ## File Locations
//! `./carelink.toml`, `./carelink.json`, `./config.toml`, `./config.json` in
//! the current working directory, then the same names next to the
//! executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use carelink_domain::{ClientConfig, Result};

use crate::errors::ConfigError;

const CONFIG_FILE_NAMES: [&str; 4] = ["carelink.toml", "carelink.json", "config.toml", "config.json"];

/// Load configuration from `.env`, an optional file and the environment.
///
/// # Errors
/// Returns `CareLinkError::Config` if a config file exists but cannot be
/// parsed, an environment variable has an invalid value, or validation fails.
pub fn load() -> Result<ClientConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env file"),
    }

    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("no config file found; using defaults");
            ClientConfig::default()
        }
    };

    let config = apply_env_overrides(base, |key| std::env::var(key).ok())?;
    validate(&config)?;
    tracing::info!(base_url = %config.api.base_url, "configuration loaded");
    Ok(config)
}

/// Defaults plus environment variable overrides, without consulting files.
///
/// # Errors
/// Returns `CareLinkError::Config` for invalid values.
pub fn load_from_env() -> Result<ClientConfig> {
    let config = apply_env_overrides(ClientConfig::default(), |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// extension (`.toml` or `.json`). Missing sections take their defaults.
///
/// # Errors
/// Returns `CareLinkError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) if !p.exists() => return Err(ConfigError::NotFound(p).into()),
        Some(p) => p,
        None => probe_config_paths()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from(CONFIG_FILE_NAMES[0])))?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|source| ConfigError::Read { path: config_path.clone(), source })?;

    Ok(parse_config(&contents, &config_path)?)
}

fn parse_config(contents: &str, path: &Path) -> std::result::Result<ClientConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            format: "TOML",
            message: e.to_string(),
        }),
        "json" => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            format: "JSON",
            message: e.to_string(),
        }),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.is_file())
}

/// Apply `CARELINK_*` overrides read through `lookup`.
///
/// Blank values are ignored.
///
/// # Errors
/// Returns `CareLinkError::Config` when a value cannot be parsed.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = var("CARELINK_API_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(raw) = var("CARELINK_API_TIMEOUT_SECS") {
        config.api.timeout_secs = parse_number("CARELINK_API_TIMEOUT_SECS", &raw)?;
    }
    if let Some(raw) = var("CARELINK_CACHE_TTL_MS") {
        config.cache.ttl_ms = parse_number("CARELINK_CACHE_TTL_MS", &raw)?;
    }
    if let Some(raw) = var("CARELINK_POLL_MAX_ATTEMPTS") {
        config.polling.max_attempts = parse_number("CARELINK_POLL_MAX_ATTEMPTS", &raw)?;
    }
    if let Some(raw) = var("CARELINK_POLL_DELAY_MS") {
        config.polling.delay_ms = parse_number("CARELINK_POLL_DELAY_MS", &raw)?;
    }
    if let Some(path) = var("CARELINK_STORAGE_PATH") {
        config.storage.path = Some(PathBuf::from(path));
    }
    if let Some(level) = var("CARELINK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(raw) = var("CARELINK_LOG_JSON") {
        config.logging.json = parse_bool("CARELINK_LOG_JSON", &raw)?;
    }

    Ok(config)
}

/// Reject configurations the client cannot run with.
///
/// # Errors
/// Returns `CareLinkError::Config` naming the offending setting.
pub fn validate(config: &ClientConfig) -> Result<()> {
    let invalid = |key: &str, value: String, reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        reason: reason.to_string(),
    };

    let base_url = &config.api.base_url;
    match url::Url::parse(base_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(_) => return Err(invalid("api.base_url", base_url.clone(), "scheme must be http or https").into()),
        Err(e) => return Err(invalid("api.base_url", base_url.clone(), &e.to_string()).into()),
    }
    if config.api.timeout_secs == 0 {
        return Err(invalid("api.timeout_secs", "0".into(), "must be positive").into());
    }
    if config.polling.max_attempts == 0 {
        return Err(invalid("polling.max_attempts", "0".into(), "must be at least 1").into());
    }
    Ok(())
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        ConfigError::InvalidValue { key: key.to_string(), value: raw.to_string(), reason: e.to_string() }
            .into()
    })
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }
        .into()),
    }
}
