//! Credential store
//!
//! Persists the bearer token and the last known identity through the
//! key-value port. Storage failures are logged and treated as absence so the
//! session lifecycle never fails because of local persistence.

use std::sync::Arc;

use carelink_domain::constants::{ACCESS_TOKEN_KEY, CACHED_USER_KEY};
use carelink_domain::AuthenticatedUser;
use tracing::{debug, warn};

use super::ports::AccessTokenProvider;
use crate::storage::ports::KeyValueStore;

/// Access token and cached identity backed by a [`KeyValueStore`].
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    /// Credential store backed by `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored bearer token. Blank values count as absent.
    pub fn token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY).filter(|token| !token.trim().is_empty())
    }

    /// Persist the bearer token.
    pub fn set_token(&self, token: &str) {
        self.write(ACCESS_TOKEN_KEY, token);
    }

    /// Remove the bearer token.
    pub fn clear_token(&self) {
        self.delete(ACCESS_TOKEN_KEY);
    }

    /// Last identity confirmed by the backend.
    ///
    /// An unparsable entry is reported as absent.
    pub fn cached_user(&self) -> Option<AuthenticatedUser> {
        let raw = self.read(CACHED_USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                debug!(error = %err, "ignoring unparsable cached user");
                None
            }
        }
    }

    /// Persist the identity hint used on the next bootstrap.
    pub fn set_cached_user(&self, user: &AuthenticatedUser) {
        match serde_json::to_string(user) {
            Ok(raw) => self.write(CACHED_USER_KEY, &raw),
            Err(err) => warn!(error = %err, "failed to serialize cached user"),
        }
    }

    /// Remove the identity hint.
    pub fn clear_cached_user(&self) {
        self.delete(CACHED_USER_KEY);
    }

    /// Remove the token and the cached identity.
    pub fn clear(&self) {
        self.clear_token();
        self.clear_cached_user();
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "credential storage read failed");
            None
        })
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, error = %err, "credential storage write failed");
        }
    }

    fn delete(&self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            warn!(key, error = %err, "credential storage remove failed");
        }
    }
}

impl AccessTokenProvider for CredentialStore {
    fn access_token(&self) -> Option<String> {
        self.token()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}
