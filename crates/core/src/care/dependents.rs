//! Dependent directory - cache-first access to dependent profiles

use std::sync::Arc;

use carelink_domain::{DependentProfile, NewDependentProfile, Result};
use tracing::{debug, instrument};

use super::ports::DependentApi;
use crate::cache::EntityCache;

/// Dependent profiles with a TTL-bounded list cache
pub struct DependentDirectory {
    api: Arc<dyn DependentApi>,
    cache: EntityCache<Vec<DependentProfile>>,
}

impl DependentDirectory {
    /// Directory over `api` caching the list in `cache`.
    pub fn new(api: Arc<dyn DependentApi>, cache: EntityCache<Vec<DependentProfile>>) -> Self {
        Self { api, cache }
    }

    /// Dependent list, served from cache while fresh.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<DependentProfile>> {
        if let Some(cached) = self.cache.read() {
            debug!(count = cached.len(), "serving dependents from cache");
            return Ok(cached);
        }
        self.refresh().await
    }

    /// Fetch the list from the backend and re-prime the cache.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<Vec<DependentProfile>> {
        let dependents = self.api.list().await?;
        self.cache.write(&dependents);
        Ok(dependents)
    }

    /// Create a dependent. The cached list is invalidated so the next read
    /// includes it.
    #[instrument(skip_all)]
    pub async fn create(&self, profile: &NewDependentProfile) -> Result<DependentProfile> {
        let created = self.api.create(profile).await?;
        self.cache.invalidate();
        debug!(dependent_id = %created.id, "dependent created");
        Ok(created)
    }

    /// Fetch one dependent, bypassing the cache.
    pub async fn get(&self, id: &str) -> Result<DependentProfile> {
        self.api.get(id).await
    }

    /// Drop the cached list.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
