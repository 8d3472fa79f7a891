//! Session service - creation, lookup and per-dependent latest sessions

use std::sync::Arc;

use carelink_domain::{NewSituationalSession, Result, SituationalSession};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use super::ports::SessionApi;
use crate::cache::KeyedEntityCache;

/// Situational sessions with a keyed latest-session cache
pub struct SessionService {
    api: Arc<dyn SessionApi>,
    latest: KeyedEntityCache<Option<SituationalSession>>,
}

impl SessionService {
    /// Service over `api` caching latest sessions in `latest`.
    pub fn new(
        api: Arc<dyn SessionApi>,
        latest: KeyedEntityCache<Option<SituationalSession>>,
    ) -> Self {
        Self { api, latest }
    }

    /// Create a session and invalidate that dependent's latest-session entry.
    #[instrument(skip_all, fields(dependent_id = %session.dependent_id))]
    pub async fn create(&self, session: &NewSituationalSession) -> Result<SituationalSession> {
        let created = self.api.create(session).await?;
        self.latest.invalidate(&session.dependent_id);
        debug!(session_id = %created.id, "session created");
        Ok(created)
    }

    /// Fetch one session, bypassing the cache.
    pub async fn get(&self, id: &str) -> Result<SituationalSession> {
        self.api.get(id).await
    }

    /// Latest session for one dependent, served from cache while fresh.
    ///
    /// "No session yet" is cached as well.
    #[instrument(skip(self))]
    pub async fn latest_for(&self, dependent_id: &str) -> Result<Option<SituationalSession>> {
        if let Some(cached) = self.latest.read(dependent_id) {
            return Ok(cached);
        }
        let latest = self.api.latest_for_dependent(dependent_id).await?;
        self.latest.write(dependent_id, latest.clone());
        Ok(latest)
    }

    /// Latest session for each dependent, fetched concurrently.
    ///
    /// A failure only affects its own entry, which is reported as `None`.
    /// Results keep the order of `dependent_ids`.
    #[instrument(skip_all, fields(count = dependent_ids.len()))]
    pub async fn latest_for_all(
        &self,
        dependent_ids: &[String],
    ) -> Vec<(String, Option<SituationalSession>)> {
        let lookups = dependent_ids.iter().map(|id| async move {
            let latest = match self.latest_for(id).await {
                Ok(latest) => latest,
                Err(err) => {
                    warn!(dependent_id = %id, error = %err, "latest session unavailable");
                    None
                }
            };
            (id.clone(), latest)
        });
        join_all(lookups).await
    }

    /// Drop one dependent's latest-session entry.
    pub fn invalidate(&self, dependent_id: &str) {
        self.latest.invalidate(dependent_id);
    }

    /// Drop every latest-session entry.
    pub fn invalidate_all(&self) {
        self.latest.invalidate_all();
    }
}
