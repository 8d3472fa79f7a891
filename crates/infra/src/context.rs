//! Composition root
//!
//! Builds the gateway, credential store, session manager and care services
//! around one key-value store and one navigator, all sharing a single
//! unauthorized hook.

use std::sync::Arc;

use carelink_common::{Clock, SystemClock};
use carelink_core::{
    CredentialStore, DependentDirectory, EntityCache, KeyValueStore, KeyedEntityCache, Navigator,
    PollerConfig, PromptPoller, SessionApi, SessionManager, SessionPromptTarget, SessionService,
    UnauthorizedHook,
};
use carelink_domain::constants::{DEPENDENTS_CACHE_KEY, LATEST_SESSION_CACHE_KEY};
use carelink_domain::{ClientConfig, Result};
use tracing::info;

use crate::api::{DependentClient, IdentityClient, SessionClient};
use crate::http::HttpGateway;
use crate::navigation::InMemoryNavigator;
use crate::storage::{FileStore, MemoryStore};

/// Fully wired client
pub struct ClientContext {
    config: ClientConfig,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    credentials: CredentialStore,
    hook: Arc<UnauthorizedHook>,
    gateway: HttpGateway,
    session_api: Arc<dyn SessionApi>,
    session_manager: Arc<SessionManager>,
    dependents: Arc<DependentDirectory>,
    sessions: Arc<SessionService>,
}

impl ClientContext {
    /// Wire a client around the given storage and navigator.
    ///
    /// # Errors
    /// Returns `CareLinkError::Config` when the gateway cannot be built from
    /// `config.api`.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::with_clock(config, store, navigator, Arc::new(SystemClock))
    }

    /// Like [`ClientContext::new`] with an explicit clock for cache freshness.
    ///
    /// # Errors
    /// See [`ClientContext::new`].
    pub fn with_clock(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let credentials = CredentialStore::new(Arc::clone(&store));
        let hook = Arc::new(UnauthorizedHook::new());

        let gateway = HttpGateway::builder()
            .api_config(&config.api)
            .tokens(Arc::new(credentials.clone()))
            .unauthorized_hook(Arc::clone(&hook))
            .build()?;

        let session_api: Arc<dyn SessionApi> = Arc::new(SessionClient::new(gateway.clone()));
        let session_manager = Arc::new(SessionManager::new(
            credentials.clone(),
            Arc::new(IdentityClient::new(gateway.clone())),
            Arc::clone(&navigator),
            Arc::clone(&hook),
        ));

        let ttl = config.cache.ttl();
        let dependents = Arc::new(DependentDirectory::new(
            Arc::new(DependentClient::new(gateway.clone())),
            EntityCache::with_clock(Arc::clone(&store), DEPENDENTS_CACHE_KEY, ttl, Arc::clone(&clock)),
        ));
        let sessions = Arc::new(SessionService::new(
            Arc::clone(&session_api),
            KeyedEntityCache::with_clock(Arc::clone(&store), LATEST_SESSION_CACHE_KEY, ttl, clock),
        ));

        info!(base_url = %gateway.base_url(), "client context ready");
        Ok(Self {
            config,
            store,
            navigator,
            credentials,
            hook,
            gateway,
            session_api,
            session_manager,
            dependents,
            sessions,
        })
    }

    /// Wire a client from configuration alone.
    ///
    /// Uses a [`FileStore`] when `storage.path` is set, otherwise a
    /// [`MemoryStore`], and an [`InMemoryNavigator`].
    ///
    /// # Errors
    /// See [`ClientContext::new`].
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.storage.path {
            Some(path) => Arc::new(FileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        Self::new(config, store, Arc::new(InMemoryNavigator::new()))
    }

    /// New prompt poller using the configured attempt budget.
    pub fn prompt_poller(&self) -> PromptPoller {
        PromptPoller::new(
            SessionPromptTarget::new(Arc::clone(&self.session_api)),
            PollerConfig::from(&self.config.polling),
        )
    }

    /// Configuration the context was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session manager.
    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }

    /// Dependent directory.
    pub fn dependents(&self) -> &Arc<DependentDirectory> {
        &self.dependents
    }

    /// Session service.
    pub fn sessions(&self) -> &Arc<SessionService> {
        &self.sessions
    }

    /// HTTP gateway.
    pub fn gateway(&self) -> &HttpGateway {
        &self.gateway
    }

    /// Credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Key-value store shared by credentials and caches.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Navigator used for login redirects.
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Hook shared by the gateway and the session manager.
    pub fn unauthorized_hook(&self) -> &Arc<UnauthorizedHook> {
        &self.hook
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("base_url", &self.gateway.base_url())
            .field("status", &self.session_manager.status())
            .finish_non_exhaustive()
    }
}
