//! In-memory navigator
//!
//! Records the current location and the navigation history. Hosts embedding
//! the client (a UI shell, a CLI, tests) read the history to drive their own
//! routing.

use carelink_core::{NavigateOptions, Navigator};
use carelink_domain::constants::HOME_ROUTE;
use parking_lot::RwLock;
use tracing::debug;

/// One recorded navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub route: String,
    pub options: NavigateOptions,
}

#[derive(Debug)]
struct NavigationState {
    location: String,
    history: Vec<NavigationEntry>,
}

/// [`Navigator`] that keeps its state in memory
#[derive(Debug)]
pub struct InMemoryNavigator {
    state: RwLock<NavigationState>,
}

impl InMemoryNavigator {
    /// Navigator starting at the home route.
    pub fn new() -> Self {
        Self::starting_at(HOME_ROUTE)
    }

    /// Navigator starting at `location`.
    pub fn starting_at(location: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(NavigationState { location: location.into(), history: Vec::new() }),
        }
    }

    /// Move without recording history, e.g. when the host changes route.
    pub fn set_location(&self, location: impl Into<String>) {
        self.state.write().location = location.into();
    }

    /// Every recorded navigation, oldest first.
    pub fn history(&self) -> Vec<NavigationEntry> {
        self.state.read().history.clone()
    }

    /// Most recent navigation.
    pub fn last(&self) -> Option<NavigationEntry> {
        self.state.read().history.last().cloned()
    }
}

impl Default for InMemoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for InMemoryNavigator {
    fn navigate(&self, route: &str, options: NavigateOptions) {
        debug!(route, replace = options.replace, "navigating");
        let mut state = self.state.write();
        state.location = route.to_string();
        state.history.push(NavigationEntry { route: route.to_string(), options });
    }

    fn current_location(&self) -> String {
        self.state.read().location.clone()
    }
}
