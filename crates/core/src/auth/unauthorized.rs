//! Process-wide "credential rejected" signal
//!
//! The HTTP gateway fires the hook when the backend answers 401/403. The
//! session manager registers the reaction. There is a single slot: the last
//! registration wins, and clearing only succeeds for the registration that
//! currently owns the slot. The reaction receives the credential the rejected
//! request carried, if any.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

type Reaction = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Receipt returned by [`UnauthorizedHook::set`].
#[derive(Debug, PartialEq, Eq)]
pub struct HookRegistration(u64);

/// Single-slot unauthorized callback.
#[derive(Default)]
pub struct UnauthorizedHook {
    slot: Mutex<Option<(u64, Reaction)>>,
    next_id: AtomicU64,
}

impl UnauthorizedHook {
    /// Empty hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reaction`, replacing any previous one.
    pub fn set<F>(&self, reaction: F) -> HookRegistration
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        *self.slot.lock() = Some((id, Arc::new(reaction)));
        HookRegistration(id)
    }

    /// Clear the slot if `registration` still owns it.
    pub fn clear_if(&self, registration: &HookRegistration) -> bool {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some((id, _)) if *id == registration.0 => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Clear the slot unconditionally.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Whether a reaction is registered.
    pub fn is_set(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Invoke the registered reaction with the credential the rejected
    /// request carried. Returns whether a reaction ran.
    pub fn fire(&self, rejected: Option<&str>) -> bool {
        // Run outside the lock so the reaction may re-register.
        let reaction = self.slot.lock().as_ref().map(|(_, reaction)| Arc::clone(reaction));
        match reaction {
            Some(reaction) => {
                reaction(rejected);
                true
            }
            None => {
                debug!("unauthorized signal with no registered reaction");
                false
            }
        }
    }
}

impl std::fmt::Debug for UnauthorizedHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnauthorizedHook").field("is_set", &self.is_set()).finish()
    }
}
