//! Shared liveness flag
//!
//! An owner creates a [`Liveness`], hands clones to the tasks it spawns and
//! calls [`Liveness::kill`] on teardown. Tasks check [`Liveness::is_live`]
//! before publishing results so late completions are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable flag that starts live and can only be turned off.
#[derive(Debug, Clone)]
pub struct Liveness {
    live: Arc<AtomicBool>,
}

impl Liveness {
    /// Create a live flag.
    pub fn new() -> Self {
        Self { live: Arc::new(AtomicBool::new(true)) }
    }

    /// Whether the owner is still around.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Mark the owner as gone. Idempotent.
    pub fn kill(&self) {
        self.live.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
