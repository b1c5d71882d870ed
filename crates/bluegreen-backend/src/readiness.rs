//! Readiness gate.
//!
//! A two-valued flag read by `/health/ready`. It is flipped by tests, by the
//! `readiness.initial` config key at startup, and to `false` when shutdown
//! begins so load balancers stop routing to a draining instance.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct Readiness {
    ready: AtomicBool,
}

impl Readiness {
    pub fn new(initial: bool) -> Self {
        Self { ready: AtomicBool::new(initial) }
    }

    pub fn set_ready(&self, ready: bool) {
        let prev = self.ready.swap(ready, Ordering::SeqCst);
        if prev != ready {
            tracing::info!(ready, "readiness changed");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new(true)
    }
}
