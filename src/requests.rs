//! Stale-response guard.
//!
//! A page takes a [`Ticket`] before awaiting a request and checks it before
//! applying the response. Invalidating the guard (on unmount, or when a newer
//! reload supersedes an older one) makes every outstanding ticket stale, and
//! the late response is dropped instead of being written into a dead view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    generation: Arc<AtomicU64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> Ticket {
        Ticket {
            issued_at: self.generation.load(Ordering::SeqCst),
            generation: Arc::clone(&self.generation),
        }
    }

    /// Invalidate all outstanding tickets and issue a fresh one.
    pub fn supersede(&self) -> Ticket {
        self.invalidate();
        self.ticket()
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    issued_at: u64,
    generation: Arc<AtomicU64>,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued_at
    }

    /// Pass `value` through only if the ticket is still current.
    pub fn accept<T>(&self, what: &str, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            debug!("Dropping stale response for {}", what);
            None
        }
    }
}
