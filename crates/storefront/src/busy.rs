//! Busy state for controls that trigger a network call.
//!
//! A [`BusyFlag`] is the programmatic form of a disabled submit button: while
//! a [`BusyGuard`] is alive, further attempts to acquire the flag fail. The
//! guard clears the flag on drop, so every exit path (success, error, early
//! return, cancelled future) re-enables the control.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared busy/idle flag.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the control busy, or return `None` if it already is.
    #[must_use]
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds a [`BusyFlag`] set until dropped.
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
