//! Shared run-progress counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Number of items already tested in the current (or previous) run.
///
/// Clones share the same counter, so the test loop and the reset
/// coordinator can hold it on different threads.
#[derive(Debug, Clone, Default)]
pub struct RunProgress {
    tested: Arc<AtomicUsize>,
}

impl RunProgress {
    /// Create a counter starting at `tested`.
    pub fn new(tested: usize) -> Self {
        Self {
            tested: Arc::new(AtomicUsize::new(tested)),
        }
    }

    pub fn get(&self) -> usize {
        self.tested.load(Ordering::SeqCst)
    }

    /// Record one more tested item and return the new count.
    pub fn increment(&self) -> usize {
        self.tested.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn set(&self, tested: usize) {
        self.tested.store(tested, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.set(0);
    }
}
