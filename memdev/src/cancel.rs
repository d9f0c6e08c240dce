//! Interrupt token for lock waits
//!
//! A session owns one token. Any thread holding a clone may raise it; the next
//! lock wait on that session notices the pending interrupt, consumes it and
//! fails with [`UnitError::Interrupted`](crate::UnitError::Interrupted).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a pending interrupt
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Consume a pending interrupt, returning whether one was raised
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
