//! Storage unit: one buffer behind one lock
//!
//! # Thread Safety
//!
//! Every operation on a unit holds its `parking_lot::Mutex` for the whole
//! operation, across all sessions bound to the unit. Growth and clearing of
//! the buffer happen only under the lock, so nobody observes a buffer in the
//! middle of a reallocation.
//!
//! Waiting for the lock is interruptible through the session's
//! [`CancelToken`]. The lock is NOT reentrant: holding a [`UnitGuard`] and
//! starting another operation on the same unit from the same thread blocks
//! until that operation is interrupted.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tracing::warn;

use crate::cancel::CancelToken;
use crate::error::UnitError;
use crate::idgen::UnitId;
use crate::io::Buffer;

/// Exclusive access to a unit's buffer
///
/// The lock is released when the guard is dropped.
pub struct UnitGuard<'a>(MutexGuard<'a, Buffer>);

impl Deref for UnitGuard<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.0
    }
}

impl DerefMut for UnitGuard<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        &mut self.0
    }
}

pub struct StorageUnit {
    id: UnitId,
    name: String,
    state: Mutex<Buffer>,
    poll: Duration,
}

impl StorageUnit {
    /// Create a unit with a zero-filled buffer of `initial_capacity` bytes
    ///
    /// `poll` bounds how long a lock wait goes without checking for an
    /// interrupt.
    pub fn new(
        id: UnitId,
        name: &str,
        initial_capacity: usize,
        poll: Duration,
    ) -> Result<Self, UnitError> {
        Ok(Self {
            id,
            name: name.to_string(),
            state: Mutex::new(Buffer::with_capacity(initial_capacity)?),
            poll,
        })
    }

    #[must_use]
    pub fn id(&self) -> UnitId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire the unit lock, waiting until it is free or `cancel` is raised
    ///
    /// A pending interrupt is consumed and reported as
    /// [`UnitError::Interrupted`]; the unit is not touched in that case.
    /// Acquiring the lock also consumes any pending interrupt, so an
    /// interrupt never outlives the operation it was raised against.
    pub fn lock(&self, cancel: &CancelToken) -> Result<UnitGuard<'_>, UnitError> {
        if let Some(guard) = self.state.try_lock() {
            cancel.take();
            return Ok(UnitGuard(guard));
        }
        loop {
            if cancel.take() {
                warn!(unit = %self.name, "interrupted while waiting for lock");
                return Err(UnitError::Interrupted);
            }
            if let Some(guard) = self.state.try_lock_for(self.poll) {
                cancel.take();
                return Ok(UnitGuard(guard));
            }
        }
    }

    /// Current capacity, taken under the lock
    pub fn capacity(&self, cancel: &CancelToken) -> Result<usize, UnitError> {
        Ok(self.lock(cancel)?.capacity())
    }

    /// Copy of the whole buffer, taken under the lock
    pub fn snapshot(&self, cancel: &CancelToken) -> Result<Vec<u8>, UnitError> {
        Ok(self.lock(cancel)?.to_vec())
    }
}

impl fmt::Debug for StorageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageUnit")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
