use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Externally visible identifier of a storage unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    id: u32,
}

impl UnitId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Thread-safe sequential ID generator
#[derive(Debug)]
pub struct IdGen {
    next_id: AtomicU32,
}

impl IdGen {
    /// Start handing out IDs from `base`
    #[must_use]
    pub fn starting_at(base: u32) -> Self {
        Self {
            next_id: AtomicU32::new(base),
        }
    }

    /// Get the next unique ID
    pub fn get_next(&self) -> UnitId {
        UnitId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::starting_at(0)
    }
}
