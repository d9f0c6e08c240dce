//! Error types for unit operations

use crate::config::ConfigError;
use crate::idgen::UnitId;

/// Errors returned by storage units, sessions and the unit table
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reserving memory for the buffer failed; the unit is left as it was
    #[error("cannot allocate {requested} bytes for unit buffer")]
    Allocation { requested: usize },

    #[error("invalid seek mode: {0}")]
    InvalidWhence(i32),

    /// Computed seek target is negative or does not fit a file offset
    #[error("seek target out of range (offset {offset} from {base})")]
    OutOfRange { base: u64, offset: i64 },

    #[error("interrupted while waiting for unit lock")]
    Interrupted,

    #[error("unsupported control command: {0:#x}")]
    Unsupported(u32),

    #[error("unit not found: {0}")]
    NotFound(String),

    #[error("unknown unit id: {0:?}")]
    UnknownId(UnitId),
}
