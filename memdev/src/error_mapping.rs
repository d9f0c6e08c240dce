//! Error mapping utilities for converting between error types.
//!
//! The transport reports failures the way a character device does, as a
//! negated errno. This module maps [`UnitError`] to errno values and to
//! `embedded_io::ErrorKind`, and error kinds to human-readable strings.

use core::ffi::c_int;

use crate::error::UnitError;

pub const EINTR: c_int = 4;
pub const EBADF: c_int = 9;
pub const ENOMEM: c_int = 12;
pub const ENODEV: c_int = 19;
pub const EINVAL: c_int = 22;
pub const ENOTTY: c_int = 25;

impl UnitError {
    /// Positive errno for this error
    #[must_use]
    pub fn errno(&self) -> c_int {
        match self {
            Self::Allocation { .. } => ENOMEM,
            Self::InvalidWhence(_) | Self::OutOfRange { .. } | Self::Config(_) => EINVAL,
            Self::Interrupted => EINTR,
            Self::Unsupported(_) => ENOTTY,
            Self::NotFound(_) | Self::UnknownId(_) => ENODEV,
        }
    }

    #[must_use]
    pub fn kind(&self) -> embedded_io::ErrorKind {
        errno_to_error_kind(self.errno())
    }
}

/// Convert errno to `embedded_io::ErrorKind`
#[must_use]
#[allow(clippy::match_same_arms)] // We explicitly list common errno values for documentation
pub fn errno_to_error_kind(errno: c_int) -> embedded_io::ErrorKind {
    match errno {
        1 | 13 => embedded_io::ErrorKind::PermissionDenied, // EPERM, EACCES
        2 | 19 => embedded_io::ErrorKind::NotFound,         // ENOENT, ENODEV
        4 => embedded_io::ErrorKind::Interrupted,           // EINTR
        9 | 22 => embedded_io::ErrorKind::InvalidInput,     // EBADF, EINVAL
        12 | 28 => embedded_io::ErrorKind::OutOfMemory,     // ENOMEM, ENOSPC
        25 => embedded_io::ErrorKind::Unsupported,          // ENOTTY
        _ => embedded_io::ErrorKind::Other,
    }
}

/// Convert error kind to a static string description
#[must_use]
pub fn error_kind_to_str(kind: embedded_io::ErrorKind) -> &'static str {
    match kind {
        embedded_io::ErrorKind::NotFound => "not found",
        embedded_io::ErrorKind::PermissionDenied => "permission denied",
        embedded_io::ErrorKind::InvalidInput => "invalid input",
        embedded_io::ErrorKind::Interrupted => "interrupted",
        embedded_io::ErrorKind::Unsupported => "unsupported",
        embedded_io::ErrorKind::OutOfMemory => "out of memory",
        embedded_io::ErrorKind::Other => "other error",
        _ => "unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::ErrorKind;

    #[test]
    fn test_unit_errors_map_to_errno() {
        assert_eq!(UnitError::Interrupted.errno(), EINTR);
        assert_eq!(UnitError::InvalidWhence(7).errno(), EINVAL);
        assert_eq!(
            UnitError::OutOfRange {
                base: 0,
                offset: -1
            }
            .errno(),
            EINVAL
        );
        assert_eq!(UnitError::Unsupported(0).errno(), ENOTTY);
        assert_eq!(UnitError::Allocation { requested: 1 }.errno(), ENOMEM);
        assert_eq!(UnitError::NotFound("x".into()).errno(), ENODEV);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(UnitError::Interrupted.kind(), ErrorKind::Interrupted);
        assert_eq!(UnitError::Unsupported(1).kind(), ErrorKind::Unsupported);
        assert_eq!(error_kind_to_str(ErrorKind::OutOfMemory), "out of memory");
        assert_eq!(errno_to_error_kind(EBADF), ErrorKind::InvalidInput);
        assert_eq!(errno_to_error_kind(110), ErrorKind::Other);
    }
}
