//! Session: one consumer's cursor into a unit
//!
//! The session borrows nothing from the buffer; it holds a shared reference to
//! the unit, a cursor and the token used to interrupt its lock waits. The
//! operations themselves live in [`crate::engine`].

use std::fmt;
use std::sync::Arc;

use embedded_io::{ErrorType, Read, Seek, SeekFrom, Write};

use crate::cancel::CancelToken;
use crate::engine::Whence;
use crate::error::UnitError;
use crate::unit::StorageUnit;

pub struct Session {
    pub(crate) unit: Arc<StorageUnit>,
    pub(crate) cursor: u64,
    pub(crate) cancel: CancelToken,
}

impl Session {
    #[must_use]
    pub fn new(unit: Arc<StorageUnit>) -> Self {
        Self {
            unit,
            cursor: 0,
            cancel: CancelToken::new(),
        }
    }

    /// Current cursor
    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor
    }

    #[must_use]
    pub fn unit(&self) -> &Arc<StorageUnit> {
        &self.unit
    }

    /// Token that interrupts this session's lock waits, usable from any thread
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session(unit={}, cursor={})",
            self.unit.name(),
            self.cursor
        )
    }
}

impl embedded_io::Error for UnitError {
    fn kind(&self) -> embedded_io::ErrorKind {
        UnitError::kind(self)
    }
}

impl ErrorType for Session {
    type Error = UnitError;
}

impl Read for Session {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Session::read(self, buf)
    }
}

impl Write for Session {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Session::write(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // Nothing is buffered outside the unit
        Ok(())
    }
}

impl Seek for Session {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        match pos {
            SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset).map_err(|_| UnitError::OutOfRange {
                    base: 0,
                    offset: i64::MAX,
                })?;
                Session::seek(self, offset, Whence::Start)
            }
            SeekFrom::Current(offset) => Session::seek(self, offset, Whence::Current),
            SeekFrom::End(offset) => Session::seek(self, offset, Whence::End),
        }
    }
}
