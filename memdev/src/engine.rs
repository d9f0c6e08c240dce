//! Read, write, seek and control operations on a session
//!
//! Each operation locks the bound unit on entry and keeps the lock until it
//! returns. Waiting for the lock is interruptible; an interrupted operation
//! changes nothing.
//!
//! # Growth policy
//!
//! Only `seek` grows a unit. Seeking past the capacity reallocates the buffer
//! to twice the target. `write` never grows: a write that does not fit below
//! the capacity is rejected whole and reports 0 bytes. The asymmetry is
//! intentional, so to extend a unit, seek past its end first and then write.

use tracing::{debug, info, warn};

use crate::error::UnitError;
use crate::session::Session;

/// Base for a seek offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// From the start of the unit (`SEEK_SET`)
    Start,
    /// From the session cursor (`SEEK_CUR`)
    Current,
    /// From the current capacity (`SEEK_END`)
    End,
}

impl TryFrom<i32> for Whence {
    type Error = UnitError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            other => Err(UnitError::InvalidWhence(other)),
        }
    }
}

/// Magic byte of the unit control commands
pub const CONTROL_MAGIC: u8 = b'Z';

const IOC_WRITE: u32 = 1;

/// Encode a write-direction control code the way `_IOW` does
const fn ioc_write(kind: u8, nr: u8, size: u32) -> u32 {
    (IOC_WRITE << 30) | (size << 16) | ((kind as u32) << 8) | nr as u32
}

/// Out-of-band requests on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Rewind the cursor and zero the whole unit
    Clear,
}

impl ControlCommand {
    pub const CLEAR_CODE: u32 = ioc_write(CONTROL_MAGIC, 1, 4);

    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Clear => Self::CLEAR_CODE,
        }
    }
}

impl TryFrom<u32> for ControlCommand {
    type Error = UnitError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            Self::CLEAR_CODE => Ok(Self::Clear),
            other => Err(UnitError::Unsupported(other)),
        }
    }
}

impl Session {
    /// Write `data` at the cursor
    ///
    /// Returns the number of bytes written. If the data would extend past the
    /// capacity nothing is written, the unit does not grow, and the result is
    /// `Ok(0)`.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, UnitError> {
        let mut buffer = self.unit.lock(&self.cancel)?;
        debug!(unit = %self.unit.name(), pos = self.cursor, len = data.len(), "write");

        let capacity = buffer.capacity();
        let fits = usize::try_from(self.cursor)
            .ok()
            .and_then(|pos| pos.checked_add(data.len()))
            .is_some_and(|end| end <= capacity);
        if !fits {
            warn!(
                unit = %self.unit.name(),
                pos = self.cursor,
                len = data.len(),
                capacity,
                "write past end of unit rejected"
            );
            return Ok(0);
        }

        #[allow(clippy::cast_possible_truncation)]
        let n = buffer.write_at(self.cursor as usize, data);
        self.cursor += n as u64;
        Ok(n)
    }

    /// Read into `out` from the cursor
    ///
    /// Copies at most `capacity - cursor` bytes. Returns 0 at or past the end.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize, UnitError> {
        let buffer = self.unit.lock(&self.cancel)?;
        debug!(unit = %self.unit.name(), pos = self.cursor, len = out.len(), "read");

        let Ok(pos) = usize::try_from(self.cursor) else {
            return Ok(0);
        };
        let n = buffer.read_at(pos, out);
        self.cursor += n as u64;
        Ok(n)
    }

    /// Move the cursor and return its new value
    ///
    /// A target past the capacity grows the unit to twice the target before
    /// the cursor is committed. A negative target is rejected and nothing
    /// changes.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, UnitError> {
        let mut buffer = self.unit.lock(&self.cancel)?;
        debug!(unit = %self.unit.name(), offset, ?whence, "seek");

        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.cursor,
            Whence::End => buffer.capacity() as u64,
        };
        let out_of_range = UnitError::OutOfRange { base, offset };
        let target = i64::try_from(base)
            .ok()
            .and_then(|base| base.checked_add(offset))
            .and_then(|target| u64::try_from(target).ok())
            .ok_or(out_of_range)?;

        if target > buffer.capacity() as u64 {
            let new_capacity = usize::try_from(target).map_err(|_| UnitError::Allocation {
                requested: usize::MAX,
            })?;
            buffer.grow_to(new_capacity)?;
            debug!(unit = %self.unit.name(), capacity = buffer.capacity(), "unit grown");
        }

        self.cursor = target;
        Ok(target)
    }

    /// Rewind the cursor and zero the unit; capacity is unchanged
    pub fn clear(&mut self) -> Result<(), UnitError> {
        let mut buffer = self.unit.lock(&self.cancel)?;
        self.cursor = 0;
        buffer.zero();
        info!(unit = %self.unit.name(), "unit cleared");
        Ok(())
    }

    /// Run a raw control code
    ///
    /// Unknown codes fail with [`UnitError::Unsupported`] without locking the
    /// unit.
    pub fn control(&mut self, code: u32) -> Result<(), UnitError> {
        let command = ControlCommand::try_from(code).inspect_err(|_| {
            warn!(unit = %self.unit.name(), code, "unsupported control command");
        })?;
        match command {
            ControlCommand::Clear => self.clear(),
        }
    }
}
