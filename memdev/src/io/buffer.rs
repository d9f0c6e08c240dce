//! Growable zero-filled byte buffer
//!
//! Backing storage for one unit. The allocated length is the capacity: every
//! byte in `[0, capacity)` is defined and starts out as zero.

use std::ops::Deref;

use crate::error::UnitError;

/// Fixed-length byte buffer that only grows through [`Buffer::grow_to`]
///
/// The buffer itself does no locking; it is owned by a
/// [`StorageUnit`](crate::unit::StorageUnit) which serializes access to it.
///
/// # Example
///
/// ```
/// use memdev::io::Buffer;
///
/// let mut buffer = Buffer::with_capacity(16).unwrap();
/// assert_eq!(buffer.write_at(0, b"hello"), 5);
///
/// let mut out = [0u8; 5];
/// assert_eq!(buffer.read_at(0, &mut out), 5);
/// assert_eq!(&out, b"hello");
/// ```
#[derive(Debug)]
pub struct Buffer(Vec<u8>);

impl Buffer {
    /// Allocate a zero-filled buffer of exactly `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Result<Self, UnitError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| UnitError::Allocation {
                requested: capacity,
            })?;
        data.resize(capacity, 0);
        Ok(Self(data))
    }

    /// Current usable length
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.0.len()
    }

    /// Grow to twice `new_capacity`
    ///
    /// Callers only grow when `new_capacity` exceeds the current capacity.
    /// Existing bytes are kept, the added tail is zero. On failure the buffer
    /// is untouched.
    pub fn grow_to(&mut self, new_capacity: usize) -> Result<(), UnitError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let doubled = new_capacity
            .checked_mul(2)
            .ok_or(UnitError::Allocation {
                requested: usize::MAX,
            })?;
        let additional = doubled - self.0.len();
        self.0
            .try_reserve_exact(additional)
            .map_err(|_| UnitError::Allocation { requested: doubled })?;
        self.0.resize(doubled, 0);
        Ok(())
    }

    /// Copy bytes starting at `pos` into `out`
    ///
    /// The copy is clamped to the capacity. Returns the number of bytes copied,
    /// zero when `pos` is at or past the end.
    pub fn read_at(&self, pos: usize, out: &mut [u8]) -> usize {
        if pos >= self.0.len() {
            return 0;
        }
        let n = out.len().min(self.0.len() - pos);
        out[..n].copy_from_slice(&self.0[pos..pos + n]);
        n
    }

    /// Copy `data` into the buffer at `pos`
    ///
    /// All or nothing: when the data does not fit below the capacity nothing
    /// is written and 0 is returned. Writing never grows the buffer.
    pub fn write_at(&mut self, pos: usize, data: &[u8]) -> usize {
        match pos.checked_add(data.len()) {
            Some(end) if end <= self.0.len() => {
                self.0[pos..end].copy_from_slice(data);
                data.len()
            }
            _ => 0,
        }
    }

    /// Zero the whole buffer, keeping its capacity
    pub fn zero(&mut self) {
        self.0.fill(0);
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buffer = Buffer::with_capacity(64).unwrap();
        assert_eq!(buffer.capacity(), 64);
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_then_read() {
        let mut buffer = Buffer::with_capacity(32).unwrap();
        assert_eq!(buffer.write_at(4, b"test data"), 9);

        let mut out = [0u8; 9];
        assert_eq!(buffer.read_at(4, &mut out), 9);
        assert_eq!(&out, b"test data");
    }

    #[test]
    fn test_write_past_end_is_rejected() {
        let mut buffer = Buffer::with_capacity(8).unwrap();
        assert_eq!(buffer.write_at(5, b"abcd"), 0);
        assert_eq!(buffer.capacity(), 8);
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_exactly_to_end() {
        let mut buffer = Buffer::with_capacity(8).unwrap();
        assert_eq!(buffer.write_at(4, b"abcd"), 4);
        assert_eq!(&buffer[4..], b"abcd");
    }

    #[test]
    fn test_read_is_clamped() {
        let mut buffer = Buffer::with_capacity(8).unwrap();
        buffer.write_at(6, b"xy");

        let mut out = [0xffu8; 16];
        assert_eq!(buffer.read_at(6, &mut out), 2);
        assert_eq!(&out[..2], b"xy");
        assert_eq!(out[2], 0xff);

        assert_eq!(buffer.read_at(8, &mut out), 0);
        assert_eq!(buffer.read_at(100, &mut out), 0);
    }

    #[test]
    fn test_grow_doubles_and_keeps_prefix() {
        let mut buffer = Buffer::with_capacity(4).unwrap();
        buffer.write_at(0, b"abcd");

        buffer.grow_to(10).unwrap();
        assert_eq!(buffer.capacity(), 20);
        assert_eq!(&buffer[..4], b"abcd");
        assert!(buffer[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_grow_overflow_leaves_buffer() {
        let mut buffer = Buffer::with_capacity(4).unwrap();
        buffer.write_at(0, b"keep");

        let result = buffer.grow_to(usize::MAX);
        assert!(matches!(result, Err(UnitError::Allocation { .. })));
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(&buffer[..], b"keep");
    }

    #[test]
    fn test_zero_keeps_capacity() {
        let mut buffer = Buffer::with_capacity(8).unwrap();
        buffer.write_at(0, b"dirty");
        buffer.zero();
        assert_eq!(buffer.capacity(), 8);
        assert!(buffer.iter().all(|&b| b == 0));
    }
}
