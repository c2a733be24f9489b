//! # Binary Cursor
//!
//! The low-level read/write cursor used by every canonical encoding in the
//! protocol. All multi-byte integers are little-endian and fixed-width —
//! there is no varint encoding anywhere, because canonical bytes must have
//! exactly one valid representation.
//!
//! [`ByteWriter`] appends fields into a growable buffer. [`ByteReader`]
//! walks a borrowed slice and tracks its offset, so callers can report how
//! many bytes a decode actually consumed. Reads never panic: running off the
//! end of the buffer is an ordinary [`CodecError`] for the caller to handle.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced by the byte cursor while decoding.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer ended before the requested number of bytes could be read.
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A declared element count would run past the end of the buffer.
    #[error(
        "declared count {declared} (at {element_size} bytes each) exceeds {remaining} remaining bytes"
    )]
    LengthOverflow {
        /// The count the length prefix declared.
        declared: usize,
        /// Minimum encoded size of one element.
        element_size: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A forward-only cursor over a borrowed byte slice.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Reads the next `n` bytes as a borrowed slice.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    /// Reads a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Validates a declared element count against the remaining buffer.
    ///
    /// Call this immediately after reading a length prefix and before
    /// allocating for or iterating over `count` elements of at least
    /// `element_size` encoded bytes each.
    pub fn expect_elements(&self, count: usize, element_size: usize) -> Result<(), CodecError> {
        let total = count.checked_mul(element_size);
        match total {
            Some(total) if total <= self.remaining() => Ok(()),
            _ => Err(CodecError::LengthOverflow {
                declared: count,
                element_size,
                remaining: self.remaining(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// An append-only buffer for building canonical encodings.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates an empty writer with `capacity` bytes pre-allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Appends a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Appends a little-endian `u64`.
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the finished buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_roundtrip_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0x0102);
        writer.write_u32(0x03040506);
        writer.write_u64(0x0708090a0b0c0d0e);
        let bytes = writer.into_bytes();

        // Little-endian: least significant byte first.
        assert_eq!(&bytes[..2], &[0x02, 0x01]);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_u32().unwrap(), 0x03040506);
        assert_eq!(reader.read_u64().unwrap(), 0x0708090a0b0c0d0e);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn offset_tracks_consumed_bytes() {
        let bytes = [0u8; 16];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.offset(), 0);
        reader.read_u32().unwrap();
        assert_eq!(reader.offset(), 4);
        reader.read_bytes(5).unwrap();
        assert_eq!(reader.offset(), 9);
        assert_eq!(reader.remaining(), 7);
    }

    #[test]
    fn read_past_end_reports_eof() {
        let bytes = [1u8, 2, 3];
        let mut reader = ByteReader::new(&bytes);
        reader.read_u16().unwrap();
        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            CodecError::UnexpectedEof {
                needed: 4,
                remaining: 1,
            }
        );
        // A failed read consumes nothing.
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn read_array_returns_fixed_size() {
        let bytes = [7u8; 40];
        let mut reader = ByteReader::new(&bytes);
        let arr: [u8; 32] = reader.read_array().unwrap();
        assert_eq!(arr, [7u8; 32]);
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn expect_elements_accepts_exact_fit() {
        let bytes = [0u8; 12];
        let reader = ByteReader::new(&bytes);
        assert!(reader.expect_elements(3, 4).is_ok());
        assert!(reader.expect_elements(0, 4).is_ok());
    }

    #[test]
    fn expect_elements_rejects_oversized_count() {
        let bytes = [0u8; 12];
        let reader = ByteReader::new(&bytes);
        let err = reader.expect_elements(4, 4).unwrap_err();
        assert_eq!(
            err,
            CodecError::LengthOverflow {
                declared: 4,
                element_size: 4,
                remaining: 12,
            }
        );
    }

    #[test]
    fn expect_elements_rejects_multiplication_overflow() {
        let bytes = [0u8; 8];
        let reader = ByteReader::new(&bytes);
        assert!(reader.expect_elements(usize::MAX, 34).is_err());
    }

    #[test]
    fn writer_capacity_and_emptiness() {
        let mut writer = ByteWriter::with_capacity(64);
        assert!(writer.is_empty());
        writer.write_bytes(&[1, 2, 3]);
        assert_eq!(writer.len(), 3);
        assert_eq!(writer.into_bytes(), vec![1, 2, 3]);
    }
}
