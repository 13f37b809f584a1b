//! Cursor-based byte buffer
//!
//! `ByteBuffer` is the only medium of exchange between the AMF codec and the
//! code embedding it. Writes always append to the end; reads consume from a
//! cursor that starts at zero. Multi-byte fields are big-endian on the wire.
//!
//! Reads are unchecked: callers must confirm [`ByteBuffer::require`] before
//! every read. Reading past the end is a contract violation and panics, the
//! same way `bytes::Buf` does.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::BufferError;

/// Growable octet sequence with a read cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: BytesMut,
    pos: usize,
}

impl ByteBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with preallocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            pos: 0,
        }
    }

    pub fn write_1byte(&mut self, val: u8) {
        self.data.put_u8(val);
    }

    pub fn write_2bytes(&mut self, val: u16) {
        self.data.put_u16(val);
    }

    /// Write the low 24 bits of `val`
    pub fn write_3bytes(&mut self, val: u32) {
        self.data.put_uint(u64::from(val & 0x00FF_FFFF), 3);
    }

    pub fn write_4bytes(&mut self, val: u32) {
        self.data.put_u32(val);
    }

    pub fn write_8bytes(&mut self, val: u64) {
        self.data.put_u64(val);
    }

    /// Write an IEEE-754 double in big-endian order
    pub fn write_f64(&mut self, val: f64) {
        self.data.put_f64(val);
    }

    /// Append the raw bytes of `s` (no length prefix)
    pub fn write_string(&mut self, s: &str) {
        self.data.put_slice(s.as_bytes());
    }

    /// Append arbitrary raw bytes
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.put_slice(bytes);
    }

    pub fn read_1byte(&mut self) -> u8 {
        let v = self.unread().get_u8();
        self.pos += 1;
        v
    }

    pub fn read_2bytes(&mut self) -> u16 {
        let v = self.unread().get_u16();
        self.pos += 2;
        v
    }

    pub fn read_3bytes(&mut self) -> u32 {
        let v = self.unread().get_uint(3) as u32;
        self.pos += 3;
        v
    }

    pub fn read_4bytes(&mut self) -> u32 {
        let v = self.unread().get_u32();
        self.pos += 4;
        v
    }

    pub fn read_8bytes(&mut self) -> u64 {
        let v = self.unread().get_u64();
        self.pos += 8;
        v
    }

    pub fn read_f64(&mut self) -> f64 {
        let v = self.unread().get_f64();
        self.pos += 8;
        v
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Bytes {
        let bytes = self.unread().copy_to_bytes(len);
        self.pos += len;
        bytes
    }

    /// Read `len` bytes as UTF-8 text
    ///
    /// The cursor advances by `len` even when the bytes are not valid UTF-8.
    pub fn read_string(&mut self, len: usize) -> Result<String, BufferError> {
        let bytes = self.read_bytes(len);
        String::from_utf8(bytes.to_vec()).map_err(|_| BufferError::InvalidUtf8)
    }

    /// Whether at least `n` unread bytes remain
    pub fn require(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Move the cursor by `n` bytes; negative values rewind
    ///
    /// # Panics
    ///
    /// Panics if the cursor would leave `0..=size()`.
    pub fn skip(&mut self, n: isize) {
        let pos = self
            .pos
            .checked_add_signed(n)
            .filter(|&p| p <= self.data.len());
        match pos {
            Some(p) => self.pos = p,
            None => panic!(
                "skip({}) moves cursor out of bounds (pos {}, size {})",
                n,
                self.pos,
                self.data.len()
            ),
        }
    }

    /// True when the cursor has reached the end
    pub fn empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Total number of bytes written
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Current cursor position
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Drop all content and reset the cursor
    pub fn clear(&mut self) {
        self.data.clear();
        self.pos = 0;
    }

    /// Overwrite previously written bytes starting at `pos`
    pub fn set_data(&mut self, pos: usize, data: &[u8]) -> Result<(), BufferError> {
        let end = pos
            .checked_add(data.len())
            .filter(|&end| end <= self.data.len())
            .ok_or(BufferError::OutOfRange {
                pos,
                len: data.len(),
                size: self.data.len(),
            })?;
        self.data[pos..end].copy_from_slice(data);
        Ok(())
    }

    /// All written bytes, independent of the cursor
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes from the cursor to the end
    pub fn unread(&self) -> &[u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Convert the written content into immutable `Bytes`
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(data: &[u8]) -> Self {
        Self {
            data: BytesMut::from(data),
            pos: 0,
        }
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from(data.as_slice())
    }
}

impl From<Bytes> for ByteBuffer {
    fn from(data: Bytes) -> Self {
        Self::from(data.as_ref())
    }
}

impl From<BytesMut> for ByteBuffer {
    fn from(data: BytesMut) -> Self {
        Self { data, pos: 0 }
    }
}

/// Lowercase hex of all written bytes, independent of the cursor
impl fmt::LowerHex for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.data.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
