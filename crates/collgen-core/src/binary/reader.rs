//! Position-tracking reader for the client's little-endian database files.
//!
//! Every database the client writes (`scores.db`, `collection.db`, `osu!.db`)
//! is a flat sequence of little-endian primitives and length-prefixed strings.
//! `ByteBuffer` reads them sequentially and reports the failing position on
//! truncation so a corrupt file points at the byte that broke it.

use crate::error::{Error, Result};

/// Marker byte for an absent string.
pub const STRING_ABSENT: u8 = 0x00;

/// Marker byte for a present, ULEB128-length-prefixed UTF-8 string.
pub const STRING_PRESENT: u8 = 0x0b;

/// A position-tracking byte reader over a borrowed slice.
///
/// # Example
///
/// ```
/// use collgen_core::binary::ByteBuffer;
///
/// let data = [0x0b, 0x03, b'a', b'b', b'c', 0x2a, 0x00];
/// let mut buf = ByteBuffer::new(&data);
///
/// assert_eq!(buf.read_string().unwrap(), "abc");
/// assert_eq!(buf.read_i16().unwrap(), 42);
/// assert_eq!(buf.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_array::<1>().map(|[byte]| byte)
    }

    /// Reads a one-byte boolean; any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    /// Reads a signed 32-bit count and rejects negative values.
    pub fn read_count(&mut self) -> Result<usize> {
        let start = self.pos;
        let count = self.read_i32()?;
        usize::try_from(count)
            .map_err(|_| Error::decode(start, format!("Negative element count {}", count)))
    }

    /// Borrows the next `count` bytes. The cursor does not move on failure.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(count)
            .ok_or_else(|| Error::decode(self.pos, "Position overflow"))?;

        let Some(bytes) = self.data.get(self.pos..end) else {
            return Err(Error::decode(
                self.pos,
                format!(
                    "Read of {} bytes exceeds buffer length {}",
                    count,
                    self.data.len()
                ),
            ));
        };
        self.pos = end;
        Ok(bytes)
    }

    /// Reads an unsigned LEB128 integer.
    pub fn read_uleb128(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift >= 64 {
                return Err(Error::decode(start, "ULEB128 value overflows 64 bits"));
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Reads a string and collapses an absent one to `""`.
    pub fn read_string(&mut self) -> Result<String> {
        self.read_optional_string().map(Option::unwrap_or_default)
    }

    /// Reads an optional string: `0x00` for absent, `0x0b` + ULEB128 length + UTF-8.
    ///
    /// A present empty string (`0x0b 0x00`) decodes to `Some("")`.
    pub fn read_optional_string(&mut self) -> Result<Option<String>> {
        let marker_pos = self.pos;
        match self.read_u8()? {
            STRING_ABSENT => Ok(None),
            STRING_PRESENT => {
                let len_pos = self.pos;
                let len = usize::try_from(self.read_uleb128()?)
                    .map_err(|_| Error::decode(len_pos, "String length exceeds address space"))?;
                let bytes = self.read_bytes(len)?;
                String::from_utf8(bytes.to_vec()).map(Some).map_err(|e| {
                    Error::decode(len_pos, format!("String is not valid UTF-8: {}", e))
                })
            }
            marker => Err(Error::InvalidStringMarker {
                marker,
                position: marker_pos,
            }),
        }
    }
}
