//! Encoder counterpart of [`ByteBuffer`](super::ByteBuffer).

use super::reader::{STRING_ABSENT, STRING_PRESENT};

/// Appends little-endian primitives and osu!-style strings to a byte vector.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    data: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.data.push(u8::from(value));
    }

    pub fn write_i16(&mut self, value: i16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Writes a collection length as a signed 32-bit count, saturating at `i32::MAX`.
    pub fn write_count(&mut self, count: usize) {
        self.write_i32(i32::try_from(count).unwrap_or(i32::MAX));
    }

    pub fn write_uleb128(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.data.push(byte);
                return;
            }
            self.data.push(byte | 0x80);
        }
    }

    /// Writes a string; the empty string is encoded as absent (`0x00`).
    pub fn write_string(&mut self, value: &str) {
        self.write_optional_string(Some(value).filter(|v| !v.is_empty()));
    }

    /// Writes `None` as `0x00` and any `Some`, even `""`, with the present marker.
    pub fn write_optional_string(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            self.data.push(STRING_ABSENT);
            return;
        };
        self.data.push(STRING_PRESENT);
        self.write_uleb128(value.len() as u64);
        self.data.extend_from_slice(value.as_bytes());
    }
}
