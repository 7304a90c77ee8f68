//! Append-only buffer that the drawing protocol is serialized into

use byteorder::{ByteOrder, LittleEndian};
use uuid::Uuid;

use crate::error::{Error, Result};

const DEFAULT_CAPACITY: usize = 1024;

/// A reserved 4-byte length field, filled in by [`BufferWriter::write_size_at`]
/// once the payload that follows it has been written
#[must_use = "a reserved size slot must be patched with write_size_at"]
#[derive(Debug, PartialEq, Eq)]
pub struct SizeSlot {
    index: usize,
}

impl SizeSlot {
    /// Offset of the placeholder in the buffer
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Growable little-endian byte buffer with typed write primitives
#[derive(Debug, Clone, PartialEq)]
pub struct BufferWriter {
    data: Vec<u8>,
}

impl Default for BufferWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferWriter {
    /// Create a writer with the default initial capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a writer that can hold `capacity` bytes before it grows
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Write a boolean as a single `0` or `1` byte
    pub fn write_bool(&mut self, value: bool) {
        self.write_byte(value as u8);
    }

    /// Write a single byte
    pub fn write_byte(&mut self, value: u8) {
        self.reserve(1);
        self.data.push(value);
    }

    /// Write a little-endian `u16`
    pub fn write_uint16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.put(&bytes);
    }

    /// Write a little-endian `u32`
    pub fn write_uint32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.put(&bytes);
    }

    /// Write a little-endian IEEE 754 double
    pub fn write_double(&mut self, value: f64) {
        let mut bytes = [0u8; 8];
        LittleEndian::write_f64(&mut bytes, value);
        self.put(&bytes);
    }

    /// Write a collection length as a 4-byte prefix
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| Error::LengthOverflow(count))?;
        self.write_uint32(count);

        Ok(())
    }

    /// Write the UTF-8 bytes of `value`, prefixed by their length
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_sized_binary(value.as_bytes(), None)
    }

    /// Write a length prefix followed by the first `length` bytes of `data`
    /// (all of it when `length` is `None` or larger than the buffer)
    pub fn write_sized_binary(&mut self, data: &[u8], length: Option<usize>) -> Result<()> {
        let data = truncate(data, length);

        self.write_count(data.len())?;
        self.put(data);

        Ok(())
    }

    /// Write the first `length` bytes of `data` without a length prefix
    pub fn write_raw_binary(&mut self, data: &[u8], length: Option<usize>) {
        self.put(truncate(data, length));
    }

    /// Write a GUID in the mixed-endian layout: the first three fields are
    /// little-endian, the last eight bytes are copied as-is
    pub fn write_guid(&mut self, guid: &Uuid) {
        self.put(&guid.to_bytes_le());
    }

    /// Write a 4-byte placeholder and return a handle to patch it later
    pub fn reserve_size(&mut self) -> SizeSlot {
        let index = self.data.len();
        self.write_uint32(0);

        SizeSlot { index }
    }

    /// Fill `slot` with the number of bytes written after it
    pub fn write_size_at(&mut self, slot: SizeSlot) -> Result<()> {
        let size = self.data.len() - slot.index - 4;
        let size = u32::try_from(size).map_err(|_| Error::LengthOverflow(size))?;

        LittleEndian::write_u32(&mut self.data[slot.index..slot.index + 4], size);

        Ok(())
    }

    /// Bytes written so far
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the written bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Current write position, which is also the number of bytes written
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing was written yet
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated size of the underlying buffer
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    fn put(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.data.extend_from_slice(bytes);
    }

    // Grow to twice the current capacity, or to exactly what is needed when
    // doubling is not enough.
    fn reserve(&mut self, count: usize) {
        let needed = self.data.len() + count;
        let capacity = self.data.capacity();

        if needed > capacity {
            let target = needed.max(capacity * 2);
            self.data.reserve_exact(target - self.data.len());
        }
    }
}

fn truncate(data: &[u8], length: Option<usize>) -> &[u8] {
    match length {
        Some(length) if length < data.len() => &data[..length],
        _ => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_values_are_little_endian() {
        let mut writer = BufferWriter::new();
        writer.write_bool(true);
        writer.write_byte(0xAB);
        writer.write_uint32(0x0102_0304);
        writer.write_double(1.0);

        assert_eq!(
            writer.data(),
            &[
                0x01, 0xAB, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0,
                0x3F
            ]
        );
    }

    #[test]
    fn string_is_prefixed_with_utf8_length() {
        let mut writer = BufferWriter::new();
        writer.write_string("µm").unwrap();

        assert_eq!(&writer.data()[..4], &[3, 0, 0, 0]);
        assert_eq!(&writer.data()[4..], "µm".as_bytes());
    }

    #[test]
    fn sized_binary_honors_shorter_length() {
        let mut writer = BufferWriter::new();
        writer.write_sized_binary(&[1, 2, 3, 4], Some(2)).unwrap();
        writer.write_sized_binary(&[5, 6], Some(10)).unwrap();

        assert_eq!(writer.data(), &[2, 0, 0, 0, 1, 2, 2, 0, 0, 0, 5, 6]);
    }

    #[test]
    fn raw_binary_has_no_prefix() {
        let mut writer = BufferWriter::new();
        writer.write_raw_binary(&[9, 8, 7], Some(2));

        assert_eq!(writer.data(), &[9, 8]);
    }

    #[test]
    fn size_slot_is_patched_with_payload_length() {
        let mut writer = BufferWriter::new();
        writer.write_byte(0xFF);

        let slot = writer.reserve_size();
        assert_eq!(slot.index(), 1);

        writer.write_double(2.5);
        writer.write_string("abc").unwrap();
        writer.write_size_at(slot).unwrap();

        assert_eq!(LittleEndian::read_u32(&writer.data()[1..5]), 8 + 4 + 3);
    }

    #[test]
    fn grows_by_doubling() {
        let mut writer = BufferWriter::with_capacity(4);
        writer.write_uint32(1);
        writer.write_byte(1);
        assert!(writer.capacity() >= 8);

        writer.write_raw_binary(&[0u8; 100], None);
        assert!(writer.capacity() >= 105);
        assert_eq!(writer.len(), 105);
    }
}
