//! Bounds-checked cursor over a received drawing buffer

use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};

/// .NET ticks between 0001-01-01 and the Unix epoch
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// How deep groups, combined geometries and embedded drawings may nest
/// before decoding gives up
pub const MAX_NESTING_DEPTH: usize = 64;

/// Sequential reader mirroring [`BufferWriter`](crate::writer::BufferWriter)
#[derive(Debug, Clone)]
pub struct BufferReader<'a> {
    data: &'a [u8],
    position: usize,
    depth: usize,
}

impl<'a> BufferReader<'a> {
    /// Start reading at the beginning of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            depth: 0,
        }
    }

    /// A reader over a blob taken from this buffer, at the same nesting depth
    pub fn sub_reader<'b>(&self, data: &'b [u8]) -> BufferReader<'b> {
        BufferReader {
            data,
            position: 0,
            depth: self.depth,
        }
    }

    /// Run `read` one nesting level deeper. Fails with
    /// [`Error::NestingTooDeep`] instead of recursing past
    /// [`MAX_NESTING_DEPTH`].
    pub fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep(MAX_NESTING_DEPTH));
        }

        self.depth += 1;
        let result = read(self);
        self.depth -= 1;

        result
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether every byte was consumed
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `count` bytes
    pub fn read_raw(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(Error::UnexpectedEnd {
                needed: count,
                remaining: self.remaining(),
            });
        }

        let bytes = &self.data[self.position..self.position + count];
        self.position += count;

        Ok(bytes)
    }

    /// Any non-zero byte is `true`
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_byte()? != 0)
    }

    /// Read a single byte
    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_raw(1)?[0])
    }

    /// Read a little-endian `u16`
    pub fn read_uint16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_raw(2)?))
    }

    /// Read a little-endian `i16`
    pub fn read_int16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_raw(2)?))
    }

    /// Read a little-endian `i32`
    pub fn read_int32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_raw(4)?))
    }

    /// Read a little-endian `u32`
    pub fn read_uint32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_raw(4)?))
    }

    /// Read a little-endian IEEE 754 double
    pub fn read_double(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_raw(8)?))
    }

    /// Read a 4-byte count and widen it to `usize`
    pub fn read_count(&mut self) -> Result<usize> {
        Ok(self.read_uint32()? as usize)
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<&'a str> {
        let bytes = self.read_binary()?;

        Ok(std::str::from_utf8(bytes)?)
    }

    /// Read a length-prefixed blob. The result borrows from the buffer.
    pub fn read_binary(&mut self) -> Result<&'a [u8]> {
        let length = self.read_count()?;

        self.read_raw(length)
    }

    /// Read 16 bytes in the mixed-endian GUID layout
    pub fn read_guid(&mut self) -> Result<Uuid> {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(self.read_raw(16)?);

        Ok(Uuid::from_bytes_le(bytes))
    }

    /// Read a date stored as milliseconds since the Unix epoch
    pub fn read_date(&mut self) -> Result<DateTime<Utc>> {
        let millis = self.read_double()?;

        if !millis.is_finite() {
            return Err(Error::InvalidValue(format!("date {}", millis)));
        }

        Utc.timestamp_millis_opt(millis.trunc() as i64)
            .single()
            .ok_or_else(|| Error::InvalidValue(format!("date {}", millis)))
    }

    /// Read a time stamp stored as 100 ns ticks since 0001-01-01
    pub fn read_time_stamp(&mut self) -> Result<DateTime<Utc>> {
        let ticks = LittleEndian::read_i64(self.read_raw(8)?);
        let since_epoch = ticks
            .checked_sub(UNIX_EPOCH_TICKS)
            .ok_or_else(|| Error::InvalidValue(format!("time stamp {}", ticks)))?;

        let seconds = since_epoch.div_euclid(TICKS_PER_SECOND);
        let nanos = since_epoch.rem_euclid(TICKS_PER_SECOND) * 100;

        Utc.timestamp_opt(seconds, nanos as u32)
            .single()
            .ok_or_else(|| Error::InvalidValue(format!("time stamp {}", ticks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BufferWriter;

    #[test]
    fn reads_what_the_writer_wrote() {
        let mut writer = BufferWriter::new();
        writer.write_bool(true);
        writer.write_byte(7);
        writer.write_uint16(950);
        writer.write_uint32(123_456);
        writer.write_double(-0.25);
        writer.write_string("Messwert µm").unwrap();
        writer.write_sized_binary(&[1, 2, 3], None).unwrap();

        let mut reader = BufferReader::new(writer.data());
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_byte().unwrap(), 7);
        assert_eq!(reader.read_uint16().unwrap(), 950);
        assert_eq!(reader.read_uint32().unwrap(), 123_456);
        assert_eq!(reader.read_double().unwrap(), -0.25);
        assert_eq!(reader.read_string().unwrap(), "Messwert µm");
        assert_eq!(reader.read_binary().unwrap(), &[1, 2, 3]);
        assert!(reader.is_at_end());
    }

    #[test]
    fn signed_reads() {
        let bytes = [0xFE, 0xFF, 0xFD, 0xFF, 0xFF, 0xFF];
        let mut reader = BufferReader::new(&bytes);

        assert_eq!(reader.read_int16().unwrap(), -2);
        assert_eq!(reader.read_int32().unwrap(), -3);
    }

    #[test]
    fn reading_past_the_end_fails() {
        let bytes = [1, 2, 3];
        let mut reader = BufferReader::new(&bytes);

        match reader.read_uint32() {
            Err(Error::UnexpectedEnd { needed, remaining }) => {
                assert_eq!(needed, 4);
                assert_eq!(remaining, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }

        // the failed read does not move the cursor
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn string_length_beyond_buffer_fails() {
        let bytes = [10, 0, 0, 0, b'a'];
        let mut reader = BufferReader::new(&bytes);

        assert!(matches!(
            reader.read_string(),
            Err(Error::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let bytes = [2, 0, 0, 0, 0xC3, 0x28];
        let mut reader = BufferReader::new(&bytes);

        assert!(matches!(reader.read_string(), Err(Error::InvalidUtf8(_))));
    }

    #[test]
    fn guid_uses_mixed_endian_layout() {
        let bytes = [
            0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ];
        let mut reader = BufferReader::new(&bytes);

        let guid = reader.read_guid().unwrap();
        assert_eq!(guid.to_string(), "00112233-4455-6677-8899-aabbccddeeff");

        let mut writer = BufferWriter::new();
        writer.write_guid(&guid);
        assert_eq!(writer.data(), &bytes);
    }

    #[test]
    fn date_is_unix_milliseconds() {
        let mut writer = BufferWriter::new();
        writer.write_double(86_400_000.0);

        let date = BufferReader::new(writer.data()).read_date().unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn time_stamp_is_dotnet_ticks() {
        let ticks: i64 = UNIX_EPOCH_TICKS + 15 * TICKS_PER_SECOND + 5;
        let mut writer = BufferWriter::new();
        writer.write_raw_binary(&ticks.to_le_bytes(), None);

        let stamp = BufferReader::new(writer.data()).read_time_stamp().unwrap();
        assert_eq!(stamp.timestamp(), 15);
        assert_eq!(stamp.timestamp_subsec_nanos(), 500);
    }

    #[test]
    fn extreme_time_stamps_are_rejected() {
        let bytes = i64::MIN.to_le_bytes();

        assert!(matches!(
            BufferReader::new(&bytes).read_time_stamp(),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn nesting_is_limited() {
        fn descend(reader: &mut BufferReader<'_>) -> Result<usize> {
            reader.nested(|reader| match descend(reader) {
                Err(Error::NestingTooDeep(_)) => Ok(reader.depth),
                other => other,
            })
        }

        let mut reader = BufferReader::new(&[]);
        assert_eq!(descend(&mut reader).unwrap(), MAX_NESTING_DEPTH);
        assert_eq!(reader.depth, 0);

        let sub = reader.sub_reader(&[1, 2]);
        assert_eq!(sub.remaining(), 2);
    }
}
