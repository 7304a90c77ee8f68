//! Decoding of finished drawing and highlight buffers

use crate::command::Command;
use crate::error::{Error, Result};
use crate::format::Serializable;
use crate::highlight::HighlightRecord;
use crate::reader::BufferReader;

/// Reads a drawing buffer back into commands
pub struct Decoder<'a> {
    reader: BufferReader<'a>,
}

impl<'a> Decoder<'a> {
    /// Decode the drawing buffer `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BufferReader::new(data),
        }
    }

    /// Decode every record up to and including the close record. A buffer
    /// without a close record belongs to a drawing that is still open and is
    /// decoded up to its end.
    pub fn decode(mut self) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        let mut depth = 0usize;

        while !self.reader.is_at_end() {
            let command = Command::deserialize(&mut self.reader)?;

            if command.is_push() {
                depth += 1;
            } else if command == Command::Pop {
                depth = depth.checked_sub(1).ok_or(Error::StackUnderflow)?;
            }

            let closed = command == Command::Close;
            commands.push(command);

            if closed {
                if !self.reader.is_at_end() {
                    return Err(Error::TrailingData(self.reader.remaining()));
                }
                break;
            }
        }

        tracing::trace!(count = commands.len(), depth, "decoded drawing");

        Ok(commands)
    }

    /// Decode the drawing and highlight blobs written by
    /// [`Drawing::serialize_with_highlights`]
    ///
    /// [`Drawing::serialize_with_highlights`]: crate::drawing::Drawing::serialize_with_highlights
    pub fn decode_container(data: &[u8]) -> Result<(Vec<Command>, Vec<HighlightRecord>)> {
        let mut reader = BufferReader::new(data);

        let drawing = reader.read_binary()?;
        let highlights = reader.read_binary()?;
        if !reader.is_at_end() {
            return Err(Error::TrailingData(reader.remaining()));
        }

        Ok((
            Decoder::new(drawing).decode()?,
            Decoder::decode_highlights(highlights)?,
        ))
    }

    /// Decode the records of a highlight buffer
    pub fn decode_highlights(data: &[u8]) -> Result<Vec<HighlightRecord>> {
        let mut reader = BufferReader::new(data);

        let mut records = Vec::new();
        while !reader.is_at_end() {
            records.push(HighlightRecord::deserialize(&mut reader)?);
        }

        Ok(records)
    }
}
