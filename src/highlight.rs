//! Interactive regions placed on top of a drawing. The host highlights them
//! under the mouse and shows their tooltip.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::format::Serializable;
use crate::geometry::{Geometry, GeometryDrawingSettings};
use crate::ids::TooltipLineKind;
use crate::material::{deserialize_brush, serialize_brush, Brush};
use crate::reader::BufferReader;
use crate::writer::BufferWriter;

/// One line of a tooltip
#[derive(Debug, PartialEq, Clone)]
pub struct TooltipLine {
    pub kind: TooltipLineKind,
    pub text: String,
    /// Groups collapsable lines; empty for other kinds
    pub class_name: String,
}

/// Ordered tooltip lines
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Tooltip {
    pub lines: Vec<TooltipLine>,
}

impl Tooltip {
    /// An empty text line
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text of the line
    pub fn text(self, text: impl Into<String>) -> Self {
        self.line(TooltipLineKind::Text, text.into(), String::new())
    }

    /// A line the host folds together with other lines of `class_name`
    pub fn collapsable(self, class_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.line(TooltipLineKind::Collapsable, text.into(), class_name.into())
    }

    /// Shown only when no other tooltip line applies
    pub fn fallback(self, text: impl Into<String>) -> Self {
        self.line(TooltipLineKind::Fallback, text.into(), String::new())
    }

    fn line(mut self, kind: TooltipLineKind, text: String, class_name: String) -> Self {
        self.lines.push(TooltipLine {
            kind,
            text,
            class_name,
        });
        self
    }
}

impl Serializable for Tooltip {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_count(self.lines.len())?;

        for line in &self.lines {
            target.write_byte(line.kind.into());
            target.write_string(&line.text)?;
            target.write_string(&line.class_name)?;
        }

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let count = source.read_count()?;

        let mut lines = Vec::with_capacity(count.min(source.remaining()));
        for _ in 0..count {
            lines.push(TooltipLine {
                kind: TooltipLineKind::try_from(source.read_byte()?)?,
                text: source.read_string()?.to_owned(),
                class_name: source.read_string()?.to_owned(),
            });
        }

        Ok(Self { lines })
    }
}

/// Back reference to the measured value a highlight belongs to
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MeasurementValueRef {
    pub measurement: Uuid,
    pub characteristic: Uuid,
}

impl Serializable for MeasurementValueRef {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_guid(&self.measurement);
        target.write_guid(&self.characteristic);

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            measurement: source.read_guid()?,
            characteristic: source.read_guid()?,
        })
    }
}

/// An interactive region of a drawing
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Highlight {
    /// Hit area; without one the host uses the bounds of the drawing
    pub geometry: Option<Geometry>,
    pub tooltip: Option<Tooltip>,
    pub measurement_value: Option<MeasurementValueRef>,
    pub active_border_brush: Option<Brush>,
    pub active_background_brush: Option<Brush>,
}

impl Highlight {
    /// A highlight covering `geometry` without tooltip or measurement value
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Default::default()
        }
    }

    /// Show `tooltip` when the region is hovered
    pub fn with_tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Link the highlight to the measured value of `characteristic` in `measurement`
    pub fn with_measurement_value(mut self, measurement: Uuid, characteristic: Uuid) -> Self {
        self.measurement_value = Some(MeasurementValueRef {
            measurement,
            characteristic,
        });
        self
    }
}

/// A highlight as stored in the highlight buffer
#[derive(Debug, PartialEq, Clone)]
pub struct HighlightRecord {
    /// Length of the drawing buffer when the highlight was placed
    pub offset: u32,
    pub settings: GeometryDrawingSettings,
    pub highlight: Highlight,
}

impl Serializable for HighlightRecord {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        let slot = target.reserve_size();

        target.write_uint32(self.offset);
        self.settings.serialize(target)?;
        self.highlight.geometry.serialize(target)?;
        self.highlight.tooltip.serialize(target)?;
        self.highlight.measurement_value.serialize(target)?;
        serialize_brush(self.highlight.active_border_brush.as_ref(), target)?;
        serialize_brush(self.highlight.active_background_brush.as_ref(), target)?;

        target.write_size_at(slot)
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let mut record = BufferReader::new(source.read_binary()?);

        let result = Self {
            offset: record.read_uint32()?,
            settings: GeometryDrawingSettings::deserialize(&mut record)?,
            highlight: Highlight {
                geometry: Option::deserialize(&mut record)?,
                tooltip: Option::deserialize(&mut record)?,
                measurement_value: Option::deserialize(&mut record)?,
                active_border_brush: deserialize_brush(&mut record)?,
                active_background_brush: deserialize_brush(&mut record)?,
            },
        };

        if !record.is_at_end() {
            return Err(Error::TrailingData(record.remaining()));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Color, Point};

    #[test]
    fn tooltip_lines_keep_their_order() {
        let tooltip = Tooltip::new()
            .text("Merkmal A")
            .collapsable("values", "1.25 mm")
            .fallback("keine Daten");

        let kinds: Vec<_> = tooltip.lines.iter().map(|line| line.kind).collect();
        assert_eq!(
            kinds,
            [
                TooltipLineKind::Text,
                TooltipLineKind::Collapsable,
                TooltipLineKind::Fallback
            ]
        );
        assert_eq!(tooltip.lines[1].class_name, "values");
    }

    #[test]
    fn record_is_length_framed() {
        let record = HighlightRecord {
            offset: 42,
            settings: GeometryDrawingSettings::at(Point::new(1.0, 1.0)),
            highlight: Highlight::default(),
        };

        let mut writer = BufferWriter::new();
        record.serialize(&mut writer).unwrap();

        // offset, settings, three absent flags, two empty brush slots
        let payload = 4 + 18 + 3 + 2;
        assert_eq!(writer.len(), 4 + payload);
        assert_eq!(&writer.data()[..4], &(payload as u32).to_le_bytes());
        assert_eq!(&writer.data()[4..8], &42u32.to_le_bytes());
    }

    #[test]
    fn full_record_decodes() {
        let measurement = Uuid::parse_str("6d1d7d36-4f0e-4d5f-a2c4-6f4a0a1b2c3d").unwrap();
        let characteristic = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();

        let highlight = Highlight::new(Geometry::rectangle(0.0, 0.0, 10.0, 5.0))
            .with_tooltip(Tooltip::new().text("Durchmesser"))
            .with_measurement_value(measurement, characteristic);
        let highlight = Highlight {
            active_border_brush: Some(Brush::solid(Color::rgb8(255, 0, 0))),
            ..highlight
        };

        let record = HighlightRecord {
            offset: 0,
            settings: GeometryDrawingSettings::default(),
            highlight,
        };

        let mut writer = BufferWriter::new();
        record.serialize(&mut writer).unwrap();

        let mut reader = BufferReader::new(writer.data());
        assert_eq!(HighlightRecord::deserialize(&mut reader).unwrap(), record);
        assert!(reader.is_at_end());
    }
}
