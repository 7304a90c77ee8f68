//! Brushes fill areas, pens stroke outlines

use crate::error::{Error, Result};
use crate::format::{deserialize_list, serialize_list, Color, Point, Serializable};
use crate::ids::{BrushId, LineCap, LineJoin};
use crate::reader::BufferReader;
use crate::writer::BufferWriter;

/// Paint used to fill areas and pens
#[derive(Debug, PartialEq, Clone)]
pub enum Brush {
    SolidColor {
        color: Color,
        opacity: f64,
    },
    /// Gradient from `color` to `color2`, `rotation` in degrees
    LinearGradient {
        color: Color,
        color2: Color,
        rotation: f64,
        opacity: f64,
    },
    /// Gradient from `color` at `center` to `color2` at the edge. The center
    /// is relative to the filled area, `(0.5, 0.5)` being its middle.
    RadialGradient {
        color: Color,
        color2: Color,
        center: Point,
        opacity: f64,
    },
}

impl Default for Brush {
    fn default() -> Self {
        Brush::solid(Color::BLACK)
    }
}

impl Brush {
    /// An opaque solid color brush
    pub fn solid(color: Color) -> Self {
        Brush::SolidColor {
            color,
            opacity: 1.0,
        }
    }

    /// Identifier written in front of the brush
    pub fn id(&self) -> BrushId {
        match self {
            Brush::SolidColor { .. } => BrushId::SolidColor,
            Brush::LinearGradient { .. } => BrushId::LinearGradient,
            Brush::RadialGradient { .. } => BrushId::RadialGradient,
        }
    }

    /// Opacity applied on top of the brush colors
    pub fn opacity(&self) -> f64 {
        match self {
            Brush::SolidColor { opacity, .. }
            | Brush::LinearGradient { opacity, .. }
            | Brush::RadialGradient { opacity, .. } => *opacity,
        }
    }
}

/// Write a brush slot: [`BrushId::None`] when empty
pub(crate) fn serialize_brush(brush: Option<&Brush>, target: &mut BufferWriter) -> Result<()> {
    match brush {
        Some(brush) => brush.serialize(target),
        None => {
            target.write_byte(BrushId::None.into());
            Ok(())
        }
    }
}

pub(crate) fn deserialize_brush(source: &mut BufferReader<'_>) -> Result<Option<Brush>> {
    let brush = match BrushId::try_from(source.read_byte()?)? {
        BrushId::None => return Ok(None),
        BrushId::SolidColor => Brush::SolidColor {
            color: Color::deserialize(source)?,
            opacity: source.read_double()?,
        },
        BrushId::LinearGradient => Brush::LinearGradient {
            color: Color::deserialize(source)?,
            color2: Color::deserialize(source)?,
            rotation: source.read_double()?,
            opacity: source.read_double()?,
        },
        BrushId::RadialGradient => Brush::RadialGradient {
            color: Color::deserialize(source)?,
            color2: Color::deserialize(source)?,
            center: Point::deserialize(source)?,
            opacity: source.read_double()?,
        },
    };

    Ok(Some(brush))
}

impl Serializable for Brush {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_byte(self.id().into());

        match self {
            Brush::SolidColor { color, opacity } => {
                color.serialize(target)?;
                target.write_double(*opacity);
            }
            Brush::LinearGradient {
                color,
                color2,
                rotation,
                opacity,
            } => {
                color.serialize(target)?;
                color2.serialize(target)?;
                target.write_double(*rotation);
                target.write_double(*opacity);
            }
            Brush::RadialGradient {
                color,
                color2,
                center,
                opacity,
            } => {
                color.serialize(target)?;
                color2.serialize(target)?;
                center.serialize(target)?;
                target.write_double(*opacity);
            }
        }

        Ok(())
    }

    /// Fails when the stream holds an empty brush slot
    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        deserialize_brush(source)?.ok_or_else(|| Error::InvalidValue("empty brush".to_owned()))
    }
}

/// Stroke settings. An empty `dash_style` draws a solid line.
#[derive(Debug, PartialEq, Clone)]
pub struct Pen {
    pub brush: Brush,
    pub thickness: f64,
    pub start_cap: LineCap,
    pub end_cap: LineCap,
    pub line_join: LineJoin,
    pub dash_style: Vec<f64>,
    pub dash_offset: f64,
    pub dash_cap: LineCap,
}

impl Default for Pen {
    fn default() -> Self {
        Pen::new(Brush::default(), 1.0)
    }
}

impl Pen {
    /// A solid pen with flat caps and miter joins
    pub fn new(brush: Brush, thickness: f64) -> Self {
        Self {
            brush,
            thickness,
            start_cap: LineCap::default(),
            end_cap: LineCap::default(),
            line_join: LineJoin::default(),
            dash_style: Vec::new(),
            dash_offset: 0.0,
            dash_cap: LineCap::default(),
        }
    }

    /// A solid pen with default caps, join and dashes
    pub fn solid(color: Color, thickness: f64) -> Self {
        Pen::new(Brush::solid(color), thickness)
    }
}

impl Serializable for Pen {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        self.brush.serialize(target)?;
        target.write_double(self.thickness);
        target.write_byte(self.start_cap.into());
        target.write_byte(self.end_cap.into());
        target.write_byte(self.line_join.into());
        serialize_list(&self.dash_style, target)?;
        target.write_double(self.dash_offset);
        target.write_byte(self.dash_cap.into());

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            brush: Brush::deserialize(source)?,
            thickness: source.read_double()?,
            start_cap: LineCap::try_from(source.read_byte()?)?,
            end_cap: LineCap::try_from(source.read_byte()?)?,
            line_join: LineJoin::try_from(source.read_byte()?)?,
            dash_style: deserialize_list(source)?,
            dash_offset: source.read_double()?,
            dash_cap: LineCap::try_from(source.read_byte()?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_brush_layout() {
        let mut writer = BufferWriter::new();
        Brush::SolidColor {
            color: Color::rgba8(1, 2, 3, 4),
            opacity: 0.5,
        }
        .serialize(&mut writer)
        .unwrap();

        assert_eq!(&writer.data()[..5], &[1, 1, 2, 3, 4]);
        assert_eq!(&writer.data()[5..], &0.5f64.to_le_bytes());
    }

    #[test]
    fn empty_brush_slot() {
        let mut writer = BufferWriter::new();
        serialize_brush(None, &mut writer).unwrap();
        assert_eq!(writer.data(), &[0]);

        let mut reader = BufferReader::new(writer.data());
        assert_eq!(deserialize_brush(&mut reader).unwrap(), None);
        assert!(Brush::deserialize(&mut BufferReader::new(writer.data())).is_err());
    }

    #[test]
    fn gradients_decode() {
        let brushes = [
            Brush::LinearGradient {
                color: Color::rgb8(255, 0, 0),
                color2: Color::WHITE,
                rotation: 45.0,
                opacity: 0.75,
            },
            Brush::RadialGradient {
                color: Color::BLACK,
                color2: Color::rgba8(0, 0, 255, 128),
                center: Point::new(0.5, 0.5),
                opacity: 1.0,
            },
        ];

        for brush in brushes {
            let mut writer = BufferWriter::new();
            brush.serialize(&mut writer).unwrap();

            let mut reader = BufferReader::new(writer.data());
            assert_eq!(Brush::deserialize(&mut reader).unwrap(), brush);
            assert!(reader.is_at_end());
        }
    }

    #[test]
    fn pen_layout() {
        let mut pen = Pen::solid(Color::BLACK, 0.25);
        pen.start_cap = LineCap::Round;
        pen.line_join = LineJoin::Bevel;
        pen.dash_style = vec![2.0, 1.0];

        let mut writer = BufferWriter::new();
        pen.serialize(&mut writer).unwrap();

        // brush (1 + 4 + 8), thickness, caps and join, dashes, offset, dash cap
        assert_eq!(writer.len(), 13 + 8 + 3 + 4 + 16 + 8 + 1);
        assert_eq!(&writer.data()[21..24], &[1, 0, 0]);

        let decoded = Pen::deserialize(&mut BufferReader::new(writer.data())).unwrap();
        assert_eq!(decoded, pen);
    }

    #[test]
    fn default_pen() {
        let pen = Pen::default();

        assert_eq!(pen.thickness, 1.0);
        assert_eq!(pen.brush, Brush::solid(Color::BLACK));
        assert_eq!(pen.line_join, LineJoin::Miter);
        assert_eq!(pen.start_cap, LineCap::Flat);
        assert!(pen.dash_style.is_empty());
    }
}
