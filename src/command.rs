//! One record of the opcode stream

use crate::error::{Error, Result};
use crate::format::{deserialize_list, serialize_list, Point, Serializable};
use crate::geometry::{Geometry, GeometryDrawingSettings};
use crate::ids::{ContextOperation, PenId};
use crate::image::{Bitmap, ImageDrawingSettings};
use crate::material::{deserialize_brush, serialize_brush, Brush, Pen};
use crate::reader::BufferReader;
use crate::text::{FormattedText, TextDrawingSettings};
use crate::transform::Transform;
use crate::writer::BufferWriter;

/// A decoded or recorded record of the opcode stream
#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    NoOp,
    DrawLine {
        start: Point,
        end: Point,
    },
    /// Independent lines, one per pair of points
    DrawLines {
        points: Vec<Point>,
    },
    DrawRectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    DrawEllipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    DrawGeometry {
        geometry: Geometry,
        settings: GeometryDrawingSettings,
    },
    DrawText {
        text: FormattedText,
        settings: TextDrawingSettings,
    },
    DrawImage {
        bitmap: Bitmap,
        settings: ImageDrawingSettings,
    },
    /// The finished buffer of another drawing, embedded as an opaque blob
    DrawDrawing {
        data: Vec<u8>,
        settings: GeometryDrawingSettings,
    },
    SetPen(Option<Pen>),
    SetBrush(Option<Brush>),
    PushTransform(Transform),
    PushClip(Geometry),
    PushOpacity(f64),
    Pop,
    Close,
}

impl Command {
    /// Tag byte this record starts with
    pub fn operation(&self) -> ContextOperation {
        match self {
            Command::NoOp => ContextOperation::NoOp,
            Command::DrawLine { .. } => ContextOperation::DrawLine,
            Command::DrawLines { .. } => ContextOperation::DrawLines,
            Command::DrawRectangle { .. } => ContextOperation::DrawRectangle,
            Command::DrawEllipse { .. } => ContextOperation::DrawEllipse,
            Command::DrawGeometry { .. } => ContextOperation::DrawGeometry,
            Command::DrawText { .. } => ContextOperation::DrawText,
            Command::DrawImage { .. } => ContextOperation::DrawImage,
            Command::DrawDrawing { .. } => ContextOperation::DrawDrawing,
            Command::SetPen(_) => ContextOperation::SetPen,
            Command::SetBrush(_) => ContextOperation::SetBrush,
            Command::PushTransform(_) => ContextOperation::PushTransform,
            Command::PushClip(_) => ContextOperation::PushClip,
            Command::PushOpacity(_) => ContextOperation::PushOpacity,
            Command::Pop => ContextOperation::Pop,
            Command::Close => ContextOperation::Close,
        }
    }

    /// Whether the command opens a frame that a later [`Command::Pop`] closes
    pub fn is_push(&self) -> bool {
        matches!(
            self,
            Command::PushTransform(_) | Command::PushClip(_) | Command::PushOpacity(_)
        )
    }
}

/// Reject a point list that does not form whole lines
pub(crate) fn check_line_points(points: &[Point]) -> Result<()> {
    if points.len() % 2 != 0 {
        return Err(Error::InvalidArgumentCount {
            operation: "draw_lines",
            count: points.len(),
        });
    }

    Ok(())
}

impl Serializable for Command {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_byte(self.operation().into());

        match self {
            Command::NoOp | Command::Pop | Command::Close => {}
            Command::DrawLine { start, end } => {
                start.serialize(target)?;
                end.serialize(target)?;
            }
            Command::DrawLines { points } => serialize_list(points, target)?,
            Command::DrawRectangle {
                x,
                y,
                width,
                height,
            } => {
                for value in [x, y, width, height] {
                    target.write_double(*value);
                }
            }
            Command::DrawEllipse {
                center,
                radius_x,
                radius_y,
            } => {
                center.serialize(target)?;
                target.write_double(*radius_x);
                target.write_double(*radius_y);
            }
            Command::DrawGeometry { geometry, settings } => {
                geometry.serialize(target)?;
                settings.serialize(target)?;
            }
            Command::DrawText { text, settings } => {
                text.serialize(target)?;
                settings.serialize(target)?;
            }
            Command::DrawImage { bitmap, settings } => {
                bitmap.serialize(target)?;
                settings.serialize(target)?;
            }
            Command::DrawDrawing { data, settings } => {
                target.write_sized_binary(data, None)?;
                settings.serialize(target)?;
            }
            Command::SetPen(pen) => match pen {
                Some(pen) => {
                    target.write_byte(PenId::Direct.into());
                    pen.serialize(target)?;
                }
                None => target.write_byte(PenId::None.into()),
            },
            Command::SetBrush(brush) => serialize_brush(brush.as_ref(), target)?,
            Command::PushTransform(transform) => transform.serialize(target)?,
            Command::PushClip(geometry) => geometry.serialize(target)?,
            Command::PushOpacity(opacity) => target.write_double(*opacity),
        }

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let command = match ContextOperation::try_from(source.read_byte()?)? {
            ContextOperation::NoOp => Command::NoOp,
            ContextOperation::Pop => Command::Pop,
            ContextOperation::Close => Command::Close,
            ContextOperation::DrawLine => Command::DrawLine {
                start: Point::deserialize(source)?,
                end: Point::deserialize(source)?,
            },
            ContextOperation::DrawLines => {
                let points = deserialize_list(source)?;
                check_line_points(&points)?;

                Command::DrawLines { points }
            }
            ContextOperation::DrawRectangle => Command::DrawRectangle {
                x: source.read_double()?,
                y: source.read_double()?,
                width: source.read_double()?,
                height: source.read_double()?,
            },
            ContextOperation::DrawEllipse => Command::DrawEllipse {
                center: Point::deserialize(source)?,
                radius_x: source.read_double()?,
                radius_y: source.read_double()?,
            },
            ContextOperation::DrawGeometry => Command::DrawGeometry {
                geometry: Geometry::deserialize(source)?,
                settings: GeometryDrawingSettings::deserialize(source)?,
            },
            ContextOperation::DrawText => Command::DrawText {
                text: FormattedText::deserialize(source)?,
                settings: TextDrawingSettings::deserialize(source)?,
            },
            ContextOperation::DrawImage => Command::DrawImage {
                bitmap: Bitmap::deserialize(source)?,
                settings: ImageDrawingSettings::deserialize(source)?,
            },
            ContextOperation::DrawDrawing => Command::DrawDrawing {
                data: source.read_binary()?.to_vec(),
                settings: GeometryDrawingSettings::deserialize(source)?,
            },
            ContextOperation::SetPen => match PenId::try_from(source.read_byte()?)? {
                PenId::Direct => Command::SetPen(Some(Pen::deserialize(source)?)),
                PenId::None => Command::SetPen(None),
            },
            ContextOperation::SetBrush => Command::SetBrush(deserialize_brush(source)?),
            ContextOperation::PushTransform => {
                Command::PushTransform(Transform::deserialize(source)?)
            }
            ContextOperation::PushClip => Command::PushClip(Geometry::deserialize(source)?),
            ContextOperation::PushOpacity => Command::PushOpacity(source.read_double()?),
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Color;

    fn encode(command: &Command) -> Vec<u8> {
        let mut writer = BufferWriter::new();
        command.serialize(&mut writer).unwrap();
        writer.into_data()
    }

    #[test]
    fn operand_free_records_are_a_single_byte() {
        assert_eq!(encode(&Command::NoOp), [0]);
        assert_eq!(encode(&Command::Pop), [8]);
        assert_eq!(encode(&Command::Close), [255]);
        assert_eq!(encode(&Command::SetPen(None)), [11, 0]);
        assert_eq!(encode(&Command::SetBrush(None)), [10, 0]);
    }

    #[test]
    fn rectangle_is_four_doubles() {
        let data = encode(&Command::DrawRectangle {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
        });

        assert_eq!(data.len(), 1 + 32);
        assert_eq!(data[0], 3);
        assert_eq!(&data[25..], &4.0f64.to_le_bytes());
    }

    #[test]
    fn records_decode() {
        let commands = [
            Command::DrawLines {
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            },
            Command::SetPen(Some(Pen::solid(Color::rgb8(0, 128, 0), 0.5))),
            Command::SetBrush(Some(Brush::solid(Color::WHITE))),
            Command::PushTransform(Transform::rotation(30.0)),
            Command::PushClip(Geometry::rectangle(0.0, 0.0, 5.0, 5.0)),
            Command::PushOpacity(0.5),
            Command::DrawText {
                text: "Hallo".into(),
                settings: TextDrawingSettings::default(),
            },
            Command::DrawDrawing {
                data: vec![1, 2, 3, 255],
                settings: GeometryDrawingSettings::default(),
            },
        ];

        for command in commands {
            let data = encode(&command);
            let mut reader = BufferReader::new(&data);

            assert_eq!(Command::deserialize(&mut reader).unwrap(), command);
            assert!(reader.is_at_end(), "{:?} left bytes", command.operation());
        }
    }

    #[test]
    fn odd_line_points_are_rejected() {
        let mut writer = BufferWriter::new();
        writer.write_byte(ContextOperation::DrawLines.into());
        serialize_list(&[Point::ZERO], &mut writer).unwrap();

        let result = Command::deserialize(&mut BufferReader::new(writer.data()));
        assert!(matches!(
            result,
            Err(Error::InvalidArgumentCount { count: 1, .. })
        ));
    }

    #[test]
    fn unknown_opcode_is_rejected() {
        assert!(matches!(
            Command::deserialize(&mut BufferReader::new(&[42])),
            Err(Error::InvalidTag { value: 42, .. })
        ));
    }
}
