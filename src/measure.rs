//! Bounding box computation over recorded commands

use crate::command::Command;
use crate::decode::Decoder;
use crate::error::{Error, Result};
use crate::format::{bounding_box, transform_rect, union, Affine, Point, Rect, Size};
use crate::geometry::GeometryDrawingSettings;
use crate::reader::MAX_NESTING_DEPTH;

/// Accumulates the bounds of drawable commands under the current transform
/// stack. Pens, clips and opacity do not change the bounds.
#[derive(Debug, Clone)]
pub struct Bounds {
    /// Always holds the root frame at the bottom
    stack: Vec<Affine>,
    rect: Option<Rect>,
    /// Embedded drawings this one is nested in
    level: usize,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Nothing drawn, no transform pushed
    pub fn new() -> Self {
        Self {
            stack: vec![Affine::IDENTITY],
            rect: None,
            level: 0,
        }
    }

    /// Union of everything drawn so far, `None` when nothing was drawn
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Number of pushes without a matching pop
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Replay `command`. Fails on an unmatched pop or a broken embedded drawing.
    pub fn record(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::NoOp | Command::SetPen(_) | Command::SetBrush(_) | Command::Close => {}
            Command::DrawLine { start, end } => self.include(bounding_box([*start, *end])),
            Command::DrawLines { points } => self.include(bounding_box(points.iter().copied())),
            Command::DrawRectangle {
                x,
                y,
                width,
                height,
            } => self.include(Some(
                Rect::from_origin_size(Point::new(*x, *y), Size::new(*width, *height)).abs(),
            )),
            Command::DrawEllipse {
                center,
                radius_x,
                radius_y,
            } => self.include(Some(Rect::from_center_size(
                *center,
                Size::new(2.0 * radius_x.abs(), 2.0 * radius_y.abs()),
            ))),
            Command::DrawGeometry { geometry, settings } => {
                self.include(geometry.bounds().map(|bounds| settings.place(bounds)))
            }
            Command::DrawText { text, settings } => {
                self.include(Some(settings.place(text.bounds())))
            }
            Command::DrawImage { bitmap, settings } => self.include(Some(settings.place(bitmap))),
            Command::DrawDrawing { data, settings } => {
                let mut nested = self.nested()?;
                for command in Decoder::new(data).decode()? {
                    nested.record(&command)?;
                }

                self.include_drawing(nested.rect(), settings);
            }
            Command::PushTransform(transform) => {
                let top = self.top();
                self.stack.push(top * transform.to_affine());
            }
            Command::PushClip(_) | Command::PushOpacity(_) => {
                let top = self.top();
                self.stack.push(top);
            }
            Command::Pop => {
                if self.stack.len() <= 1 {
                    return Err(Error::StackUnderflow);
                }
                self.stack.pop();
            }
        }

        Ok(())
    }

    /// Include a nested drawing whose own bounds are `nested`
    pub fn include_drawing(&mut self, nested: Option<Rect>, settings: &GeometryDrawingSettings) {
        self.include(nested.map(|bounds| settings.place(bounds)));
    }

    fn nested(&self) -> Result<Bounds> {
        if self.level >= MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep(MAX_NESTING_DEPTH));
        }

        Ok(Bounds {
            level: self.level + 1,
            ..Bounds::new()
        })
    }

    fn top(&self) -> Affine {
        self.stack.last().copied().unwrap_or(Affine::IDENTITY)
    }

    fn include(&mut self, local: Option<Rect>) {
        let placed = local.map(|rect| transform_rect(self.top(), rect));
        self.rect = union(self.rect, placed);
    }
}

/// Bounds of a command sequence, `None` when nothing is drawn
pub fn measure(commands: &[Command]) -> Result<Option<Rect>> {
    let mut bounds = Bounds::new();
    for command in commands {
        bounds.record(command)?;
    }

    Ok(bounds.rect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::ids::{HorizontalAnchor, VerticalAnchor};
    use crate::format::Serializable;
    use crate::transform::Transform;
    use crate::writer::BufferWriter;

    fn encode(commands: &[Command]) -> Vec<u8> {
        let mut writer = BufferWriter::new();
        for command in commands {
            command.serialize(&mut writer).unwrap();
        }
        writer.into_data()
    }

    #[test]
    fn union_of_rectangle_and_ellipse() {
        let bounds = measure(&[
            Command::DrawRectangle {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 5.0,
            },
            Command::DrawEllipse {
                center: Point::new(20.0, 0.0),
                radius_x: 3.0,
                radius_y: 3.0,
            },
        ])
        .unwrap();

        assert_eq!(bounds, Some(Rect::new(0.0, -3.0, 23.0, 5.0)));
    }

    #[test]
    fn nothing_drawn() {
        let bounds = measure(&[
            Command::PushOpacity(0.5),
            Command::SetPen(None),
            Command::Pop,
            Command::Close,
        ])
        .unwrap();

        assert_eq!(bounds, None);
    }

    #[test]
    fn transforms_apply_until_popped() {
        let bounds = measure(&[
            Command::PushTransform(Transform::translation(100.0, 0.0)),
            Command::PushClip(Geometry::rectangle(0.0, 0.0, 1.0, 1.0)),
            Command::PushTransform(Transform::scaling(2.0, 2.0)),
            Command::DrawLine {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 1.0),
            },
            Command::Pop,
            Command::Pop,
            Command::Pop,
            Command::DrawLine {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 1.0),
            },
        ])
        .unwrap();

        assert_eq!(bounds, Some(Rect::new(0.0, 0.0, 102.0, 2.0)));
    }

    #[test]
    fn geometry_is_placed_by_its_anchors() {
        let bounds = measure(&[Command::DrawGeometry {
            geometry: Geometry::rectangle(5.0, 5.0, 4.0, 2.0),
            settings: GeometryDrawingSettings {
                position: Point::new(0.0, 0.0),
                anchor_x: HorizontalAnchor::Right,
                anchor_y: VerticalAnchor::Top,
            },
        }])
        .unwrap();

        assert_eq!(bounds, Some(Rect::new(-4.0, 0.0, 0.0, 2.0)));
    }

    #[test]
    fn custom_geometry_has_no_bounds() {
        let bounds = measure(&[Command::DrawGeometry {
            geometry: Geometry::custom("M 0,0 L 10,10"),
            settings: GeometryDrawingSettings::default(),
        }])
        .unwrap();

        assert_eq!(bounds, None);
    }

    #[test]
    fn embedded_drawings_are_measured() {
        let inner = [
            Command::DrawRectangle {
                x: 0.0,
                y: 0.0,
                width: 4.0,
                height: 2.0,
            },
            Command::Close,
        ];

        let bounds = measure(&[Command::DrawDrawing {
            data: encode(&inner),
            settings: GeometryDrawingSettings::at(Point::new(10.0, 10.0)),
        }])
        .unwrap();

        assert_eq!(bounds, Some(Rect::new(10.0, 10.0, 14.0, 12.0)));
    }

    #[test]
    fn deeply_embedded_drawings_are_rejected() {
        let mut data = encode(&[Command::Close]);
        for _ in 0..MAX_NESTING_DEPTH + 1 {
            data = encode(&[
                Command::DrawDrawing {
                    data,
                    settings: GeometryDrawingSettings::default(),
                },
                Command::Close,
            ]);
        }

        let commands = Decoder::new(&data).decode().unwrap();
        assert!(matches!(
            measure(&commands),
            Err(Error::NestingTooDeep(_))
        ));
    }

    #[test]
    fn unmatched_pop_fails() {
        let mut bounds = Bounds::new();
        bounds.record(&Command::PushOpacity(1.0)).unwrap();
        assert_eq!(bounds.depth(), 1);

        bounds.record(&Command::Pop).unwrap();
        assert!(matches!(
            bounds.record(&Command::Pop),
            Err(Error::StackUnderflow)
        ));
    }
}
