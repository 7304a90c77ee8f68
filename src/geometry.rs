//! Geometries: shapes that can be filled, stroked or used as a clip

use crate::error::Result;
use kurbo::{Shape, SvgArc};

use crate::format::{
    bounding_box, deserialize_list, place, serialize_list, transform_rect, union, Align, Point,
    Rect, Serializable, Size, Vec2,
};
use crate::ids::{
    ArcType, FillRule, GeometryCombineMode, GeometryId, HorizontalAnchor, PathSegmentId,
    SweepDirection, VerticalAnchor,
};
use crate::reader::BufferReader;
use crate::transform::Transform;
use crate::writer::BufferWriter;

/// A shape and the transform applied to it
#[derive(Debug, PartialEq, Clone)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub transform: Transform,
}

/// The shape of a [`Geometry`]
#[derive(Debug, PartialEq, Clone)]
pub enum GeometryKind {
    Line {
        start: Point,
        end: Point,
    },
    Rectangle {
        position: Point,
        width: f64,
        height: f64,
    },
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    Path {
        fill_rule: FillRule,
        figures: Vec<PathFigure>,
    },
    /// Path markup passed through to the host unparsed
    Custom {
        markup: String,
    },
    Group {
        fill_rule: FillRule,
        children: Vec<Geometry>,
    },
    Combined {
        mode: GeometryCombineMode,
        geometry1: Box<Geometry>,
        geometry2: Box<Geometry>,
    },
}

impl From<GeometryKind> for Geometry {
    fn from(kind: GeometryKind) -> Self {
        Geometry {
            kind,
            transform: Transform::Identity,
        }
    }
}

impl Geometry {
    /// A straight line from `start` to `end`
    pub fn line(start: Point, end: Point) -> Self {
        GeometryKind::Line { start, end }.into()
    }

    /// A rectangle with its top left corner at `x`, `y`
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        GeometryKind::Rectangle {
            position: Point::new(x, y),
            width,
            height,
        }
        .into()
    }

    /// An ellipse around `center`
    pub fn ellipse(center: Point, radius_x: f64, radius_y: f64) -> Self {
        GeometryKind::Ellipse {
            center,
            radius_x,
            radius_y,
        }
        .into()
    }

    /// A path made of `figures`
    pub fn path(fill_rule: FillRule, figures: Vec<PathFigure>) -> Self {
        GeometryKind::Path { fill_rule, figures }.into()
    }

    /// A path given as markup the host parses
    pub fn custom(markup: impl Into<String>) -> Self {
        GeometryKind::Custom {
            markup: markup.into(),
        }
        .into()
    }

    /// Several geometries drawn as one
    pub fn group(fill_rule: FillRule, children: Vec<Geometry>) -> Self {
        GeometryKind::Group {
            fill_rule,
            children,
        }
        .into()
    }

    /// Combine two geometries by `mode`
    pub fn combined(mode: GeometryCombineMode, geometry1: Geometry, geometry2: Geometry) -> Self {
        GeometryKind::Combined {
            mode,
            geometry1: Box::new(geometry1),
            geometry2: Box::new(geometry2),
        }
        .into()
    }

    /// Replace the transform of the geometry
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Identifier written in front of the geometry
    pub fn id(&self) -> GeometryId {
        match &self.kind {
            GeometryKind::Line { .. } => GeometryId::Line,
            GeometryKind::Rectangle { .. } => GeometryId::Rectangle,
            GeometryKind::Ellipse { .. } => GeometryId::Ellipse,
            GeometryKind::Path { .. } => GeometryId::Path,
            GeometryKind::Custom { .. } => GeometryId::Custom,
            GeometryKind::Group { .. } => GeometryId::Group,
            GeometryKind::Combined { .. } => GeometryId::Combined,
        }
    }

    /// Bounding box in the coordinate space the geometry is drawn into, with
    /// its own transform applied. Custom markup is not parsed and has no
    /// bounds. Path bounds include the control points of curves and the swept
    /// extent of arcs.
    pub fn bounds(&self) -> Option<Rect> {
        let local = match &self.kind {
            GeometryKind::Line { start, end } => bounding_box([*start, *end]),
            GeometryKind::Rectangle {
                position,
                width,
                height,
            } => Some(Rect::from_origin_size(*position, Size::new(*width, *height)).abs()),
            GeometryKind::Ellipse {
                center,
                radius_x,
                radius_y,
            } => Some(Rect::from_center_size(
                *center,
                Size::new(2.0 * radius_x.abs(), 2.0 * radius_y.abs()),
            )),
            GeometryKind::Path { figures, .. } => figures
                .iter()
                .fold(None, |bounds, figure| union(bounds, figure.bounds())),
            GeometryKind::Custom { .. } => None,
            GeometryKind::Group { children, .. } => children
                .iter()
                .fold(None, |bounds, child| union(bounds, child.bounds())),
            GeometryKind::Combined {
                mode,
                geometry1,
                geometry2,
            } => match mode {
                GeometryCombineMode::Union | GeometryCombineMode::Xor => {
                    union(geometry1.bounds(), geometry2.bounds())
                }
                GeometryCombineMode::Intersect => match (geometry1.bounds(), geometry2.bounds()) {
                    // operands that do not overlap leave nothing to draw
                    (Some(a), Some(b)) => Some(a.intersect(b))
                        .filter(|overlap| overlap.width() > 0.0 && overlap.height() > 0.0),
                    _ => None,
                },
                GeometryCombineMode::Exclude => geometry1.bounds(),
            },
        }?;

        Some(transform_rect(self.transform.to_affine(), local))
    }
}

impl Serializable for Geometry {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_byte(self.id().into());
        self.transform.serialize(target)?;

        match &self.kind {
            GeometryKind::Line { start, end } => {
                start.serialize(target)?;
                end.serialize(target)?;
            }
            GeometryKind::Rectangle {
                position,
                width,
                height,
            } => {
                position.serialize(target)?;
                target.write_double(*width);
                target.write_double(*height);
            }
            GeometryKind::Ellipse {
                center,
                radius_x,
                radius_y,
            } => {
                center.serialize(target)?;
                target.write_double(*radius_x);
                target.write_double(*radius_y);
            }
            GeometryKind::Path { fill_rule, figures } => {
                target.write_byte((*fill_rule).into());
                serialize_list(figures, target)?;
            }
            GeometryKind::Custom { markup } => target.write_string(markup)?,
            GeometryKind::Group {
                fill_rule,
                children,
            } => {
                target.write_byte((*fill_rule).into());

                // children are framed by their total byte length instead of a count
                let slot = target.reserve_size();
                for child in children {
                    child.serialize(target)?;
                }
                target.write_size_at(slot)?;
            }
            GeometryKind::Combined {
                mode,
                geometry1,
                geometry2,
            } => {
                target.write_byte((*mode).into());
                geometry1.serialize(target)?;
                geometry2.serialize(target)?;
            }
        }

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let id = GeometryId::try_from(source.read_byte()?)?;
        let transform = Transform::deserialize(source)?;

        let kind = match id {
            GeometryId::Line => GeometryKind::Line {
                start: Point::deserialize(source)?,
                end: Point::deserialize(source)?,
            },
            GeometryId::Rectangle => GeometryKind::Rectangle {
                position: Point::deserialize(source)?,
                width: source.read_double()?,
                height: source.read_double()?,
            },
            GeometryId::Ellipse => GeometryKind::Ellipse {
                center: Point::deserialize(source)?,
                radius_x: source.read_double()?,
                radius_y: source.read_double()?,
            },
            GeometryId::Path => GeometryKind::Path {
                fill_rule: FillRule::try_from(source.read_byte()?)?,
                figures: deserialize_list(source)?,
            },
            GeometryId::Custom => GeometryKind::Custom {
                markup: source.read_string()?.to_owned(),
            },
            GeometryId::Group => {
                let fill_rule = FillRule::try_from(source.read_byte()?)?;
                let data = source.read_binary()?;

                let children = source.nested(|source| {
                    let mut children_source = source.sub_reader(data);

                    let mut children = Vec::new();
                    while !children_source.is_at_end() {
                        children.push(Geometry::deserialize(&mut children_source)?);
                    }

                    Ok(children)
                })?;

                GeometryKind::Group {
                    fill_rule,
                    children,
                }
            }
            GeometryId::Combined => {
                let mode = GeometryCombineMode::try_from(source.read_byte()?)?;

                source.nested(|source| {
                    Ok(GeometryKind::Combined {
                        mode,
                        geometry1: Box::new(Geometry::deserialize(source)?),
                        geometry2: Box::new(Geometry::deserialize(source)?),
                    })
                })?
            }
        };

        Ok(Geometry { kind, transform })
    }
}

/// A connected run of segments
#[derive(Debug, PartialEq, Clone)]
pub struct PathFigure {
    pub start_point: Point,
    pub segments: Vec<PathSegment>,
    pub is_closed: bool,
}

impl PathFigure {
    /// A figure starting at `start_point`
    pub fn new(start_point: Point, segments: Vec<PathSegment>, is_closed: bool) -> Self {
        Self {
            start_point,
            segments,
            is_closed,
        }
    }

    /// Bounding box of the start point and every segment, each segment
    /// starting where the previous one ended
    pub fn bounds(&self) -> Option<Rect> {
        let mut current = self.start_point;
        let mut bounds = bounding_box([current]);

        for segment in &self.segments {
            bounds = union(bounds, segment.bounds(current));
            current = segment.end_point().unwrap_or(current);
        }

        bounds
    }
}

impl Serializable for PathFigure {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        self.start_point.serialize(target)?;
        target.write_bool(self.is_closed);
        serialize_list(&self.segments, target)
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            start_point: Point::deserialize(source)?,
            is_closed: source.read_bool()?,
            segments: deserialize_list(source)?,
        })
    }
}

/// A piece of a path figure. Each segment starts where the previous one ended.
#[derive(Debug, PartialEq, Clone)]
pub enum PathSegment {
    Line {
        to: Point,
    },
    PolyLine {
        points: Vec<Point>,
    },
    /// Elliptical arc with radii `size`, rotated by `angle` degrees
    Arc {
        to: Point,
        size: Size,
        angle: f64,
        arc_type: ArcType,
        sweep_direction: SweepDirection,
    },
    Bezier {
        control: Point,
        control2: Point,
        to: Point,
    },
    /// Groups of three points, each group a cubic bezier
    PolyBezier {
        points: Vec<Point>,
    },
    QuadraticBezier {
        control: Point,
        to: Point,
    },
    /// Pairs of points, each pair a quadratic bezier
    PolyQuadraticBezier {
        points: Vec<Point>,
    },
}

impl PathSegment {
    /// Identifier written in front of the segment
    pub fn id(&self) -> PathSegmentId {
        match self {
            PathSegment::Line { .. } => PathSegmentId::Line,
            PathSegment::PolyLine { .. } => PathSegmentId::PolyLine,
            PathSegment::Arc { .. } => PathSegmentId::Arc,
            PathSegment::Bezier { .. } => PathSegmentId::Bezier,
            PathSegment::PolyBezier { .. } => PathSegmentId::PolyBezier,
            PathSegment::QuadraticBezier { .. } => PathSegmentId::QuadraticBezier,
            PathSegment::PolyQuadraticBezier { .. } => PathSegmentId::PolyQuadraticBezier,
        }
    }

    /// End and control points of the segment
    pub fn points(&self) -> Vec<Point> {
        match self {
            PathSegment::Line { to } | PathSegment::Arc { to, .. } => vec![*to],
            PathSegment::PolyLine { points }
            | PathSegment::PolyBezier { points }
            | PathSegment::PolyQuadraticBezier { points } => points.clone(),
            PathSegment::Bezier {
                control,
                control2,
                to,
            } => vec![*control, *control2, *to],
            PathSegment::QuadraticBezier { control, to } => vec![*control, *to],
        }
    }

    /// Where the segment ends, `None` for an empty poly segment
    pub fn end_point(&self) -> Option<Point> {
        self.points().last().copied()
    }

    /// Bounding box of the segment when it starts at `from`. Arcs contribute
    /// the extent they sweep through, every other segment its points.
    pub fn bounds(&self, from: Point) -> Option<Rect> {
        match self {
            PathSegment::Arc {
                to,
                size,
                angle,
                arc_type,
                sweep_direction,
            } => {
                let arc = SvgArc {
                    from,
                    to: *to,
                    radii: Vec2::new(size.width, size.height),
                    x_rotation: angle.to_radians(),
                    large_arc: *arc_type == ArcType::Large,
                    // positive angles turn clockwise with y pointing down
                    sweep: *sweep_direction == SweepDirection::Clockwise,
                };

                match kurbo::Arc::from_svg_arc(&arc) {
                    Some(arc) => Some(arc.bounding_box().union_pt(from).union_pt(*to)),
                    // zero radii or coinciding end points draw a straight line
                    None => bounding_box([*to]),
                }
            }
            _ => bounding_box(self.points()),
        }
    }
}

impl Serializable for PathSegment {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_byte(self.id().into());

        match self {
            PathSegment::Line { to } => to.serialize(target)?,
            PathSegment::PolyLine { points }
            | PathSegment::PolyBezier { points }
            | PathSegment::PolyQuadraticBezier { points } => serialize_list(points, target)?,
            PathSegment::Arc {
                to,
                size,
                angle,
                arc_type,
                sweep_direction,
            } => {
                to.serialize(target)?;
                size.serialize(target)?;
                target.write_double(*angle);
                target.write_byte((*arc_type).into());
                target.write_byte((*sweep_direction).into());
            }
            PathSegment::Bezier {
                control,
                control2,
                to,
            } => {
                control.serialize(target)?;
                control2.serialize(target)?;
                to.serialize(target)?;
            }
            PathSegment::QuadraticBezier { control, to } => {
                control.serialize(target)?;
                to.serialize(target)?;
            }
        }

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let segment = match PathSegmentId::try_from(source.read_byte()?)? {
            PathSegmentId::Line => PathSegment::Line {
                to: Point::deserialize(source)?,
            },
            PathSegmentId::PolyLine => PathSegment::PolyLine {
                points: deserialize_list(source)?,
            },
            PathSegmentId::Arc => PathSegment::Arc {
                to: Point::deserialize(source)?,
                size: Size::deserialize(source)?,
                angle: source.read_double()?,
                arc_type: ArcType::try_from(source.read_byte()?)?,
                sweep_direction: SweepDirection::try_from(source.read_byte()?)?,
            },
            PathSegmentId::Bezier => PathSegment::Bezier {
                control: Point::deserialize(source)?,
                control2: Point::deserialize(source)?,
                to: Point::deserialize(source)?,
            },
            PathSegmentId::PolyBezier => PathSegment::PolyBezier {
                points: deserialize_list(source)?,
            },
            PathSegmentId::QuadraticBezier => PathSegment::QuadraticBezier {
                control: Point::deserialize(source)?,
                to: Point::deserialize(source)?,
            },
            PathSegmentId::PolyQuadraticBezier => PathSegment::PolyQuadraticBezier {
                points: deserialize_list(source)?,
            },
        };

        Ok(segment)
    }
}

/// Where a geometry or nested drawing is placed
#[derive(Debug, PartialEq, Clone, Default)]
pub struct GeometryDrawingSettings {
    pub position: Point,
    pub anchor_x: HorizontalAnchor,
    pub anchor_y: VerticalAnchor,
}

impl GeometryDrawingSettings {
    /// Settings placing the origin of the geometry at `position`
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Move `bounds` to where the host draws them
    pub fn place(&self, bounds: Rect) -> Rect {
        let x = match self.anchor_x {
            HorizontalAnchor::Origin => Align::Origin,
            HorizontalAnchor::Left => Align::Start,
            HorizontalAnchor::Right => Align::End,
            HorizontalAnchor::Center => Align::Center,
        };
        let y = match self.anchor_y {
            VerticalAnchor::Origin => Align::Origin,
            VerticalAnchor::Top => Align::Start,
            VerticalAnchor::Bottom => Align::End,
            VerticalAnchor::Center => Align::Center,
        };

        place(bounds, self.position, x, y)
    }
}

impl Serializable for GeometryDrawingSettings {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        self.position.serialize(target)?;
        target.write_byte(self.anchor_x.into());
        target.write_byte(self.anchor_y.into());

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            position: Point::deserialize(source)?,
            anchor_x: HorizontalAnchor::try_from(source.read_byte()?)?,
            anchor_y: VerticalAnchor::try_from(source.read_byte()?)?,
        })
    }
}
