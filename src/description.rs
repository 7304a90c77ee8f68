//! Relaxed input shapes for the value objects.
//!
//! Descriptions are what scripts and configuration files provide: every field
//! is optional and several values have shorthand forms, e.g. a bare color for
//! a solid brush or a markup string for a custom geometry. [`Description::create`]
//! normalizes them into the strict value objects and fills in the defaults.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::format::{Color, Point, Size};
use crate::geometry::{Geometry, GeometryDrawingSettings, PathFigure, PathSegment};
use crate::highlight::{Highlight, MeasurementValueRef, Tooltip, TooltipLine};
use crate::ids::{
    ArcType, FillRule, FlowDirection, FontStretch, FontStyle, FontWeight, GeometryCombineMode,
    HorizontalAnchor, HorizontalImageAnchor, HorizontalTextAlignment, HorizontalTextAnchor,
    LineCap, LineJoin, PixelFormat, SweepDirection, TextDecoration, TextTrimming,
    TooltipLineKind, VerticalAnchor, VerticalImageAnchor, VerticalTextAlignment,
    VerticalTextAnchor,
};
use crate::image::{Bitmap, BitmapDataLayout, ImageDrawingSettings};
use crate::material::{Brush, Pen};
use crate::text::{Font, FormattedText, TextDrawingSettings, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::transform::Transform;

/// A relaxed shape that normalizes into a value object
pub trait Description {
    type Output;

    fn create(&self) -> Result<Self::Output>;
}

fn create_or<D>(description: &Option<D>, default: D::Output) -> Result<D::Output>
where
    D: Description,
{
    match description {
        Some(description) => description.create(),
        None => Ok(default),
    }
}

fn create_all<D>(descriptions: &[D]) -> Result<Vec<D::Output>>
where
    D: Description,
{
    descriptions.iter().map(Description::create).collect()
}

/// A pair of numbers: `{"x": 1, "y": 2}`, `{"width": 1, "height": 2}`,
/// `[1, 2]` or `1` for both
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PairDescription {
    Scalar(f64),
    Array(Vec<f64>),
    Size(SizeObject),
    Point(PointObject),
}

/// `{"width": 1, "height": 2}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeObject {
    pub width: f64,
    pub height: f64,
}

/// A missing coordinate is zero, but at least one must be given
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointObject {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl PairDescription {
    fn pair(&self) -> Result<(f64, f64)> {
        match self {
            PairDescription::Scalar(value) => Ok((*value, *value)),
            PairDescription::Array(values) => match values.as_slice() {
                [first, second] => Ok((*first, *second)),
                _ => Err(Error::InvalidArgument(format!(
                    "expected two numbers, got {}",
                    values.len()
                ))),
            },
            PairDescription::Size(SizeObject { width, height }) => Ok((*width, *height)),
            PairDescription::Point(PointObject { x: None, y: None }) => Err(
                Error::InvalidArgument("a point needs at least one of x and y".to_owned()),
            ),
            PairDescription::Point(PointObject { x, y }) => {
                Ok((x.unwrap_or_default(), y.unwrap_or_default()))
            }
        }
    }
}

/// Point description; see [`PairDescription`] for the accepted forms
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PointDescription(pub PairDescription);

impl Description for PointDescription {
    type Output = Point;

    fn create(&self) -> Result<Point> {
        self.0.pair().map(Point::from)
    }
}

/// Size description, also accepting `{"width": 1, "height": 2}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SizeDescription(pub PairDescription);

impl Description for SizeDescription {
    type Output = Size;

    fn create(&self) -> Result<Size> {
        self.0.pair().map(Size::from)
    }
}

/// A color as `{"r", "g", "b", "a"?}` or as hex string `#RGB`, `#RRGGBB` or
/// `#AARRGGBB`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorDescription {
    Hex(String),
    Channels {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    0xFF
}

impl Description for ColorDescription {
    type Output = Color;

    fn create(&self) -> Result<Color> {
        match self {
            ColorDescription::Hex(hex) => parse_hex_color(hex),
            ColorDescription::Channels { r, g, b, a } => Ok(Color::rgba8(*r, *g, *b, *a)),
        }
    }
}

fn parse_hex_color(text: &str) -> Result<Color> {
    let invalid = || Error::InvalidArgument(format!("invalid color {:?}", text));

    let digits = text.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let byte = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16).map_err(|_| invalid());
    let nibble = |index: usize| {
        u8::from_str_radix(&digits[index..index + 1], 16)
            .map(|value| value * 17)
            .map_err(|_| invalid())
    };

    let color = match digits.len() {
        3 => Color::rgb8(nibble(0)?, nibble(1)?, nibble(2)?),
        6 => Color::rgb8(byte(0)?, byte(2)?, byte(4)?),
        8 => Color::rgba8(byte(2)?, byte(4)?, byte(6)?, byte(0)?),
        _ => return Err(invalid()),
    };

    Ok(color)
}

/// A brush as an object tagged by `type`, or a bare color
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BrushDescription {
    Typed(TypedBrushDescription),
    /// A bare color is a solid brush
    Color(ColorDescription),
}

/// Brush kinds by their `type` tag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypedBrushDescription {
    Solid {
        color: Option<ColorDescription>,
        opacity: Option<f64>,
    },
    Linear {
        color: Option<ColorDescription>,
        color2: Option<ColorDescription>,
        angle: Option<f64>,
        opacity: Option<f64>,
    },
    Radial {
        color: Option<ColorDescription>,
        color2: Option<ColorDescription>,
        center: Option<PointDescription>,
        opacity: Option<f64>,
    },
}

impl Description for BrushDescription {
    type Output = Brush;

    fn create(&self) -> Result<Brush> {
        let brush = match self {
            BrushDescription::Color(color) => Brush::solid(color.create()?),
            BrushDescription::Typed(TypedBrushDescription::Solid { color, opacity }) => {
                Brush::SolidColor {
                    color: create_or(color, Color::BLACK)?,
                    opacity: opacity.unwrap_or(1.0),
                }
            }
            BrushDescription::Typed(TypedBrushDescription::Linear {
                color,
                color2,
                angle,
                opacity,
            }) => Brush::LinearGradient {
                color: create_or(color, Color::BLACK)?,
                color2: create_or(color2, Color::WHITE)?,
                rotation: angle.unwrap_or(0.0),
                opacity: opacity.unwrap_or(1.0),
            },
            BrushDescription::Typed(TypedBrushDescription::Radial {
                color,
                color2,
                center,
                opacity,
            }) => Brush::RadialGradient {
                color: create_or(color, Color::BLACK)?,
                color2: create_or(color2, Color::WHITE)?,
                center: create_or(center, Point::new(0.5, 0.5))?,
                opacity: opacity.unwrap_or(1.0),
            },
        };

        Ok(brush)
    }
}

/// A pen; every property has a default
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PenDescription {
    pub brush: Option<BrushDescription>,
    pub thickness: Option<f64>,
    pub start_cap: Option<LineCap>,
    pub end_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub dash_style: Option<Vec<f64>>,
    pub dash_offset: Option<f64>,
    pub dash_cap: Option<LineCap>,
}

impl Description for PenDescription {
    type Output = Pen;

    fn create(&self) -> Result<Pen> {
        Ok(Pen {
            brush: create_or(&self.brush, Brush::default())?,
            thickness: self.thickness.unwrap_or(1.0),
            start_cap: self.start_cap.unwrap_or_default(),
            end_cap: self.end_cap.unwrap_or_default(),
            line_join: self.line_join.unwrap_or_default(),
            dash_style: self.dash_style.clone().unwrap_or_default(),
            dash_offset: self.dash_offset.unwrap_or(0.0),
            dash_cap: self.dash_cap.unwrap_or_default(),
        })
    }
}

/// A transform tagged by `type`, angles in degrees
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransformDescription {
    Identity,
    Translation {
        x: Option<f64>,
        y: Option<f64>,
    },
    Rotation {
        angle: Option<f64>,
        center: Option<PointDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Scaling {
        scale_x: Option<f64>,
        scale_y: Option<f64>,
        center: Option<PointDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Shear {
        angle_x: Option<f64>,
        angle_y: Option<f64>,
        center: Option<PointDescription>,
    },
    /// `m11, m12, m21, m22, offset_x, offset_y`
    Matrix {
        matrix: Option<Vec<f64>>,
    },
    Group {
        #[serde(default)]
        children: Vec<TransformDescription>,
    },
}

impl Description for TransformDescription {
    type Output = Transform;

    fn create(&self) -> Result<Transform> {
        let transform = match self {
            TransformDescription::Identity => Transform::Identity,
            TransformDescription::Translation { x, y } => {
                Transform::translation(x.unwrap_or(0.0), y.unwrap_or(0.0))
            }
            TransformDescription::Rotation { angle, center } => Transform::Rotation {
                angle: angle.unwrap_or(0.0),
                center: create_or(center, Point::ZERO)?,
            },
            TransformDescription::Scaling {
                scale_x,
                scale_y,
                center,
            } => Transform::Scaling {
                scale_x: scale_x.unwrap_or(1.0),
                scale_y: scale_y.unwrap_or(1.0),
                center: create_or(center, Point::ZERO)?,
            },
            TransformDescription::Shear {
                angle_x,
                angle_y,
                center,
            } => Transform::Shear {
                angle_x: angle_x.unwrap_or(0.0),
                angle_y: angle_y.unwrap_or(0.0),
                center: create_or(center, Point::ZERO)?,
            },
            TransformDescription::Matrix { matrix: None } => Transform::Identity,
            TransformDescription::Matrix {
                matrix: Some(matrix),
            } => match matrix.as_slice() {
                [m11, m12, m21, m22, offset_x, offset_y] => Transform::Matrix {
                    m11: *m11,
                    m12: *m12,
                    m21: *m21,
                    m22: *m22,
                    offset_x: *offset_x,
                    offset_y: *offset_y,
                },
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "a matrix needs 6 values, got {}",
                        matrix.len()
                    )))
                }
            },
            TransformDescription::Group { children } => Transform::Group(create_all(children)?),
        };

        Ok(transform)
    }
}

/// A geometry tagged by `type`, or path markup as a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GeometryDescription {
    Typed(Box<TypedGeometryDescription>),
    /// A bare string is custom path markup
    Markup(String),
}

/// Geometry kinds by their `type` tag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypedGeometryDescription {
    Line {
        start: Option<PointDescription>,
        end: Option<PointDescription>,
        transform: Option<TransformDescription>,
    },
    Rectangle {
        position: Option<PointDescription>,
        width: Option<f64>,
        height: Option<f64>,
        transform: Option<TransformDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Ellipse {
        /// The center of the ellipse
        position: Option<PointDescription>,
        radius_x: Option<f64>,
        radius_y: Option<f64>,
        transform: Option<TransformDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Path {
        fill_rule: Option<FillRule>,
        #[serde(default)]
        figures: Vec<PathFigureDescription>,
        transform: Option<TransformDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Custom {
        path_string: Option<String>,
        transform: Option<TransformDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Group {
        #[serde(default)]
        children: Vec<GeometryDescription>,
        fill_rule: Option<FillRule>,
        transform: Option<TransformDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Combined {
        geometry1: Option<GeometryDescription>,
        geometry2: Option<GeometryDescription>,
        combine_mode: Option<GeometryCombineMode>,
        transform: Option<TransformDescription>,
    },
}

impl Description for GeometryDescription {
    type Output = Geometry;

    fn create(&self) -> Result<Geometry> {
        let typed = match self {
            GeometryDescription::Markup(markup) => return Ok(Geometry::custom(markup.as_str())),
            GeometryDescription::Typed(typed) => &**typed,
        };

        let (geometry, transform) = match typed {
            TypedGeometryDescription::Line {
                start,
                end,
                transform,
            } => (
                Geometry::line(create_or(start, Point::ZERO)?, create_or(end, Point::ZERO)?),
                transform,
            ),
            TypedGeometryDescription::Rectangle {
                position,
                width,
                height,
                transform,
            } => {
                let position = create_or(position, Point::ZERO)?;
                (
                    Geometry::rectangle(
                        position.x,
                        position.y,
                        width.unwrap_or(0.0),
                        height.unwrap_or(0.0),
                    ),
                    transform,
                )
            }
            TypedGeometryDescription::Ellipse {
                position,
                radius_x,
                radius_y,
                transform,
            } => (
                Geometry::ellipse(
                    create_or(position, Point::ZERO)?,
                    radius_x.unwrap_or(0.0),
                    radius_y.unwrap_or(0.0),
                ),
                transform,
            ),
            TypedGeometryDescription::Path {
                fill_rule,
                figures,
                transform,
            } => (
                Geometry::path(fill_rule.unwrap_or_default(), create_all(figures)?),
                transform,
            ),
            TypedGeometryDescription::Custom {
                path_string,
                transform,
            } => (
                Geometry::custom(path_string.clone().unwrap_or_default()),
                transform,
            ),
            TypedGeometryDescription::Group {
                children,
                fill_rule,
                transform,
            } => (
                Geometry::group(fill_rule.unwrap_or_default(), create_all(children)?),
                transform,
            ),
            TypedGeometryDescription::Combined {
                geometry1,
                geometry2,
                combine_mode,
                transform,
            } => {
                // a missing operand combines with nothing
                let empty = || Geometry::group(FillRule::default(), Vec::new());
                (
                    Geometry::combined(
                        combine_mode.unwrap_or_default(),
                        create_or(geometry1, empty())?,
                        create_or(geometry2, empty())?,
                    ),
                    transform,
                )
            }
        };

        Ok(geometry.with_transform(create_or(transform, Transform::Identity)?))
    }
}

/// A path figure; the start point defaults to the origin
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathFigureDescription {
    pub start_point: Option<PointDescription>,
    pub segments: Vec<PathSegmentDescription>,
    pub is_closed: bool,
}

impl Description for PathFigureDescription {
    type Output = PathFigure;

    fn create(&self) -> Result<PathFigure> {
        Ok(PathFigure::new(
            create_or(&self.start_point, Point::ZERO)?,
            create_all(&self.segments)?,
            self.is_closed,
        ))
    }
}

/// Path segment kinds by their `type` tag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PathSegmentDescription {
    Line {
        to: Option<PointDescription>,
    },
    PolyLine {
        #[serde(default)]
        points: Vec<PointDescription>,
    },
    #[serde(rename_all = "camelCase")]
    Arc {
        to: Option<PointDescription>,
        size: Option<SizeDescription>,
        angle: Option<f64>,
        arc_type: Option<ArcType>,
        sweep_direction: Option<SweepDirection>,
    },
    Bezier {
        control: Option<PointDescription>,
        control2: Option<PointDescription>,
        to: Option<PointDescription>,
    },
    PolyBezier {
        #[serde(default)]
        points: Vec<PointDescription>,
    },
    QuadraticBezier {
        control: Option<PointDescription>,
        to: Option<PointDescription>,
    },
    PolyQuadraticBezier {
        #[serde(default)]
        points: Vec<PointDescription>,
    },
}

impl Description for PathSegmentDescription {
    type Output = PathSegment;

    fn create(&self) -> Result<PathSegment> {
        let point = |description: &Option<PointDescription>| create_or(description, Point::ZERO);

        let segment = match self {
            PathSegmentDescription::Line { to } => PathSegment::Line { to: point(to)? },
            PathSegmentDescription::PolyLine { points } => PathSegment::PolyLine {
                points: create_all(points)?,
            },
            PathSegmentDescription::Arc {
                to,
                size,
                angle,
                arc_type,
                sweep_direction,
            } => PathSegment::Arc {
                to: point(to)?,
                size: create_or(size, Size::ZERO)?,
                angle: angle.unwrap_or(0.0),
                arc_type: arc_type.unwrap_or_default(),
                sweep_direction: sweep_direction.unwrap_or_default(),
            },
            PathSegmentDescription::Bezier {
                control,
                control2,
                to,
            } => PathSegment::Bezier {
                control: point(control)?,
                control2: point(control2)?,
                to: point(to)?,
            },
            PathSegmentDescription::PolyBezier { points } => PathSegment::PolyBezier {
                points: create_all(points)?,
            },
            PathSegmentDescription::QuadraticBezier { control, to } => {
                PathSegment::QuadraticBezier {
                    control: point(control)?,
                    to: point(to)?,
                }
            }
            PathSegmentDescription::PolyQuadraticBezier { points } => {
                PathSegment::PolyQuadraticBezier {
                    points: create_all(points)?,
                }
            }
        };

        Ok(segment)
    }
}

/// Placement of a geometry or embedded drawing
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometryDrawingSettingsDescription {
    pub position: Option<PointDescription>,
    pub anchor_x: Option<HorizontalAnchor>,
    pub anchor_y: Option<VerticalAnchor>,
}

impl Description for GeometryDrawingSettingsDescription {
    type Output = GeometryDrawingSettings;

    fn create(&self) -> Result<GeometryDrawingSettings> {
        Ok(GeometryDrawingSettings {
            position: create_or(&self.position, Point::ZERO)?,
            anchor_x: self.anchor_x.unwrap_or_default(),
            anchor_y: self.anchor_y.unwrap_or_default(),
        })
    }
}

/// A font; missing properties take the defaults of [`Font`]
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontDescription {
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub font_stretch: Option<FontStretch>,
    pub size: Option<f64>,
    pub foreground: Option<BrushDescription>,
    pub text_decorations: Vec<TextDecoration>,
}

impl Description for FontDescription {
    type Output = Font;

    fn create(&self) -> Result<Font> {
        Ok(Font {
            family: self
                .font_family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_owned()),
            weight: self.font_weight.unwrap_or_default(),
            style: self.font_style.unwrap_or_default(),
            stretch: self.font_stretch.unwrap_or_default(),
            size: self.size.unwrap_or(DEFAULT_FONT_SIZE),
            foreground: create_or(&self.foreground, Brush::default())?,
            decorations: self.text_decorations.iter().copied().collect(),
        })
    }
}

/// A plain string in the default font, or a formatted text object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormattedTextDescription {
    Plain(String),
    Formatted(FormattedTextObject),
}

/// Text with its font and layout properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormattedTextObject {
    pub text: String,
    pub font: Option<FontDescription>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub flow_direction: Option<FlowDirection>,
    pub horizontal_text_alignment: Option<HorizontalTextAlignment>,
    pub vertical_text_alignment: Option<VerticalTextAlignment>,
    pub text_trimming: Option<TextTrimming>,
}

impl Description for FormattedTextDescription {
    type Output = FormattedText;

    fn create(&self) -> Result<FormattedText> {
        let object = match self {
            FormattedTextDescription::Plain(text) => return Ok(text.as_str().into()),
            FormattedTextDescription::Formatted(object) => object,
        };

        Ok(FormattedText {
            text: object.text.clone(),
            font: create_or(&object.font, Font::default())?,
            width: object.width,
            height: object.height,
            flow_direction: object.flow_direction.unwrap_or_default(),
            horizontal_alignment: object.horizontal_text_alignment.unwrap_or_default(),
            vertical_alignment: object.vertical_text_alignment.unwrap_or_default(),
            trimming: object.text_trimming.unwrap_or_default(),
        })
    }
}

/// Placement of a text
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextDrawingSettingsDescription {
    pub position: Option<PointDescription>,
    pub anchor_x: Option<HorizontalTextAnchor>,
    pub anchor_y: Option<VerticalTextAnchor>,
}

impl Description for TextDrawingSettingsDescription {
    type Output = TextDrawingSettings;

    fn create(&self) -> Result<TextDrawingSettings> {
        Ok(TextDrawingSettings {
            position: create_or(&self.position, Point::ZERO)?,
            anchor_x: self.anchor_x.unwrap_or_default(),
            anchor_y: self.anchor_y.unwrap_or_default(),
        })
    }
}

/// Raw image bytes, with a layout when they are an unencoded pixel buffer
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BitmapDescription {
    pub data: Vec<u8>,
    pub layout: Option<BitmapDataLayoutDescription>,
}

/// Layout of raw pixels
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapDataLayoutDescription {
    pub pixel_format: PixelFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Tightly packed rows when missing
    pub stride: Option<u32>,
    pub dpi_x: Option<f64>,
    pub dpi_y: Option<f64>,
}

impl Description for BitmapDescription {
    type Output = Bitmap;

    fn create(&self) -> Result<Bitmap> {
        let layout = match &self.layout {
            Some(layout) => layout,
            None => return Ok(Bitmap::encoded(self.data.clone())),
        };

        let packed = BitmapDataLayout::packed(
            layout.pixel_format,
            layout.pixel_width,
            layout.pixel_height,
        )?;

        Bitmap::raw(
            self.data.clone(),
            BitmapDataLayout {
                stride: layout.stride.unwrap_or(packed.stride),
                dpi_x: layout.dpi_x.unwrap_or(packed.dpi_x),
                dpi_y: layout.dpi_y.unwrap_or(packed.dpi_y),
                ..packed
            },
        )
    }
}

/// Placement and size of an image
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageDrawingSettingsDescription {
    pub position: Option<PointDescription>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub anchor_x: Option<HorizontalImageAnchor>,
    pub anchor_y: Option<VerticalImageAnchor>,
}

impl Description for ImageDrawingSettingsDescription {
    type Output = ImageDrawingSettings;

    fn create(&self) -> Result<ImageDrawingSettings> {
        Ok(ImageDrawingSettings {
            position: create_or(&self.position, Point::ZERO)?,
            width: self.width,
            height: self.height,
            anchor_x: self.anchor_x.unwrap_or_default(),
            anchor_y: self.anchor_y.unwrap_or_default(),
        })
    }
}

/// A tooltip line: a plain string is a text line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TooltipLineDescription {
    Text(String),
    #[serde(rename_all = "camelCase")]
    Line {
        #[serde(default)]
        kind: TooltipLineKind,
        text: String,
        #[serde(default)]
        class_name: String,
    },
}

impl Description for TooltipLineDescription {
    type Output = TooltipLine;

    fn create(&self) -> Result<TooltipLine> {
        Ok(match self {
            TooltipLineDescription::Text(text) => TooltipLine {
                kind: TooltipLineKind::Text,
                text: text.clone(),
                class_name: String::new(),
            },
            TooltipLineDescription::Line {
                kind,
                text,
                class_name,
            } => TooltipLine {
                kind: *kind,
                text: text.clone(),
                class_name: class_name.clone(),
            },
        })
    }
}

/// A highlight; measurement and characteristic are given together or not at all
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightDescription {
    pub geometry: Option<GeometryDescription>,
    pub tooltip: Option<Vec<TooltipLineDescription>>,
    pub measurement: Option<uuid::Uuid>,
    pub characteristic: Option<uuid::Uuid>,
    pub active_border_brush: Option<BrushDescription>,
    pub active_background_brush: Option<BrushDescription>,
}

impl Description for HighlightDescription {
    type Output = Highlight;

    fn create(&self) -> Result<Highlight> {
        let measurement_value = match (self.measurement, self.characteristic) {
            (Some(measurement), Some(characteristic)) => Some(MeasurementValueRef {
                measurement,
                characteristic,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::InvalidArgument(
                    "a measurement value needs both measurement and characteristic".to_owned(),
                ))
            }
        };

        Ok(Highlight {
            geometry: self.geometry.as_ref().map(Description::create).transpose()?,
            tooltip: match &self.tooltip {
                Some(lines) => Some(Tooltip {
                    lines: create_all(lines)?,
                }),
                None => None,
            },
            measurement_value,
            active_border_brush: self
                .active_border_brush
                .as_ref()
                .map(Description::create)
                .transpose()?,
            active_background_brush: self
                .active_background_brush
                .as_ref()
                .map(Description::create)
                .transpose()?,
        })
    }
}

/// Parse a description from JSON and normalize it
pub fn from_json<D>(json: &str) -> Result<D::Output>
where
    D: Description + serde::de::DeserializeOwned,
{
    serde_json::from_str::<D>(json)?.create()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryKind;

    #[test]
    fn point_shorthands() {
        assert_eq!(
            from_json::<PointDescription>(r#"{"x": 1.5}"#).unwrap(),
            Point::new(1.5, 0.0)
        );
        assert_eq!(
            from_json::<PointDescription>("[3, 4]").unwrap(),
            Point::new(3.0, 4.0)
        );
        assert_eq!(
            from_json::<PointDescription>("2").unwrap(),
            Point::new(2.0, 2.0)
        );
        assert!(from_json::<PointDescription>("[1, 2, 3]").is_err());

        assert!(matches!(
            from_json::<PointDescription>("{}"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            from_json::<PointDescription>(r#"{"width": 4}"#),
            Err(Error::Json(_))
        ));
        assert!(from_json::<SizeDescription>(r#"{"width": 4, "height": 3, "depth": 1}"#).is_err());

        assert_eq!(
            from_json::<SizeDescription>(r#"{"width": 4, "height": 3}"#).unwrap(),
            Size::new(4.0, 3.0)
        );
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#f00").unwrap(), Color::rgb8(255, 0, 0));
        assert_eq!(
            parse_hex_color("#102030").unwrap(),
            Color::rgb8(0x10, 0x20, 0x30)
        );
        assert_eq!(
            parse_hex_color("#80102030").unwrap(),
            Color::rgba8(0x10, 0x20, 0x30, 0x80)
        );

        for invalid in ["red", "#12345", "#gg0000", "#1234567890"] {
            assert!(parse_hex_color(invalid).is_err(), "{}", invalid);
        }
    }

    #[test]
    fn brush_shorthands() {
        assert_eq!(
            from_json::<BrushDescription>(r##""#00ff00""##).unwrap(),
            Brush::solid(Color::rgb8(0, 255, 0))
        );
        assert_eq!(
            from_json::<BrushDescription>(r#"{"r": 1, "g": 2, "b": 3, "a": 4}"#).unwrap(),
            Brush::solid(Color::rgba8(1, 2, 3, 4))
        );
        assert_eq!(
            from_json::<BrushDescription>(r#"{"type": "radial"}"#).unwrap(),
            Brush::RadialGradient {
                color: Color::BLACK,
                color2: Color::WHITE,
                center: Point::new(0.5, 0.5),
                opacity: 1.0,
            }
        );
        assert_eq!(
            from_json::<BrushDescription>(r##"{"type": "linear", "color2": "#f00", "angle": 90}"##)
                .unwrap(),
            Brush::LinearGradient {
                color: Color::BLACK,
                color2: Color::rgb8(255, 0, 0),
                rotation: 90.0,
                opacity: 1.0,
            }
        );
    }

    #[test]
    fn pen_defaults() {
        assert_eq!(from_json::<PenDescription>("{}").unwrap(), Pen::default());

        let pen = from_json::<PenDescription>(
            r##"{"brush": "#fff", "thickness": 0.5, "lineJoin": "round", "dashStyle": [1, 2]}"##,
        )
        .unwrap();
        assert_eq!(pen.brush, Brush::solid(Color::WHITE));
        assert_eq!(pen.line_join, LineJoin::Round);
        assert_eq!(pen.dash_style, vec![1.0, 2.0]);
    }

    #[test]
    fn transforms() {
        assert_eq!(
            from_json::<TransformDescription>(r#"{"type": "scaling", "scaleX": 2}"#).unwrap(),
            Transform::Scaling {
                scale_x: 2.0,
                scale_y: 1.0,
                center: Point::ZERO,
            }
        );
        assert_eq!(
            from_json::<TransformDescription>(
                r#"{"type": "group", "children": [{"type": "identity"}, {"type": "translation", "x": 1}]}"#
            )
            .unwrap(),
            Transform::Group(vec![Transform::Identity, Transform::translation(1.0, 0.0)])
        );
        assert!(matches!(
            from_json::<TransformDescription>(r#"{"type": "matrix", "matrix": [1, 0, 0]}"#),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn geometries() {
        assert_eq!(
            from_json::<GeometryDescription>(r#""M 0,0 L 5,5""#).unwrap(),
            Geometry::custom("M 0,0 L 5,5")
        );

        let ellipse = from_json::<GeometryDescription>(
            r#"{"type": "ellipse", "position": [1, 2], "radiusX": 3, "radiusY": 4,
                "transform": {"type": "rotation", "angle": 45}}"#,
        )
        .unwrap();
        assert_eq!(
            ellipse,
            Geometry::ellipse(Point::new(1.0, 2.0), 3.0, 4.0).with_transform(Transform::rotation(45.0))
        );

        let combined =
            from_json::<GeometryDescription>(r#"{"type": "combined", "geometry1": "M 0,0"}"#)
                .unwrap();
        match combined.kind {
            GeometryKind::Combined {
                mode, geometry2, ..
            } => {
                assert_eq!(mode, GeometryCombineMode::Union);
                assert_eq!(*geometry2, Geometry::group(FillRule::EvenOdd, Vec::new()));
            }
            other => panic!("unexpected geometry {:?}", other),
        }

        let path = from_json::<GeometryDescription>(
            r#"{"type": "path", "fillRule": "nonzero", "figures": [{
                "startPoint": {"x": 0, "y": 0}, "isClosed": true,
                "segments": [
                    {"type": "line", "to": [10, 0]},
                    {"type": "arc", "to": [10, 10], "size": 5, "sweepDirection": "counterclockwise"},
                    {"type": "polyQuadraticBezier", "points": [[1, 1], [2, 2]]}
                ]
            }]}"#,
        )
        .unwrap();
        match path.kind {
            GeometryKind::Path { fill_rule, figures } => {
                assert_eq!(fill_rule, FillRule::Nonzero);
                assert!(figures[0].is_closed);
                assert_eq!(
                    figures[0].segments[1],
                    PathSegment::Arc {
                        to: Point::new(10.0, 10.0),
                        size: Size::new(5.0, 5.0),
                        angle: 0.0,
                        arc_type: ArcType::Small,
                        sweep_direction: SweepDirection::Counterclockwise,
                    }
                );
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn text() {
        let plain = from_json::<FormattedTextDescription>(r#""Hallo""#).unwrap();
        assert_eq!(plain, FormattedText::from("Hallo"));

        let formatted = from_json::<FormattedTextDescription>(
            r#"{"text": "Hallo", "width": 20,
                "font": {"fontFamily": "Consolas", "fontWeight": "bold",
                         "textDecorations": ["underline", "strikeThrough"]},
                "textTrimming": "wordEllipses"}"#,
        )
        .unwrap();
        assert_eq!(formatted.font.family, "Consolas");
        assert_eq!(formatted.font.weight, FontWeight::Bold);
        assert_eq!(formatted.font.size, 3.5);
        assert!(formatted.font.decorations.underline);
        assert!(formatted.font.decorations.strike_through);
        assert_eq!(formatted.width, Some(20.0));
        assert_eq!(formatted.trimming, TextTrimming::WordEllipsis);
    }

    #[test]
    fn settings_defaults() {
        assert_eq!(
            from_json::<GeometryDrawingSettingsDescription>("{}").unwrap(),
            GeometryDrawingSettings::default()
        );

        let image =
            from_json::<ImageDrawingSettingsDescription>(r#"{"width": 5, "anchorX": "center"}"#)
                .unwrap();
        assert_eq!(image.width, Some(5.0));
        assert_eq!(image.anchor_x, HorizontalImageAnchor::Center);
        assert_eq!(image.anchor_y, VerticalImageAnchor::Top);

        let text =
            from_json::<TextDrawingSettingsDescription>(r#"{"anchorY": "baseline"}"#).unwrap();
        assert_eq!(text.anchor_x, HorizontalTextAnchor::Default);
        assert_eq!(text.anchor_y, VerticalTextAnchor::BaseLine);
    }

    #[test]
    fn bitmap_layout_defaults() {
        let bitmap = from_json::<BitmapDescription>(
            r#"{"data": [1, 2, 3, 4, 5, 6], "layout": {"pixelFormat": "rgb24", "pixelWidth": 2, "pixelHeight": 1}}"#,
        )
        .unwrap();

        let layout = bitmap.layout().unwrap();
        assert_eq!(layout.stride, 6);
        assert_eq!(layout.dpi_x, 96.0);

        let oversized = from_json::<BitmapDescription>(
            r#"{"data": [], "layout": {"pixelFormat": "bgra32", "pixelWidth": 2000000000, "pixelHeight": 1}}"#,
        );
        assert!(matches!(oversized, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn highlights() {
        let highlight = from_json::<HighlightDescription>(
            r#"{"geometry": {"type": "rectangle", "width": 2, "height": 2},
                "tooltip": ["Merkmal", {"kind": "collapsable", "text": "0.1", "className": "v"}],
                "measurement": "6d1d7d36-4f0e-4d5f-a2c4-6f4a0a1b2c3d",
                "characteristic": "00112233-4455-6677-8899-aabbccddeeff"}"#,
        )
        .unwrap();

        assert!(highlight.geometry.is_some());
        let tooltip = highlight.tooltip.unwrap();
        assert_eq!(tooltip.lines[0].kind, TooltipLineKind::Text);
        assert_eq!(tooltip.lines[1].class_name, "v");
        assert!(highlight.measurement_value.is_some());

        assert!(from_json::<HighlightDescription>(
            r#"{"measurement": "6d1d7d36-4f0e-4d5f-a2c4-6f4a0a1b2c3d"}"#
        )
        .is_err());
    }
}
