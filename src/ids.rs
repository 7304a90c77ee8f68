//! Numeric identifier tables of the drawing protocol.
//!
//! The discriminant values are part of the wire format and are shared with
//! the host, so they must never be renumbered.

use serde::Deserialize;

use crate::error::Error;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $repr:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:expr,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($repr)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )*
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> $repr {
                value as $repr
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = Error;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                $(
                    if value == $name::$variant as $repr {
                        return Ok($name::$variant);
                    }
                )*

                Err(Error::InvalidTag {
                    kind: stringify!($name),
                    value: value as u32,
                })
            }
        }
    };
}

wire_enum! {
    /// Tag byte that starts every record of the opcode stream
    pub enum ContextOperation: u8 {
        NoOp = 0,
        DrawLine = 1,
        DrawLines = 2,
        DrawRectangle = 3,
        DrawEllipse = 4,
        DrawGeometry = 5,
        DrawText = 6,
        DrawImage = 7,
        Pop = 8,
        PushTransform = 9,
        SetBrush = 10,
        SetPen = 11,
        PushClip = 12,
        PushOpacity = 13,
        DrawDrawing = 14,
        Close = 255,
    }
}

wire_enum! {
    /// Kind of a geometry
    pub enum GeometryId: u8 {
        Line = 1,
        Rectangle = 2,
        Ellipse = 3,
        Path = 4,
        Combined = 5,
        Group = 6,
        Custom = 7,
    }
}

wire_enum! {
    /// Kind of a brush
    pub enum BrushId: u8 {
        None = 0,
        SolidColor = 1,
        LinearGradient = 2,
        RadialGradient = 3,
    }
}

wire_enum! {
    /// Kind of a pen
    pub enum PenId: u8 {
        None = 0,
        Direct = 1,
    }
}

wire_enum! {
    /// Kind of a transform
    pub enum TransformationId: u8 {
        Identity = 0,
        Translation = 1,
        Rotation = 2,
        Scaling = 3,
        Shear = 4,
        Matrix = 5,
        Group = 6,
    }
}

wire_enum! {
    /// Kind of a path segment
    pub enum PathSegmentId: u8 {
        Arc = 1,
        Bezier = 2,
        Line = 3,
        QuadraticBezier = 4,
        PolyBezier = 5,
        PolyLine = 6,
        PolyQuadraticBezier = 7,
    }
}

wire_enum! {
    /// Geometry between two linear segments of a stroke
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum LineJoin: u8 {
        Bevel = 0,
        #[default]
        Miter = 1,
        Round = 2,
    }
}

wire_enum! {
    /// Geometry at the start or end of a stroke or dash
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum LineCap: u8 {
        #[default]
        Flat = 0,
        Round = 1,
        Square = 2,
    }
}

wire_enum! {
    /// How the two geometries of a combined geometry are merged
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum GeometryCombineMode: u8 {
        #[default]
        Union = 0,
        Intersect = 1,
        Xor = 2,
        Exclude = 3,
    }
}

wire_enum! {
    /// How overlapping areas of a path or group are filled
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum FillRule: u8 {
        #[default]
        EvenOdd = 0,
        Nonzero = 1,
    }
}

wire_enum! {
    /// Direction an arc turns from its start to its end point
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum SweepDirection: u8 {
        #[default]
        Clockwise = 0,
        Counterclockwise = 1,
    }
}

wire_enum! {
    /// Whether an arc sweeps more than half a turn
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum ArcType: u8 {
        #[default]
        Small = 0,
        Large = 1,
    }
}

wire_enum! {
    /// Reading direction of a text
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum FlowDirection: u8 {
        #[default]
        LeftToRight = 0,
        RightToLeft = 1,
    }
}

wire_enum! {
    /// Width to height ratio of a font, relative to its normal ratio
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum FontStretch: u8 {
        UltraCondensed = 1,
        ExtraCondensed = 2,
        Condensed = 3,
        SemiCondensed = 4,
        #[default]
        Normal = 5,
        SemiExpanded = 6,
        Expanded = 7,
        ExtraExpanded = 8,
        UltraExpanded = 9,
    }
}

wire_enum! {
    /// Font weight on the OpenType scale
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum FontWeight: u16 {
        Thin = 100,
        ExtraLight = 200,
        Light = 300,
        #[default]
        Normal = 400,
        Medium = 500,
        SemiBold = 600,
        Bold = 700,
        ExtraBold = 800,
        Black = 900,
        ExtraBlack = 950,
    }
}

wire_enum! {
    /// Upright or slanted glyphs
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum FontStyle: u8 {
        #[default]
        Normal = 0,
        Oblique = 1,
        Italic = 2,
    }
}

wire_enum! {
    /// Alignment of lines inside the text box
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum HorizontalTextAlignment: u8 {
        #[default]
        Left = 0,
        Right = 1,
        Center = 2,
        Justify = 3,
    }
}

wire_enum! {
    /// Vertical alignment of lines inside the text box
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum VerticalTextAlignment: u8 {
        #[default]
        Top = 0,
        Bottom = 1,
        Center = 2,
    }
}

wire_enum! {
    /// Point of the text box placed at the text position
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum VerticalTextAnchor: u8 {
        #[default]
        Default = 0,
        Top = 1,
        Bottom = 2,
        Center = 3,
        #[serde(rename = "baseline")]
        BaseLine = 4,
    }
}

wire_enum! {
    /// Point of the text box placed at the text position
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum HorizontalTextAnchor: u8 {
        #[default]
        Default = 0,
        Left = 1,
        Right = 2,
        Center = 3,
    }
}

wire_enum! {
    /// Point of an image placed at its position
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum VerticalImageAnchor: u8 {
        #[default]
        Top = 0,
        Bottom = 1,
        Center = 2,
    }
}

wire_enum! {
    /// Point of an image placed at its position
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum HorizontalImageAnchor: u8 {
        #[default]
        Left = 0,
        Right = 1,
        Center = 2,
    }
}

wire_enum! {
    /// Vertical alignment of a geometry or nested drawing around its position
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum VerticalAnchor: u8 {
        #[default]
        Origin = 0,
        Top = 1,
        Bottom = 2,
        Center = 3,
    }
}

wire_enum! {
    /// Horizontal alignment of a geometry or nested drawing around its position
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum HorizontalAnchor: u8 {
        #[default]
        Origin = 0,
        Left = 1,
        Right = 2,
        Center = 3,
    }
}

wire_enum! {
    /// Text decorations. The values double as bits of the decoration byte.
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum TextDecoration: u8 {
        Underline = 1,
        StrikeThrough = 2,
    }
}

wire_enum! {
    /// How text that does not fit its box is cut
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum TextTrimming: u8 {
        #[default]
        None = 0,
        CharacterEllipsis = 1,
        #[serde(alias = "wordEllipses")]
        WordEllipsis = 2,
    }
}

wire_enum! {
    /// Layout of the pixels in a raw bitmap buffer
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum PixelFormat: u8 {
        Rgb24 = 0,
        Bgr24 = 1,
        Bgra32 = 2,
        Pbgra32 = 3,
        Gray8 = 4,
    }
}

impl PixelFormat {
    /// Size of one pixel in a row
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 3,
            PixelFormat::Bgra32 | PixelFormat::Pbgra32 => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

wire_enum! {
    /// How the host renders a tooltip line
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum TooltipLineKind: u8 {
        #[default]
        Text = 0,
        Collapsable = 1,
        Fallback = 2,
    }
}
