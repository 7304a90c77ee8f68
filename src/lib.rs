#![warn(missing_docs)]
//! Encoder and decoder for the drawing command protocol of PiWeb plot
//! extensions

pub mod command;
pub mod context;
pub mod decode;
pub mod description;
pub mod drawing;
pub mod dump_helper;
pub mod error;
pub mod events;
pub mod format;
pub mod geometry;
pub mod highlight;
pub mod ids;
pub mod image;
pub mod material;
pub mod measure;
pub mod reader;
pub mod script;
pub mod text;
pub mod text_format;
pub mod transform;
pub mod writer;

pub use command::Command;
pub use context::{DrawingContext, Frame};
pub use decode::Decoder;
pub use drawing::Drawing;
pub use error::{Error, Result};
pub use events::{EventName, Events};
pub use format::{Affine, Color, Point, Rect, Serializable, Size, Vec2};
pub use geometry::{Geometry, GeometryDrawingSettings, GeometryKind, PathFigure, PathSegment};
pub use highlight::{Highlight, HighlightRecord, MeasurementValueRef, Tooltip, TooltipLine};
pub use image::{Bitmap, BitmapDataLayout, ImageDrawingSettings};
pub use material::{Brush, Pen};
pub use measure::measure;
pub use reader::BufferReader;
pub use text::{Font, FormattedText, TextDecorations, TextDrawingSettings};
pub use transform::Transform;
pub use writer::BufferWriter;
