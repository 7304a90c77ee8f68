//! JSON drawing scripts.
//!
//! A script is an array of operations, each an object naming the context
//! call in its `op` field:
//!
//! ```json
//! [
//!     { "op": "setPen", "pen": { "brush": "#ff0000", "thickness": 0.5 } },
//!     { "op": "drawLine", "start": [0, 0], "end": [10, 10] }
//! ]
//! ```

use serde::Deserialize;

use crate::context::DrawingContext;
use crate::description::{
    BitmapDescription, BrushDescription, Description, FormattedTextDescription,
    GeometryDescription, GeometryDrawingSettingsDescription, HighlightDescription,
    ImageDrawingSettingsDescription, PenDescription, PointDescription,
    TextDrawingSettingsDescription, TransformDescription,
};
use crate::drawing::Drawing;
use crate::error::Result;
use crate::format::Point;

/// One step of a script, named by its `op` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    DrawLine {
        start: PointDescription,
        end: PointDescription,
    },
    DrawLines {
        points: Vec<PointDescription>,
    },
    DrawRectangle {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        width: f64,
        height: f64,
    },
    #[serde(rename_all = "camelCase")]
    DrawEllipse {
        center: PointDescription,
        radius_x: f64,
        radius_y: f64,
    },
    DrawGeometry {
        geometry: GeometryDescription,
        #[serde(default)]
        settings: GeometryDrawingSettingsDescription,
    },
    DrawText {
        text: FormattedTextDescription,
        #[serde(default)]
        settings: TextDrawingSettingsDescription,
    },
    DrawImage {
        image: BitmapDescription,
        #[serde(default)]
        settings: ImageDrawingSettingsDescription,
    },
    /// Records `commands` into a drawing of their own and embeds it
    DrawDrawing {
        commands: Vec<Operation>,
        #[serde(default)]
        settings: GeometryDrawingSettingsDescription,
    },
    SetPen {
        #[serde(default)]
        pen: PenDescription,
    },
    NoPen,
    SetBrush {
        brush: BrushDescription,
    },
    NoBrush,
    PushTransform {
        transform: TransformDescription,
    },
    PushClip {
        geometry: GeometryDescription,
    },
    PushOpacity {
        opacity: f64,
    },
    Pop,
    PlaceHighlight {
        highlight: HighlightDescription,
        #[serde(default)]
        settings: GeometryDrawingSettingsDescription,
    },
}

impl Operation {
    /// Perform the operation on `context`
    pub fn apply(&self, context: &mut DrawingContext<'_>) -> Result<()> {
        match self {
            Operation::DrawLine { start, end } => context.draw_line(start.create()?, end.create()?),
            Operation::DrawLines { points } => {
                let points = points
                    .iter()
                    .map(Description::create)
                    .collect::<Result<Vec<Point>>>()?;
                context.draw_lines(&points)
            }
            Operation::DrawRectangle {
                x,
                y,
                width,
                height,
            } => context.draw_rectangle(*x, *y, *width, *height),
            Operation::DrawEllipse {
                center,
                radius_x,
                radius_y,
            } => context.draw_ellipse(center.create()?, *radius_x, *radius_y),
            Operation::DrawGeometry { geometry, settings } => {
                context.draw_geometry(geometry.create()?, settings.create()?)
            }
            Operation::DrawText { text, settings } => {
                context.draw_text(text.create()?, settings.create()?)
            }
            Operation::DrawImage { image, settings } => {
                context.draw_image(image.create()?, settings.create()?)
            }
            Operation::DrawDrawing { commands, settings } => {
                let nested = run(commands)?;
                context.draw_drawing(&nested, settings.create()?)
            }
            Operation::SetPen { pen } => context.set_pen(pen.create()?),
            Operation::NoPen => context.no_pen(),
            Operation::SetBrush { brush } => context.set_brush(brush.create()?),
            Operation::NoBrush => context.no_brush(),
            Operation::PushTransform { transform } => context.push_transform(transform.create()?),
            Operation::PushClip { geometry } => context.push_clip(geometry.create()?),
            Operation::PushOpacity { opacity } => context.push_opacity(*opacity),
            Operation::Pop => context.pop().map(drop),
            Operation::PlaceHighlight {
                highlight,
                settings,
            } => context.place_highlight(highlight.create()?, settings.create()?),
        }
    }
}

/// Parse a script from its JSON text
pub fn parse(json: &str) -> Result<Vec<Operation>> {
    Ok(serde_json::from_str(json)?)
}

/// Record `operations` into a new, closed drawing
pub fn run(operations: &[Operation]) -> Result<Drawing> {
    let mut drawing = Drawing::new();

    let mut context = drawing.open()?;
    for operation in operations {
        operation.apply(&mut context)?;
    }
    context.close()?;

    tracing::debug!(operations = operations.len(), "script recorded");

    Ok(drawing)
}
