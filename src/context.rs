//! The recorder that turns drawing calls into opcode records

use crate::command::{check_line_points, Command};
use crate::drawing::{Drawing, State};
use crate::error::{Error, Result};
use crate::format::{Point, Serializable};
use crate::geometry::{Geometry, GeometryDrawingSettings};
use crate::highlight::{Highlight, HighlightRecord};
use crate::image::{Bitmap, ImageDrawingSettings};
use crate::material::{Brush, Pen};
use crate::text::{FormattedText, TextDrawingSettings};
use crate::transform::Transform;

/// Kind of an outstanding push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Transform,
    Clip,
    Opacity,
}

/// Records drawing calls into the buffers of a [`Drawing`]. Every call is
/// written immediately, in call order.
#[derive(Debug)]
pub struct DrawingContext<'a> {
    drawing: &'a mut Drawing,
    stack: Vec<Frame>,
    pen: Option<Pen>,
    brush: Option<Brush>,
    closed: bool,
}

impl<'a> DrawingContext<'a> {
    pub(crate) fn new(drawing: &'a mut Drawing) -> Self {
        Self {
            drawing,
            stack: Vec::new(),
            pen: None,
            brush: None,
            closed: false,
        }
    }

    /// Draw a straight line with the current pen
    pub fn draw_line(&mut self, start: Point, end: Point) -> Result<()> {
        self.record(Command::DrawLine { start, end })
    }

    /// Draw one line per pair of points
    pub fn draw_lines(&mut self, points: &[Point]) -> Result<()> {
        self.ensure_open()?;
        check_line_points(points)?;

        self.record(Command::DrawLines {
            points: points.to_vec(),
        })
    }

    /// Draw an axis aligned rectangle with its top left corner at `x`, `y`
    pub fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.record(Command::DrawRectangle {
            x,
            y,
            width,
            height,
        })
    }

    /// Draw an ellipse around `center`
    pub fn draw_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64) -> Result<()> {
        self.record(Command::DrawEllipse {
            center,
            radius_x,
            radius_y,
        })
    }

    /// Draw `geometry` with the current pen and brush, placed by `settings`
    pub fn draw_geometry(
        &mut self,
        geometry: Geometry,
        settings: GeometryDrawingSettings,
    ) -> Result<()> {
        self.record(Command::DrawGeometry { geometry, settings })
    }

    /// Draw a formatted text, or a plain string in the default font
    pub fn draw_text(
        &mut self,
        text: impl Into<FormattedText>,
        settings: TextDrawingSettings,
    ) -> Result<()> {
        self.record(Command::DrawText {
            text: text.into(),
            settings,
        })
    }

    /// Draw `bitmap` placed and sized by `settings`
    pub fn draw_image(&mut self, bitmap: Bitmap, settings: ImageDrawingSettings) -> Result<()> {
        self.record(Command::DrawImage { bitmap, settings })
    }

    /// Embed the finished buffer of another, closed drawing
    pub fn draw_drawing(
        &mut self,
        drawing: &Drawing,
        settings: GeometryDrawingSettings,
    ) -> Result<()> {
        self.ensure_open()?;

        if !drawing.is_closed() {
            return Err(Error::InvalidState("embedded drawing is not closed"));
        }

        // the nested bounds are already known, no need to decode the blob again
        self.write(&Command::DrawDrawing {
            data: drawing.drawing_buffer().to_vec(),
            settings: settings.clone(),
        })?;
        self.drawing
            .bounds
            .include_drawing(drawing.bounds(), &settings);

        Ok(())
    }

    /// Stroke following shapes with `pen`
    pub fn set_pen(&mut self, pen: Pen) -> Result<()> {
        self.record(Command::SetPen(Some(pen.clone())))?;
        self.pen = Some(pen);

        Ok(())
    }

    /// Stop stroking following shapes
    pub fn no_pen(&mut self) -> Result<()> {
        self.record(Command::SetPen(None))?;
        self.pen = None;

        Ok(())
    }

    /// Fill following shapes with `brush`
    pub fn set_brush(&mut self, brush: Brush) -> Result<()> {
        self.record(Command::SetBrush(Some(brush.clone())))?;
        self.brush = Some(brush);

        Ok(())
    }

    /// Stop filling following shapes
    pub fn no_brush(&mut self) -> Result<()> {
        self.record(Command::SetBrush(None))?;
        self.brush = None;

        Ok(())
    }

    /// The pen set by the last `set_pen`, `None` after `no_pen`
    pub fn pen(&self) -> Option<&Pen> {
        self.pen.as_ref()
    }

    /// The brush set by the last `set_brush`, `None` after `no_brush`
    pub fn brush(&self) -> Option<&Brush> {
        self.brush.as_ref()
    }

    /// Transform following commands until the matching pop
    pub fn push_transform(&mut self, transform: Transform) -> Result<()> {
        self.record(Command::PushTransform(transform))?;
        self.stack.push(Frame::Transform);

        Ok(())
    }

    /// Clip following commands to `geometry` until the matching pop
    pub fn push_clip(&mut self, geometry: Geometry) -> Result<()> {
        self.record(Command::PushClip(geometry))?;
        self.stack.push(Frame::Clip);

        Ok(())
    }

    /// Draw following commands with `opacity` until the matching pop
    pub fn push_opacity(&mut self, opacity: f64) -> Result<()> {
        self.record(Command::PushOpacity(opacity))?;
        self.stack.push(Frame::Opacity);

        Ok(())
    }

    /// Undo the most recent push
    pub fn pop(&mut self) -> Result<Frame> {
        self.ensure_open()?;

        let frame = self.stack.last().copied().ok_or(Error::StackUnderflow)?;
        self.record(Command::Pop)?;
        self.stack.pop();

        Ok(frame)
    }

    /// Outstanding pushes, innermost last
    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    /// Place an interactive region at the current position of the stream
    pub fn place_highlight(
        &mut self,
        highlight: Highlight,
        settings: GeometryDrawingSettings,
    ) -> Result<()> {
        self.ensure_open()?;

        let length = self.drawing.drawing.len();
        let offset = u32::try_from(length).map_err(|_| Error::LengthOverflow(length))?;

        HighlightRecord {
            offset,
            settings,
            highlight,
        }
        .serialize(&mut self.drawing.highlights)?;

        tracing::trace!(offset, "placed highlight");

        Ok(())
    }

    /// Finish the drawing. Outstanding pushes are closed implicitly by the
    /// host.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;

        if !self.stack.is_empty() {
            tracing::warn!(
                outstanding = self.stack.len(),
                "closing drawing with unbalanced push operations"
            );
        }

        self.record(Command::Close)?;
        self.closed = true;
        self.drawing.state = State::Closed;

        tracing::debug!(
            bytes = self.drawing.drawing.len(),
            highlight_bytes = self.drawing.highlights.len(),
            "drawing closed"
        );

        Ok(())
    }

    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::InvalidState("drawing is closed"));
        }

        Ok(())
    }

    fn record(&mut self, command: Command) -> Result<()> {
        self.write(&command)?;
        self.drawing.bounds.record(&command)
    }

    fn write(&mut self, command: &Command) -> Result<()> {
        self.ensure_open()?;

        tracing::trace!(operation = ?command.operation(), "record");
        command.serialize(&mut self.drawing.drawing)
    }
}
