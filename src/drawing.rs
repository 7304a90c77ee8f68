//! The drawing container that owns the recorded buffers

use crate::context::DrawingContext;
use crate::error::{Error, Result};
use crate::format::Rect;
use crate::measure::Bounds;
use crate::writer::BufferWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Created,
    Open,
    Closed,
}

/// A recorded drawing. Record into it through the context returned by
/// [`Drawing::open`].
///
/// ```
/// # use piweb_drawing::{Drawing, Point};
/// let mut drawing = Drawing::new();
///
/// let mut context = drawing.open()?;
/// context.draw_line(Point::new(0.0, 0.0), Point::new(10.0, 5.0))?;
/// context.close()?;
///
/// assert_eq!(drawing.drawing_buffer().len(), 1 + 32 + 1);
/// assert_eq!(drawing.measure().width(), 10.0);
/// # Ok::<(), piweb_drawing::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Drawing {
    pub(crate) drawing: BufferWriter,
    pub(crate) highlights: BufferWriter,
    pub(crate) bounds: Bounds,
    pub(crate) state: State,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawing {
    /// An empty drawing that has not been opened yet
    pub fn new() -> Self {
        Self::with_writer(BufferWriter::new())
    }

    /// A drawing whose command buffer starts with `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_writer(BufferWriter::with_capacity(capacity))
    }

    fn with_writer(drawing: BufferWriter) -> Self {
        Self {
            drawing,
            highlights: BufferWriter::with_capacity(0),
            bounds: Bounds::new(),
            state: State::Created,
        }
    }

    /// Start recording. A drawing can be opened only once.
    pub fn open(&mut self) -> Result<DrawingContext<'_>> {
        if self.state != State::Created {
            return Err(Error::InvalidState("drawing was already opened"));
        }

        self.state = State::Open;
        tracing::debug!("drawing opened");

        Ok(DrawingContext::new(self))
    }

    /// Whether the context of this drawing was closed
    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Bounding rectangle of everything drawn, [`Rect::ZERO`] for an empty
    /// drawing
    pub fn measure(&self) -> Rect {
        self.bounds.rect().unwrap_or(Rect::ZERO)
    }

    /// Bounds as an option, `None` when nothing was drawn
    pub(crate) fn bounds(&self) -> Option<Rect> {
        self.bounds.rect()
    }

    /// Write the command buffer as a length-prefixed blob
    pub fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_sized_binary(self.drawing.data(), None)
    }

    /// Write the command buffer followed by the highlight buffer, each as a
    /// length-prefixed blob. [`Decoder::decode_container`] reads this layout
    /// back.
    ///
    /// [`Decoder::decode_container`]: crate::decode::Decoder::decode_container
    pub fn serialize_with_highlights(&self, target: &mut BufferWriter) -> Result<()> {
        self.serialize(target)?;
        target.write_sized_binary(self.highlights.data(), None)
    }

    /// The recorded opcode stream
    pub fn drawing_buffer(&self) -> &[u8] {
        self.drawing.data()
    }

    /// The recorded highlight records, empty when no highlight was placed
    pub fn highlight_buffer(&self) -> &[u8] {
        self.highlights.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Point;

    #[test]
    fn empty_drawing() {
        let mut drawing = Drawing::new();
        drawing.open().unwrap().close().unwrap();

        assert_eq!(drawing.drawing_buffer(), &[255]);
        assert_eq!(drawing.measure(), Rect::ZERO);
        assert!(drawing.highlight_buffer().is_empty());
        assert!(drawing.is_closed());
    }

    #[test]
    fn open_twice_fails() {
        let mut drawing = Drawing::new();
        drawing.open().unwrap();

        assert!(matches!(drawing.open(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn serialize_prefixes_the_buffer() {
        let mut drawing = Drawing::with_capacity(16);
        let mut context = drawing.open().unwrap();
        context.push_opacity(0.5).unwrap();
        context.pop().unwrap();
        context.close().unwrap();

        let mut writer = BufferWriter::new();
        drawing.serialize(&mut writer).unwrap();

        assert_eq!(&writer.data()[..4], &[11, 0, 0, 0]);
        assert_eq!(&writer.data()[4..], drawing.drawing_buffer());
    }

    #[test]
    fn container_holds_both_buffers() {
        let mut drawing = Drawing::new();
        let mut context = drawing.open().unwrap();
        context.draw_rectangle(0.0, 0.0, 1.0, 1.0).unwrap();
        context
            .place_highlight(
                crate::highlight::Highlight::default(),
                crate::geometry::GeometryDrawingSettings::default(),
            )
            .unwrap();
        context.close().unwrap();

        let mut writer = BufferWriter::new();
        drawing.serialize_with_highlights(&mut writer).unwrap();

        let (commands, highlights) =
            crate::decode::Decoder::decode_container(writer.data()).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].offset, 33);
    }

    #[test]
    fn measure_follows_drawn_commands() {
        let mut drawing = Drawing::new();
        let mut context = drawing.open().unwrap();
        context.draw_rectangle(0.0, 0.0, 10.0, 5.0).unwrap();
        context
            .draw_ellipse(Point::new(20.0, 0.0), 3.0, 3.0)
            .unwrap();
        context.close().unwrap();

        assert_eq!(drawing.measure(), Rect::new(0.0, -3.0, 23.0, 5.0));
    }
}
