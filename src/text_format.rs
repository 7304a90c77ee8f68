//! Human readable s-expression dump of decoded drawings

use std::fmt::{Debug, Display, Result, Write};

use crate::command::Command;
use crate::decode::Decoder;
use crate::error::Error;
use crate::format::{Color, Point, Size};
use crate::geometry::{Geometry, GeometryDrawingSettings, GeometryKind, PathFigure, PathSegment};
use crate::highlight::{Highlight, HighlightRecord, MeasurementValueRef, Tooltip, TooltipLine};
use crate::image::{Bitmap, ImageDrawingSettings};
use crate::material::{Brush, Pen};
use crate::reader::MAX_NESTING_DEPTH;
use crate::text::{Font, FormattedText, TextDecorations, TextDrawingSettings};
use crate::transform::Transform;

/// Write the commands of a drawing and its highlight records
pub fn render_text(
    commands: &[Command],
    highlights: &[HighlightRecord],
    w: &mut impl std::io::Write,
) -> crate::error::Result<()> {
    struct Writer<'a, W> {
        inner: &'a mut W,
        error: Option<std::io::Error>,
    }

    impl<'a, W> Write for Writer<'a, W>
    where
        W: std::io::Write,
    {
        fn write_str(&mut self, s: &str) -> Result {
            if self.error.is_some() {
                return Err(std::fmt::Error);
            }

            if let Err(e) = write!(self.inner, "{}", s) {
                self.error = Some(e);
                return Err(std::fmt::Error);
            }

            Ok(())
        }
    }

    let mut writer = Writer {
        inner: w,
        error: None,
    };

    let result = Dump {
        commands,
        highlights,
    }
    .to_text(&mut writer, 0);

    if let Some(e) = writer.error {
        return Err(e.into());
    }

    result.map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::Other, "formatting the dump failed").into()
    })
}

/// Render into a string
pub fn to_string(commands: &[Command], highlights: &[HighlightRecord]) -> String {
    Dump {
        commands,
        highlights,
    }
    .display()
    .to_string()
}

trait ToTextFormat: Sized {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result;

    fn display(&self) -> Wrap<'_, Self> {
        Wrap {
            inner: self,
            indent: 0,
        }
    }
}

struct Indent(usize);

impl Display for Indent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.0 {
            write!(f, "  ")?;
        }

        Ok(())
    }
}

struct Wrap<'a, T> {
    indent: usize,
    inner: &'a T,
}

impl<'a, T> Display for Wrap<'a, T>
where
    T: ToTextFormat,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.inner.to_text(f, self.indent)?;

        Ok(())
    }
}

/// Identifier names as snake case keywords, `EvenOdd` becomes `even_odd`
struct Keyword<T>(T);

impl<T> Display for Keyword<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = format!("{:?}", self.0);

        for (i, c) in name.char_indices() {
            if c.is_uppercase() {
                if i > 0 {
                    f.write_char('_')?;
                }
                for lower in c.to_lowercase() {
                    f.write_char(lower)?;
                }
            } else {
                f.write_char(c)?;
            }
        }

        Ok(())
    }
}

struct Dump<'a> {
    commands: &'a [Command],
    highlights: &'a [HighlightRecord],
}

impl<'a> ToTextFormat for Dump<'a> {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        writeln!(w, "{}(drawing", Indent(indent))?;

        NewlineSeparated(self.commands).to_text(w, indent + 1)?;
        NewlineSeparated(self.highlights).to_text(w, indent + 1)?;

        writeln!(w, "{})", Indent(indent))?;

        Ok(())
    }
}

/// One parenthesized element per line
struct NewlineSeparated<'a, T>(&'a [T]);

impl<'a, T> ToTextFormat for NewlineSeparated<'a, T>
where
    T: ToTextFormat,
{
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        writeln!(w, "{}(", Indent(indent))?;

        for c in self.0 {
            write!(w, "{}(", Indent(indent + 1))?;
            c.to_text(w, indent + 1)?;
            writeln!(w, ")")?;
        }

        writeln!(w, "{})", Indent(indent))?;

        Ok(())
    }
}

/// Space separated elements on the current line
struct Inline<'a, T>(&'a [T]);

impl<'a, T> ToTextFormat for Inline<'a, T>
where
    T: ToTextFormat,
{
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        for c in self.0 {
            write!(w, " ")?;
            c.to_text(w, indent)?;
        }

        Ok(())
    }
}

impl ToTextFormat for Command {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        match self {
            Command::NoOp => write!(w, "no_op")?,
            Command::DrawLine { start, end } => {
                write!(w, "draw_line {} {}", start.display(), end.display())?
            }
            Command::DrawLines { points } => {
                write!(w, "draw_lines")?;
                Inline(points).to_text(w, indent)?;
            }
            Command::DrawRectangle {
                x,
                y,
                width,
                height,
            } => write!(w, "draw_rectangle {} {} {} {}", x, y, width, height)?,
            Command::DrawEllipse {
                center,
                radius_x,
                radius_y,
            } => write!(
                w,
                "draw_ellipse {} {} {}",
                center.display(),
                radius_x,
                radius_y
            )?,
            Command::DrawGeometry { geometry, settings } => write!(
                w,
                "draw_geometry {} {}",
                geometry.display(),
                settings.display()
            )?,
            Command::DrawText { text, settings } => {
                write!(w, "draw_text {} {}", text.display(), settings.display())?
            }
            Command::DrawImage { bitmap, settings } => {
                write!(w, "draw_image {} {}", bitmap.display(), settings.display())?
            }
            Command::DrawDrawing { data, settings } => {
                writeln!(w, "draw_drawing {}", settings.display())?;

                // each embedded drawing indents its commands two levels deeper
                let decoded = if indent / 2 > MAX_NESTING_DEPTH {
                    Err(Error::NestingTooDeep(MAX_NESTING_DEPTH))
                } else {
                    Decoder::new(data).decode()
                };

                match decoded {
                    Ok(commands) => NewlineSeparated(&commands).to_text(w, indent + 1)?,
                    Err(e) => writeln!(w, "{}(invalid {:?})", Indent(indent + 1), e.to_string())?,
                }

                write!(w, "{}", Indent(indent))?;
            }
            Command::SetPen(pen) => write!(w, "set_pen {}", pen.display())?,
            Command::SetBrush(brush) => write!(w, "set_brush {}", brush.display())?,
            Command::PushTransform(transform) => {
                write!(w, "push_transform {}", transform.display())?
            }
            Command::PushClip(geometry) => write!(w, "push_clip {}", geometry.display())?,
            Command::PushOpacity(opacity) => write!(w, "push_opacity {}", opacity)?,
            Command::Pop => write!(w, "pop")?,
            Command::Close => write!(w, "close")?,
        }

        Ok(())
    }
}

impl<T> ToTextFormat for Option<T>
where
    T: ToTextFormat,
{
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        match self {
            Some(x) => x.to_text(w, indent)?,
            None => write!(w, "-")?,
        }

        Ok(())
    }
}

impl ToTextFormat for f64 {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(w, "{}", self)
    }
}

impl ToTextFormat for Point {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(w, "({} {})", self.x, self.y)
    }
}

impl ToTextFormat for Size {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(w, "({} {})", self.width, self.height)
    }
}

impl ToTextFormat for Color {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        let (r, g, b, a) = self.as_rgba8();
        write!(w, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

impl ToTextFormat for Brush {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        match self {
            Brush::SolidColor { color, opacity } => {
                write!(w, "(solid {} {})", color.display(), opacity)
            }
            Brush::LinearGradient {
                color,
                color2,
                rotation,
                opacity,
            } => write!(
                w,
                "(linear {} {} {} {})",
                color.display(),
                color2.display(),
                rotation,
                opacity
            ),
            Brush::RadialGradient {
                color,
                color2,
                center,
                opacity,
            } => write!(
                w,
                "(radial {} {} {} {})",
                color.display(),
                color2.display(),
                center.display(),
                opacity
            ),
        }
    }
}

impl ToTextFormat for Pen {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        write!(
            w,
            "(pen {} {} {} {} {} (",
            self.brush.display(),
            self.thickness,
            Keyword(self.start_cap),
            Keyword(self.end_cap),
            Keyword(self.line_join),
        )?;
        for (i, dash) in self.dash_style.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            dash.to_text(w, indent)?;
        }
        write!(w, ") {} {})", self.dash_offset, Keyword(self.dash_cap))
    }
}

impl ToTextFormat for Transform {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        match self {
            Transform::Identity => write!(w, "(identity)"),
            Transform::Translation { x, y } => write!(w, "(translation {} {})", x, y),
            Transform::Rotation { angle, center } => {
                write!(w, "(rotation {} {})", angle, center.display())
            }
            Transform::Scaling {
                scale_x,
                scale_y,
                center,
            } => write!(w, "(scaling {} {} {})", scale_x, scale_y, center.display()),
            Transform::Shear {
                angle_x,
                angle_y,
                center,
            } => write!(w, "(shear {} {} {})", angle_x, angle_y, center.display()),
            Transform::Matrix {
                m11,
                m12,
                m21,
                m22,
                offset_x,
                offset_y,
            } => write!(
                w,
                "(matrix {} {} {} {} {} {})",
                m11, m12, m21, m22, offset_x, offset_y
            ),
            Transform::Group(children) => {
                write!(w, "(group")?;
                Inline(children).to_text(w, indent)?;
                write!(w, ")")
            }
        }
    }
}

impl ToTextFormat for Geometry {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        match &self.kind {
            GeometryKind::Line { start, end } => {
                write!(w, "(line {} {}", start.display(), end.display())?
            }
            GeometryKind::Rectangle {
                position,
                width,
                height,
            } => write!(w, "(rectangle {} {} {}", position.display(), width, height)?,
            GeometryKind::Ellipse {
                center,
                radius_x,
                radius_y,
            } => write!(
                w,
                "(ellipse {} {} {}",
                center.display(),
                radius_x,
                radius_y
            )?,
            GeometryKind::Path { fill_rule, figures } => {
                write!(w, "(path {}", Keyword(fill_rule))?;
                Inline(figures).to_text(w, indent)?;
            }
            GeometryKind::Custom { markup } => write!(w, "(custom {:?}", markup)?,
            GeometryKind::Group {
                fill_rule,
                children,
            } => {
                write!(w, "(group {}", Keyword(fill_rule))?;
                Inline(children).to_text(w, indent)?;
            }
            GeometryKind::Combined {
                mode,
                geometry1,
                geometry2,
            } => write!(
                w,
                "(combined {} {} {}",
                Keyword(mode),
                geometry1.display(),
                geometry2.display()
            )?,
        }

        if !self.transform.is_identity() {
            write!(w, " {}", self.transform.display())?;
        }

        write!(w, ")")
    }
}

impl ToTextFormat for PathFigure {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        write!(
            w,
            "(figure {} {}",
            self.start_point.display(),
            if self.is_closed { "closed" } else { "open" }
        )?;
        Inline(&self.segments).to_text(w, indent)?;
        write!(w, ")")
    }
}

impl ToTextFormat for PathSegment {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        match self {
            PathSegment::Line { to } => write!(w, "(line {})", to.display()),
            PathSegment::PolyLine { points } => {
                write!(w, "(poly_line")?;
                Inline(points).to_text(w, indent)?;
                write!(w, ")")
            }
            PathSegment::Arc {
                to,
                size,
                angle,
                arc_type,
                sweep_direction,
            } => write!(
                w,
                "(arc {} {} {} {} {})",
                to.display(),
                size.display(),
                angle,
                Keyword(arc_type),
                Keyword(sweep_direction)
            ),
            PathSegment::Bezier {
                control,
                control2,
                to,
            } => write!(
                w,
                "(bezier {} {} {})",
                control.display(),
                control2.display(),
                to.display()
            ),
            PathSegment::PolyBezier { points } => {
                write!(w, "(poly_bezier")?;
                Inline(points).to_text(w, indent)?;
                write!(w, ")")
            }
            PathSegment::QuadraticBezier { control, to } => write!(
                w,
                "(quadratic_bezier {} {})",
                control.display(),
                to.display()
            ),
            PathSegment::PolyQuadraticBezier { points } => {
                write!(w, "(poly_quadratic_bezier")?;
                Inline(points).to_text(w, indent)?;
                write!(w, ")")
            }
        }
    }
}

impl ToTextFormat for GeometryDrawingSettings {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "(at {} {} {})",
            self.position.display(),
            Keyword(self.anchor_x),
            Keyword(self.anchor_y)
        )
    }
}

impl ToTextFormat for TextDecorations {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        match (self.underline, self.strike_through) {
            (false, false) => write!(w, "()"),
            (true, false) => write!(w, "(underline)"),
            (false, true) => write!(w, "(strike_through)"),
            (true, true) => write!(w, "(underline strike_through)"),
        }
    }
}

impl ToTextFormat for Font {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "(font {:?} {} {} {} {} {} {})",
            self.family,
            Keyword(self.weight),
            Keyword(self.style),
            Keyword(self.stretch),
            self.size,
            self.foreground.display(),
            self.decorations.display()
        )
    }
}

impl ToTextFormat for FormattedText {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "(text {:?} {} {} {} {} {} {} {})",
            self.text,
            self.font.display(),
            self.width.display(),
            self.height.display(),
            Keyword(self.flow_direction),
            Keyword(self.horizontal_alignment),
            Keyword(self.vertical_alignment),
            Keyword(self.trimming)
        )
    }
}

impl ToTextFormat for TextDrawingSettings {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "(at {} {} {})",
            self.position.display(),
            Keyword(self.anchor_x),
            Keyword(self.anchor_y)
        )
    }
}

impl ToTextFormat for Bitmap {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        match self.layout() {
            None => write!(w, "(encoded {})", self.data().len()),
            Some(layout) => write!(
                w,
                "(raw {} {} {} {} {} {} {})",
                Keyword(layout.pixel_format),
                layout.pixel_width,
                layout.pixel_height,
                layout.stride,
                layout.dpi_x,
                layout.dpi_y,
                self.data().len()
            ),
        }
    }
}

impl ToTextFormat for ImageDrawingSettings {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "(at {} {} {} {} {})",
            self.position.display(),
            self.width.display(),
            self.height.display(),
            Keyword(self.anchor_x),
            Keyword(self.anchor_y)
        )
    }
}

impl ToTextFormat for TooltipLine {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "({} {:?} {:?})",
            Keyword(self.kind),
            self.text,
            self.class_name
        )
    }
}

impl ToTextFormat for Tooltip {
    fn to_text(&self, w: &mut impl Write, indent: usize) -> Result {
        write!(w, "(tooltip")?;
        Inline(&self.lines).to_text(w, indent)?;
        write!(w, ")")
    }
}

impl ToTextFormat for MeasurementValueRef {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(w, "(value {} {})", self.measurement, self.characteristic)
    }
}

impl ToTextFormat for Highlight {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "{} {} {} {} {}",
            self.geometry.display(),
            self.tooltip.display(),
            self.measurement_value.display(),
            self.active_border_brush.display(),
            self.active_background_brush.display()
        )
    }
}

impl ToTextFormat for HighlightRecord {
    fn to_text(&self, w: &mut impl Write, _indent: usize) -> Result {
        write!(
            w,
            "highlight {} {} {}",
            self.offset,
            self.settings.display(),
            self.highlight.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{FillRule, LineJoin};

    #[test]
    fn keywords_are_snake_case() {
        assert_eq!(Keyword(FillRule::EvenOdd).to_string(), "even_odd");
        assert_eq!(Keyword(LineJoin::Miter).to_string(), "miter");
    }

    #[test]
    fn commands_one_per_line() {
        let text = to_string(
            &[
                Command::SetPen(Some(Pen::default())),
                Command::DrawLine {
                    start: Point::new(1.0, 2.0),
                    end: Point::new(3.5, 4.0),
                },
                Command::Close,
            ],
            &[],
        );

        let expected = "\
(drawing
  (
    (set_pen (pen (solid #000000ff 1) 1 flat flat miter () 0 flat))
    (draw_line (1 2) (3.5 4))
    (close)
  )
  (
  )
)
";
        similar_asserts::assert_eq!(text, expected);
    }

    #[test]
    fn geometries_show_their_transform() {
        let geometry = Geometry::group(
            FillRule::Nonzero,
            vec![
                Geometry::rectangle(0.0, 0.0, 2.0, 1.0),
                Geometry::custom("M 0,0").with_transform(Transform::translation(1.0, 0.0)),
            ],
        );

        assert_eq!(
            geometry.display().to_string(),
            "(group nonzero (rectangle (0 0) 2 1) (custom \"M 0,0\" (translation 1 0)))"
        );
    }

    #[test]
    fn io_errors_are_reported() {
        struct Broken;

        impl std::io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "broken"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        assert!(render_text(&[Command::Close], &[], &mut Broken).is_err());
    }

    #[test]
    fn deep_embedding_is_cut_off() {
        use crate::format::Serializable;
        use crate::writer::BufferWriter;

        let mut commands = vec![Command::Close];
        for _ in 0..MAX_NESTING_DEPTH + 2 {
            let mut writer = BufferWriter::new();
            for command in &commands {
                command.serialize(&mut writer).unwrap();
            }

            commands = vec![
                Command::DrawDrawing {
                    data: writer.into_data(),
                    settings: GeometryDrawingSettings::default(),
                },
                Command::Close,
            ];
        }

        let text = to_string(&commands, &[]);
        assert!(text.contains("(invalid \"nesting deeper than 64 levels\")"));
    }
}
