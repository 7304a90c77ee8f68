use piweb_drawing::{
    text_format, Brush, Color, Decoder, Drawing, FormattedText, Geometry, GeometryDrawingSettings,
    Highlight, Pen, Point, TextDrawingSettings, Tooltip, Transform,
};

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();

    let mut drawing = Drawing::new();
    let mut context = drawing.open()?;

    context.set_pen(Pen::solid(Color::rgb8(0x20, 0x40, 0x80), 0.35))?;
    context.set_brush(Brush::solid(Color::rgb8(0xe0, 0xe8, 0xf0)))?;
    context.draw_rectangle(0.0, 0.0, 40.0, 20.0)?;

    context.push_transform(Transform::translation(20.0, 10.0))?;
    context.draw_text(
        FormattedText::from("Hello PiWeb"),
        TextDrawingSettings::at(Point::ZERO),
    )?;
    context.pop()?;

    context.place_highlight(
        Highlight::new(Geometry::rectangle(0.0, 0.0, 40.0, 20.0))
            .with_tooltip(Tooltip::new().text("Frame")),
        GeometryDrawingSettings::default(),
    )?;
    context.close()?;

    let commands = Decoder::new(drawing.drawing_buffer()).decode()?;
    let highlights = Decoder::decode_highlights(drawing.highlight_buffer())?;
    print!("{}", text_format::to_string(&commands, &highlights));

    eprintln!("bounds: {:?}", drawing.measure());

    Ok(())
}
