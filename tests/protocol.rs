use piweb_drawing::{
    Bitmap, BitmapDataLayout, Brush, Color, Command, Decoder, Drawing, Error, Frame,
    FormattedText, Geometry, GeometryDrawingSettings, ImageDrawingSettings, Pen, Point, Rect,
    TextDrawingSettings, Transform,
};
use piweb_drawing::ids::{HorizontalAnchor, PixelFormat, VerticalAnchor};

fn doubles(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

#[test]
fn draw_line_and_close() {
    let mut drawing = Drawing::new();
    let mut context = drawing.open().unwrap();
    context
        .draw_line(Point::new(1.0, 2.0), Point::new(3.0, 4.0))
        .unwrap();
    context.close().unwrap();

    let mut expected = vec![1];
    expected.extend(doubles(&[1.0, 2.0, 3.0, 4.0]));
    expected.push(255);

    assert_eq!(drawing.drawing_buffer(), expected.as_slice());
}

#[test]
fn empty_drawing() {
    let mut drawing = Drawing::new();
    drawing.open().unwrap().close().unwrap();

    assert_eq!(drawing.drawing_buffer(), &[255]);
    assert_eq!(drawing.measure(), Rect::ZERO);
}

#[test]
fn pushes_and_pops_balance() {
    let mut drawing = Drawing::new();
    let mut context = drawing.open().unwrap();

    context.push_transform(Transform::scaling(2.0, 2.0)).unwrap();
    context.push_opacity(0.5).unwrap();
    assert_eq!(context.stack(), &[Frame::Transform, Frame::Opacity]);

    context.pop().unwrap();
    context.pop().unwrap();
    assert!(matches!(context.pop(), Err(Error::StackUnderflow)));
    context.close().unwrap();

    let commands = Decoder::new(drawing.drawing_buffer()).decode().unwrap();
    assert_eq!(
        commands.iter().filter(|command| **command == Command::Pop).count(),
        2
    );
}

#[test]
fn odd_number_of_line_points() {
    let mut drawing = Drawing::new();
    let mut context = drawing.open().unwrap();

    let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
    assert!(matches!(
        context.draw_lines(&points),
        Err(Error::InvalidArgumentCount { count: 3, .. })
    ));

    context.draw_lines(&points[..2]).unwrap();
    context.close().unwrap();

    let mut expected = vec![2, 2, 0, 0, 0];
    expected.extend(doubles(&[0.0, 0.0, 1.0, 1.0]));
    expected.push(255);
    assert_eq!(drawing.drawing_buffer(), expected.as_slice());
}

#[test]
fn bounding_box_of_rectangle_and_ellipse() {
    let mut drawing = Drawing::new();
    let mut context = drawing.open().unwrap();
    context.draw_rectangle(0.0, 0.0, 10.0, 5.0).unwrap();
    context
        .draw_ellipse(Point::new(20.0, 0.0), 3.0, 3.0)
        .unwrap();
    context.close().unwrap();

    assert_eq!(drawing.measure(), Rect::new(0.0, -3.0, 23.0, 5.0));

    let commands = Decoder::new(drawing.drawing_buffer()).decode().unwrap();
    assert_eq!(
        piweb_drawing::measure(&commands).unwrap(),
        Some(drawing.measure())
    );
}

#[test]
fn every_operation_decodes_to_what_was_recorded() {
    let mut inner = Drawing::new();
    let mut inner_context = inner.open().unwrap();
    inner_context
        .draw_ellipse(Point::new(0.0, 0.0), 1.0, 1.0)
        .unwrap();
    inner_context.close().unwrap();

    let bitmap = Bitmap::raw(
        vec![0x80; 8],
        BitmapDataLayout::packed(PixelFormat::Gray8, 4, 2).unwrap(),
    )
    .unwrap();
    let settings = GeometryDrawingSettings {
        position: Point::new(5.0, 5.0),
        anchor_x: HorizontalAnchor::Left,
        anchor_y: VerticalAnchor::Bottom,
    };

    let mut drawing = Drawing::new();
    let mut context = drawing.open().unwrap();
    context.set_pen(Pen::solid(Color::rgb8(1, 2, 3), 0.25)).unwrap();
    context.set_brush(Brush::solid(Color::WHITE)).unwrap();
    context
        .push_clip(Geometry::rectangle(0.0, 0.0, 50.0, 50.0))
        .unwrap();
    context
        .draw_geometry(
            Geometry::ellipse(Point::new(1.0, 1.0), 1.0, 1.0),
            settings.clone(),
        )
        .unwrap();
    context
        .draw_text(
            FormattedText::from("Messwert"),
            TextDrawingSettings::at(Point::new(1.0, 1.0)),
        )
        .unwrap();
    context
        .draw_image(bitmap.clone(), ImageDrawingSettings::at(Point::ZERO))
        .unwrap();
    context.draw_drawing(&inner, settings.clone()).unwrap();
    context.pop().unwrap();
    context.close().unwrap();

    let commands = Decoder::new(drawing.drawing_buffer()).decode().unwrap();
    let operations: Vec<_> = commands.iter().map(Command::operation).collect();
    assert_eq!(operations.len(), 9);

    assert_eq!(
        commands[3],
        Command::DrawGeometry {
            geometry: Geometry::ellipse(Point::new(1.0, 1.0), 1.0, 1.0),
            settings: settings.clone(),
        }
    );
    assert_eq!(
        commands[5],
        Command::DrawImage {
            bitmap,
            settings: ImageDrawingSettings::at(Point::ZERO),
        }
    );
    assert_eq!(
        commands[6],
        Command::DrawDrawing {
            data: inner.drawing_buffer().to_vec(),
            settings,
        }
    );
    assert_eq!(commands[8], Command::Close);
}
