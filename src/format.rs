//! Basic value types of the drawing protocol and the serialization trait
//! every protocol value implements

pub use kurbo::{Affine, Point, Rect, Size, Vec2};
pub use piet::Color;

use crate::error::Result;
use crate::reader::BufferReader;
use crate::writer::BufferWriter;

/// A value with a binary operand encoding in the drawing protocol
pub trait Serializable: Sized {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()>;

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self>;
}

impl Serializable for Point {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_double(self.x);
        target.write_double(self.y);

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let x = source.read_double()?;
        let y = source.read_double()?;

        Ok(Point::new(x, y))
    }
}

impl Serializable for Size {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_double(self.width);
        target.write_double(self.height);

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let width = source.read_double()?;
        let height = source.read_double()?;

        Ok(Size::new(width, height))
    }
}

/// Colors travel as four bytes in `r, g, b, a` order
impl Serializable for Color {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        let (r, g, b, a) = self.as_rgba8();

        target.write_byte(r);
        target.write_byte(g);
        target.write_byte(b);
        target.write_byte(a);

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let r = source.read_byte()?;
        let g = source.read_byte()?;
        let b = source.read_byte()?;
        let a = source.read_byte()?;

        Ok(Color::rgba8(r, g, b, a))
    }
}

impl<T> Serializable for Option<T>
where
    T: Serializable,
{
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_bool(self.is_some());

        match self {
            Some(value) => value.serialize(target),
            None => Ok(()),
        }
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        if source.read_bool()? {
            Ok(Some(T::deserialize(source)?))
        } else {
            Ok(None)
        }
    }
}

impl Serializable for f64 {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_double(*self);

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        source.read_double()
    }
}

/// Write a count-prefixed list of values
pub(crate) fn serialize_list<T>(items: &[T], target: &mut BufferWriter) -> Result<()>
where
    T: Serializable,
{
    target.write_count(items.len())?;

    for item in items {
        item.serialize(target)?;
    }

    Ok(())
}

pub(crate) fn deserialize_list<T>(source: &mut BufferReader<'_>) -> Result<Vec<T>>
where
    T: Serializable,
{
    let count = source.read_count()?;

    // every element takes at least one byte, so a count larger than the
    // remaining buffer is corrupt
    let mut items = Vec::with_capacity(count.min(source.remaining()));
    for _ in 0..count {
        items.push(T::deserialize(source)?);
    }

    Ok(items)
}

/// Smallest rectangle containing all `points`
pub(crate) fn bounding_box(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?;

    Some(points.fold(Rect::from_points(first, first), |rect, point| {
        rect.union_pt(point)
    }))
}

/// Union of two optional bounding boxes
pub(crate) fn union(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Bounding box of `rect` after transforming its corners with `affine`
pub(crate) fn transform_rect(affine: Affine, rect: Rect) -> Rect {
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
    ];

    bounding_box(corners.iter().map(|corner| affine * *corner)).unwrap_or(rect)
}

/// Which edge of a bounding box an anchor pins to the drawing position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    /// The local origin stays at the position
    Origin,
    Start,
    End,
    Center,
}

/// Move `bounds` so that its anchored edges land on `position`
pub(crate) fn place(bounds: Rect, position: Point, x: Align, y: Align) -> Rect {
    let dx = offset(position.x, bounds.x0, bounds.x1, x);
    let dy = offset(position.y, bounds.y0, bounds.y1, y);

    bounds + Vec2::new(dx, dy)
}

fn offset(position: f64, low: f64, high: f64, align: Align) -> f64 {
    match align {
        Align::Origin => position,
        Align::Start => position - low,
        Align::End => position - high,
        Align::Center => position - (low + high) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_is_two_doubles() {
        let mut writer = BufferWriter::new();
        Point::new(1.5, -2.0).serialize(&mut writer).unwrap();

        assert_eq!(writer.len(), 16);
        assert_eq!(&writer.data()[..8], &1.5f64.to_le_bytes());

        let point = Point::deserialize(&mut BufferReader::new(writer.data())).unwrap();
        assert_eq!(point, Point::new(1.5, -2.0));
    }

    #[test]
    fn color_is_rgba_bytes() {
        let mut writer = BufferWriter::new();
        Color::rgba8(10, 20, 30, 40).serialize(&mut writer).unwrap();

        assert_eq!(writer.data(), &[10, 20, 30, 40]);
        assert_eq!(
            Color::deserialize(&mut BufferReader::new(writer.data())).unwrap(),
            Color::rgba8(10, 20, 30, 40)
        );
    }

    #[test]
    fn optional_value_has_presence_flag() {
        let mut writer = BufferWriter::new();
        Some(4.0).serialize(&mut writer).unwrap();
        None::<f64>.serialize(&mut writer).unwrap();

        assert_eq!(writer.len(), 1 + 8 + 1);

        let mut reader = BufferReader::new(writer.data());
        assert_eq!(Option::<f64>::deserialize(&mut reader).unwrap(), Some(4.0));
        assert_eq!(Option::<f64>::deserialize(&mut reader).unwrap(), None);
    }

    #[test]
    fn anchors_pin_edges_to_the_position() {
        let bounds = Rect::new(-1.0, -2.0, 3.0, 4.0);
        let position = Point::new(10.0, 10.0);

        assert_eq!(
            place(bounds, position, Align::Origin, Align::Origin),
            Rect::new(9.0, 8.0, 13.0, 14.0)
        );
        assert_eq!(
            place(bounds, position, Align::Start, Align::End),
            Rect::new(10.0, 4.0, 14.0, 10.0)
        );
        assert_eq!(
            place(bounds, position, Align::Center, Align::Center),
            Rect::new(8.0, 7.0, 12.0, 13.0)
        );
    }

    #[test]
    fn transformed_rect_covers_rotated_corners() {
        let rect = Rect::new(0.0, 0.0, 2.0, 1.0);
        let rotated = transform_rect(Affine::rotate(std::f64::consts::FRAC_PI_2), rect);

        assert!((rotated.x0 - -1.0).abs() < 1e-9);
        assert!((rotated.x1 - 0.0).abs() < 1e-9);
        assert!((rotated.y0 - 0.0).abs() < 1e-9);
        assert!((rotated.y1 - 2.0).abs() < 1e-9);
    }
}
