//! Bitmaps and their placement

use crate::error::{Error, Result};
use crate::format::{place, Align, Point, Rect, Serializable, Size};
use crate::ids::{HorizontalImageAnchor, PixelFormat, VerticalImageAnchor};
use crate::reader::BufferReader;
use crate::writer::BufferWriter;

const MILLIMETERS_PER_INCH: f64 = 25.4;

/// Describes a raw pixel buffer. Encoded images (PNG, JPEG, ...) carry this
/// information themselves and have no layout.
#[derive(Debug, PartialEq, Clone)]
pub struct BitmapDataLayout {
    pub pixel_format: PixelFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Bytes per row, including padding
    pub stride: u32,
    pub dpi_x: f64,
    pub dpi_y: f64,
}

impl BitmapDataLayout {
    /// A tightly packed layout at 96 dpi. Fails when a row does not fit a
    /// 32 bit stride.
    pub fn packed(pixel_format: PixelFormat, pixel_width: u32, pixel_height: u32) -> Result<Self> {
        let stride = pixel_width
            .checked_mul(pixel_format.bytes_per_pixel())
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "a row of {} {:?} pixels does not fit a 32 bit stride",
                    pixel_width, pixel_format
                ))
            })?;

        Ok(Self {
            pixel_format,
            pixel_width,
            pixel_height,
            stride,
            dpi_x: 96.0,
            dpi_y: 96.0,
        })
    }

    /// Physical size in millimeters
    pub fn size(&self) -> Size {
        Size::new(
            self.pixel_width as f64 / self.dpi_x * MILLIMETERS_PER_INCH,
            self.pixel_height as f64 / self.dpi_y * MILLIMETERS_PER_INCH,
        )
    }

    fn required_length(&self) -> u64 {
        self.stride as u64 * self.pixel_height as u64
    }

    /// Check that rows hold their pixels and `length` bytes hold every row
    fn validate(&self, length: usize) -> Result<()> {
        let row = self.pixel_width as u64 * self.pixel_format.bytes_per_pixel() as u64;
        if (self.stride as u64) < row {
            return Err(Error::InvalidArgument(format!(
                "stride {} is shorter than a row of {} bytes",
                self.stride, row
            )));
        }

        if (length as u64) < self.required_length() {
            return Err(Error::InvalidArgument(format!(
                "bitmap needs {} bytes, got {}",
                self.required_length(),
                length
            )));
        }

        Ok(())
    }
}

impl Serializable for BitmapDataLayout {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_byte(self.pixel_format.into());
        target.write_uint32(self.pixel_width);
        target.write_uint32(self.pixel_height);
        target.write_uint32(self.stride);
        target.write_double(self.dpi_x);
        target.write_double(self.dpi_y);

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            pixel_format: PixelFormat::try_from(source.read_byte()?)?,
            pixel_width: source.read_uint32()?,
            pixel_height: source.read_uint32()?,
            stride: source.read_uint32()?,
            dpi_x: source.read_double()?,
            dpi_y: source.read_double()?,
        })
    }
}

/// Image data, encoded or raw
#[derive(Debug, PartialEq, Clone)]
pub struct Bitmap {
    data: Vec<u8>,
    layout: Option<BitmapDataLayout>,
}

impl Bitmap {
    /// An image in a format the host can decode on its own
    pub fn encoded(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            layout: None,
        }
    }

    /// A raw pixel buffer. Fails when `data` is shorter than the layout
    /// requires or a row is shorter than its pixels.
    pub fn raw(data: impl Into<Vec<u8>>, layout: BitmapDataLayout) -> Result<Self> {
        let data = data.into();
        layout.validate(data.len())?;

        Ok(Self {
            data,
            layout: Some(layout),
        })
    }

    /// The encoded image or the raw pixels
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Layout of a raw pixel buffer, `None` for encoded images
    pub fn layout(&self) -> Option<&BitmapDataLayout> {
        self.layout.as_ref()
    }

    /// Physical size in millimeters, known only for raw pixel buffers
    pub fn size(&self) -> Option<Size> {
        self.layout.as_ref().map(BitmapDataLayout::size)
    }
}

impl Serializable for Bitmap {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        self.layout.serialize(target)?;
        target.write_sized_binary(&self.data, None)
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let layout: Option<BitmapDataLayout> = Option::deserialize(source)?;
        let data = source.read_binary()?;

        if let Some(layout) = &layout {
            layout.validate(data.len())?;
        }

        Ok(Self {
            layout,
            data: data.to_vec(),
        })
    }
}

/// Where an image is placed and how large it is drawn. A missing dimension
/// is derived from the bitmap keeping its aspect ratio.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ImageDrawingSettings {
    pub position: Point,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub anchor_x: HorizontalImageAnchor,
    pub anchor_y: VerticalImageAnchor,
}

impl ImageDrawingSettings {
    /// Settings drawing the image at its natural size at `position`
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Drawn size of `bitmap`; dimensions that cannot be derived are zero
    pub fn size_of(&self, bitmap: &Bitmap) -> Size {
        let natural = bitmap.size();

        match (self.width, self.height, natural) {
            (Some(width), Some(height), _) => Size::new(width, height),
            (Some(width), None, Some(natural)) if natural.width != 0.0 => {
                Size::new(width, width * natural.height / natural.width)
            }
            (None, Some(height), Some(natural)) if natural.height != 0.0 => {
                Size::new(height * natural.width / natural.height, height)
            }
            (None, None, Some(natural)) => natural,
            (width, height, _) => Size::new(width.unwrap_or(0.0), height.unwrap_or(0.0)),
        }
    }

    /// Rectangle covered by `bitmap` when drawn with these settings
    pub fn place(&self, bitmap: &Bitmap) -> Rect {
        let x = match self.anchor_x {
            HorizontalImageAnchor::Left => Align::Start,
            HorizontalImageAnchor::Right => Align::End,
            HorizontalImageAnchor::Center => Align::Center,
        };
        let y = match self.anchor_y {
            VerticalImageAnchor::Top => Align::Start,
            VerticalImageAnchor::Bottom => Align::End,
            VerticalImageAnchor::Center => Align::Center,
        };

        let bounds = Rect::from_origin_size(Point::ZERO, self.size_of(bitmap)).abs();

        place(bounds, self.position, x, y)
    }
}

impl Serializable for ImageDrawingSettings {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        self.position.serialize(target)?;
        self.width.serialize(target)?;
        self.height.serialize(target)?;
        target.write_byte(self.anchor_x.into());
        target.write_byte(self.anchor_y.into());

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            position: Point::deserialize(source)?,
            width: Option::deserialize(source)?,
            height: Option::deserialize(source)?,
            anchor_x: HorizontalImageAnchor::try_from(source.read_byte()?)?,
            anchor_y: VerticalImageAnchor::try_from(source.read_byte()?)?,
        })
    }
}
