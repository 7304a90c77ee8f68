//! Fonts, formatted text and text placement

use packed_struct::prelude::*;

use crate::error::Result;
use crate::format::{place, Align, Color, Point, Rect, Serializable};
use crate::ids::{
    FlowDirection, FontStretch, FontStyle, FontWeight, HorizontalTextAlignment,
    HorizontalTextAnchor, TextDecoration, TextTrimming, VerticalTextAlignment,
    VerticalTextAnchor,
};
use crate::material::Brush;
use crate::reader::BufferReader;
use crate::writer::BufferWriter;

/// Family of [`Font::default`]
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Default font size in millimeters
pub const DEFAULT_FONT_SIZE: f64 = 3.5;

/// The decoration flag byte of a font
#[derive(PackedStruct, Debug, Clone, Copy, PartialEq, Default)]
#[packed_struct(bit_numbering = "lsb0", size_bytes = "1")]
pub struct TextDecorations {
    #[packed_field(bits = "0")]
    pub underline: bool,
    #[packed_field(bits = "1")]
    pub strike_through: bool,
    #[packed_field(bits = "2..=7")]
    _reserved: ReservedZero<packed_bits::Bits<6>>,
}

impl TextDecorations {
    /// Whether `decoration` is part of the set
    pub fn contains(&self, decoration: TextDecoration) -> bool {
        match decoration {
            TextDecoration::Underline => self.underline,
            TextDecoration::StrikeThrough => self.strike_through,
        }
    }

    /// Add `decoration` to the set
    pub fn insert(&mut self, decoration: TextDecoration) {
        match decoration {
            TextDecoration::Underline => self.underline = true,
            TextDecoration::StrikeThrough => self.strike_through = true,
        }
    }
}

impl FromIterator<TextDecoration> for TextDecorations {
    fn from_iter<I: IntoIterator<Item = TextDecoration>>(iter: I) -> Self {
        let mut decorations = TextDecorations::default();
        for decoration in iter {
            decorations.insert(decoration);
        }

        decorations
    }
}

/// Font of a formatted text; `size` is in millimeters
#[derive(Debug, PartialEq, Clone)]
pub struct Font {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub stretch: FontStretch,
    pub size: f64,
    pub foreground: Brush,
    pub decorations: TextDecorations,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_owned(),
            weight: FontWeight::default(),
            style: FontStyle::default(),
            stretch: FontStretch::default(),
            size: DEFAULT_FONT_SIZE,
            foreground: Brush::solid(Color::BLACK),
            decorations: TextDecorations::default(),
        }
    }
}

impl Serializable for Font {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_string(&self.family)?;
        target.write_uint16(self.weight.into());
        target.write_byte(self.style.into());
        target.write_byte(self.stretch.into());
        target.write_double(self.size);
        self.foreground.serialize(target)?;
        target.write_byte(self.decorations.pack()?[0]);

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            family: source.read_string()?.to_owned(),
            weight: FontWeight::try_from(source.read_uint16()?)?,
            style: FontStyle::try_from(source.read_byte()?)?,
            stretch: FontStretch::try_from(source.read_byte()?)?,
            size: source.read_double()?,
            foreground: Brush::deserialize(source)?,
            decorations: TextDecorations::unpack(&[source.read_byte()?])?,
        })
    }
}

/// A text with its font and layout box. Without `width` the text is laid
/// out on a single line.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct FormattedText {
    pub text: String,
    pub font: Font,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub flow_direction: FlowDirection,
    pub horizontal_alignment: HorizontalTextAlignment,
    pub vertical_alignment: VerticalTextAlignment,
    pub trimming: TextTrimming,
}

impl FormattedText {
    /// `text` in `font`, sized by its content
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
            ..Default::default()
        }
    }

    /// The layout box at the origin. Unset dimensions count as zero since the
    /// host measures the text itself.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width.unwrap_or(0.0),
            self.height.unwrap_or(0.0),
        )
        .abs()
    }
}

impl From<&str> for FormattedText {
    fn from(text: &str) -> Self {
        FormattedText::new(text, Font::default())
    }
}

impl From<String> for FormattedText {
    fn from(text: String) -> Self {
        FormattedText::new(text, Font::default())
    }
}

impl Serializable for FormattedText {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_string(&self.text)?;
        self.font.serialize(target)?;
        self.width.serialize(target)?;
        self.height.serialize(target)?;
        target.write_byte(self.flow_direction.into());
        target.write_byte(self.horizontal_alignment.into());
        target.write_byte(self.vertical_alignment.into());
        target.write_byte(self.trimming.into());

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            text: source.read_string()?.to_owned(),
            font: Font::deserialize(source)?,
            width: Option::deserialize(source)?,
            height: Option::deserialize(source)?,
            flow_direction: FlowDirection::try_from(source.read_byte()?)?,
            horizontal_alignment: HorizontalTextAlignment::try_from(source.read_byte()?)?,
            vertical_alignment: VerticalTextAlignment::try_from(source.read_byte()?)?,
            trimming: TextTrimming::try_from(source.read_byte()?)?,
        })
    }
}

/// Where a text is placed
#[derive(Debug, PartialEq, Clone, Default)]
pub struct TextDrawingSettings {
    pub position: Point,
    pub anchor_x: HorizontalTextAnchor,
    pub anchor_y: VerticalTextAnchor,
}

impl TextDrawingSettings {
    /// Settings anchoring the top left corner of the text at `position`
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Move `bounds` to where the host draws them. Default anchors pin the
    /// top left corner, the baseline is approximated by the bottom edge.
    pub fn place(&self, bounds: Rect) -> Rect {
        let x = match self.anchor_x {
            HorizontalTextAnchor::Default | HorizontalTextAnchor::Left => Align::Start,
            HorizontalTextAnchor::Right => Align::End,
            HorizontalTextAnchor::Center => Align::Center,
        };
        let y = match self.anchor_y {
            VerticalTextAnchor::Default | VerticalTextAnchor::Top => Align::Start,
            VerticalTextAnchor::Bottom | VerticalTextAnchor::BaseLine => Align::End,
            VerticalTextAnchor::Center => Align::Center,
        };

        place(bounds, self.position, x, y)
    }
}

impl Serializable for TextDrawingSettings {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        self.position.serialize(target)?;
        target.write_byte(self.anchor_x.into());
        target.write_byte(self.anchor_y.into());

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            position: Point::deserialize(source)?,
            anchor_x: HorizontalTextAnchor::try_from(source.read_byte()?)?,
            anchor_y: VerticalTextAnchor::try_from(source.read_byte()?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoration_bits() {
        let both: TextDecorations = [TextDecoration::StrikeThrough, TextDecoration::Underline]
            .into_iter()
            .collect();
        assert_eq!(both.pack().unwrap(), [0b11]);

        let strike = TextDecorations::unpack(&[0b10]).unwrap();
        assert!(strike.contains(TextDecoration::StrikeThrough));
        assert!(!strike.contains(TextDecoration::Underline));
    }

    #[test]
    fn font_layout() {
        let font = Font {
            family: "Consolas".to_owned(),
            weight: FontWeight::Bold,
            style: FontStyle::Italic,
            size: 5.0,
            ..Default::default()
        };

        let mut writer = BufferWriter::new();
        font.serialize(&mut writer).unwrap();

        let data = writer.data();
        assert_eq!(&data[..12], b"\x08\0\0\0Consolas");
        assert_eq!(&data[12..16], &[0xBC, 0x02, 2, 5]);
        assert_eq!(&data[16..24], &5.0f64.to_le_bytes());
        assert_eq!(data[24], 1);
        assert_eq!(*data.last().unwrap(), 0);

        assert_eq!(Font::deserialize(&mut BufferReader::new(data)).unwrap(), font);
    }

    #[test]
    fn plain_string_uses_default_font() {
        let text = FormattedText::from("Hello");

        assert_eq!(text.text, "Hello");
        assert_eq!(text.font.family, "Arial");
        assert_eq!(text.font.size, 3.5);
        assert_eq!(text.width, None);
        assert_eq!(text.bounds(), Rect::ZERO);
    }

    #[test]
    fn formatted_text_decodes() {
        let mut text = FormattedText::from("Zeile 1\nZeile 2");
        text.width = Some(40.0);
        text.horizontal_alignment = HorizontalTextAlignment::Justify;
        text.trimming = TextTrimming::WordEllipsis;
        text.font.decorations.insert(TextDecoration::Underline);

        let mut writer = BufferWriter::new();
        text.serialize(&mut writer).unwrap();

        let mut reader = BufferReader::new(writer.data());
        assert_eq!(FormattedText::deserialize(&mut reader).unwrap(), text);
        assert!(reader.is_at_end());
    }

    #[test]
    fn anchors() {
        let settings = TextDrawingSettings {
            position: Point::new(10.0, 10.0),
            anchor_x: HorizontalTextAnchor::Right,
            anchor_y: VerticalTextAnchor::BaseLine,
        };

        assert_eq!(
            settings.place(Rect::new(0.0, 0.0, 4.0, 2.0)),
            Rect::new(6.0, 8.0, 10.0, 10.0)
        );
        assert_eq!(
            TextDrawingSettings::at(Point::new(1.0, 1.0)).place(Rect::new(0.0, 0.0, 4.0, 2.0)),
            Rect::new(1.0, 1.0, 5.0, 3.0)
        );
    }
}
