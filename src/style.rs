//! Text styles, colors and line styles.

use crate::error::{Error, ErrorKind};
use crate::fonts;
use crate::Mm;

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// The red component, 0 to 255.
    pub r: u8,
    /// The green component, 0 to 255.
    pub g: u8,
    /// The blue component, 0 to 255.
    pub b: u8,
}

impl Color {
    /// Creates a color from its red, green and blue components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Creates a greyscale color.
    pub const fn greyscale(value: u8) -> Color {
        Color::rgb(value, value, value)
    }

    /// Parses a color from a `#rrggbb` hex string.
    pub fn from_hex(s: &str) -> Result<Color, Error> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::new(
                format!("Invalid hex color: {}", s),
                ErrorKind::InvalidData,
            ));
        }
        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|err| {
                Error::new(format!("Invalid hex color {}: {}", s, err), ErrorKind::InvalidData)
            })
        };
        Ok(Color::rgb(component(0..2)?, component(2..4)?, component(4..6)?))
    }

    /// Blends this color towards white by the given factor (0.0 keeps the color, 1.0 is white).
    pub fn lighten(self, factor: f32) -> Color {
        let factor = factor.clamp(0.0, 1.0);
        let blend = |c: u8| (f32::from(c) + (255.0 - f32::from(c)) * factor).round() as u8;
        Color::rgb(blend(self.r), blend(self.g), blend(self.b))
    }
}

impl From<Color> for printpdf::Color {
    fn from(color: Color) -> printpdf::Color {
        printpdf::Color::Rgb(printpdf::Rgb::new(
            f32::from(color.r) / 255.0,
            f32::from(color.g) / 255.0,
            f32::from(color.b) / 255.0,
            None,
        ))
    }
}

/// A text style: font family, font size, color and effects.
///
/// All fields are optional so that styles can be merged, with unset fields falling back to the
/// defaults (12pt regular black text in the default font family).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    font_family: Option<fonts::FontFamily<fonts::Font>>,
    font_size: Option<u8>,
    color: Option<Color>,
    is_bold: bool,
    is_italic: bool,
}

impl Style {
    /// Creates a new style without any settings.
    pub fn new() -> Style {
        Style::default()
    }

    /// Merges the given style into this style, with the given style taking precedence.
    pub fn merge(mut self, style: Style) -> Style {
        if let Some(font_family) = style.font_family {
            self.font_family = Some(font_family);
        }
        if let Some(font_size) = style.font_size {
            self.font_size = Some(font_size);
        }
        if let Some(color) = style.color {
            self.color = Some(color);
        }
        self.is_bold |= style.is_bold;
        self.is_italic |= style.is_italic;
        self
    }

    /// Sets the bold effect.
    pub fn bold(mut self) -> Style {
        self.is_bold = true;
        self
    }

    /// Sets the italic effect.
    pub fn italic(mut self) -> Style {
        self.is_italic = true;
        self
    }

    /// Sets the font size in points.
    pub fn with_font_size(mut self, font_size: u8) -> Style {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the text color.
    pub fn with_color(mut self, color: Color) -> Style {
        self.color = Some(color);
        self
    }

    /// Sets the font family.
    pub fn with_font_family(mut self, font_family: fonts::FontFamily<fonts::Font>) -> Style {
        self.font_family = Some(font_family);
        self
    }

    /// Returns whether the bold effect is set.
    pub fn is_bold(&self) -> bool {
        self.is_bold
    }

    /// Returns whether the italic effect is set.
    pub fn is_italic(&self) -> bool {
        self.is_italic
    }

    /// Returns the font size in points, or the default of 12.
    pub fn font_size(&self) -> u8 {
        self.font_size.unwrap_or(12)
    }

    /// Returns the text color, or the default of black.
    pub fn color(&self) -> Color {
        self.color.unwrap_or(Color::rgb(0, 0, 0))
    }

    /// Returns the font for this style from the given font cache.
    pub fn font(&self, font_cache: &fonts::FontCache) -> fonts::Font {
        *self
            .font_family
            .unwrap_or_else(|| font_cache.default_font_family())
            .get(*self)
    }

    /// Returns the font metrics for this style.
    pub fn metrics(&self, font_cache: &fonts::FontCache) -> fonts::Metrics {
        self.font(font_cache).metrics(self.font_size())
    }

    /// Returns the line height for this style.
    pub fn line_height(&self, font_cache: &fonts::FontCache) -> Mm {
        self.metrics(font_cache).line_height
    }

    /// Calculates the width of the given string with this style.
    pub fn text_width(&self, font_cache: &fonts::FontCache, s: &str) -> Mm {
        self.font(font_cache)
            .str_width(font_cache, s, self.font_size())
    }

    /// Calculates the width of the given character with this style.
    pub fn char_width(&self, font_cache: &fonts::FontCache, c: char) -> Mm {
        self.font(font_cache)
            .char_width(font_cache, c, self.font_size())
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Style {
        Style::new().with_color(color)
    }
}

/// The style of a drawn line: thickness and color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    thickness: Mm,
    color: Color,
}

impl Default for LineStyle {
    fn default() -> LineStyle {
        LineStyle {
            thickness: Mm(0.1),
            color: Color::rgb(0, 0, 0),
        }
    }
}

impl LineStyle {
    /// Creates a line style with the given color and thickness.
    pub fn new(color: Color, thickness: Mm) -> LineStyle {
        LineStyle { thickness, color }
    }

    /// Sets the line thickness.
    pub fn with_thickness(mut self, thickness: impl Into<Mm>) -> LineStyle {
        self.thickness = thickness.into();
        self
    }

    /// Sets the line color.
    pub fn with_color(mut self, color: Color) -> LineStyle {
        self.color = color;
        self
    }

    /// Returns the line thickness.
    pub fn thickness(&self) -> Mm {
        self.thickness
    }

    /// Returns the line color.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl From<Color> for LineStyle {
    fn from(color: Color) -> LineStyle {
        LineStyle::default().with_color(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#0a2240").unwrap(), Color::rgb(10, 34, 64));
        assert_eq!(Color::from_hex("FBAF17").unwrap(), Color::rgb(251, 175, 23));
        assert!(Color::from_hex("#123").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_lighten() {
        let navy = Color::rgb(10, 34, 64);
        assert_eq!(navy.lighten(0.0), navy);
        assert_eq!(navy.lighten(1.0), Color::rgb(255, 255, 255));
        let mid = navy.lighten(0.5);
        assert!(mid.r > navy.r && mid.r < 255);
    }

    #[test]
    fn test_style_merge() {
        let base = Style::new().with_font_size(10).with_color(Color::rgb(1, 2, 3));
        let merged = base.merge(Style::new().bold());
        assert!(merged.is_bold());
        assert_eq!(merged.font_size(), 10);
        assert_eq!(merged.color(), Color::rgb(1, 2, 3));

        let overridden = base.merge(Style::new().with_font_size(16));
        assert_eq!(overridden.font_size(), 16);
    }

    #[test]
    fn test_defaults() {
        let style = Style::new();
        assert_eq!(style.font_size(), 12);
        assert_eq!(style.color(), Color::rgb(0, 0, 0));
        assert!(!style.is_bold());
    }
}
