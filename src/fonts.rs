//! Fonts, font families and font metrics.
//!
//! Text is rendered with the PDF built-in Helvetica family, so the produced documents stay small
//! and need no font embedding.  Accurate layout still requires glyph metrics, which the built-in
//! fonts do not ship with the crate, so every [`FontData`][] instance pairs a built-in font with a
//! metrically compatible TrueType font that is only used for measuring.
//!
//! [`FontData`]: struct.FontData.html

use std::fs;
use std::path;

use crate::error::{Context as _, Error, ErrorKind};
use crate::Mm;

/// The conversion factor from font units (pt) to millimeters.
const PT_TO_MM: f32 = 0.352_778;

/// The data of a font that can measure and render text.
#[derive(Clone, Debug)]
pub struct FontData {
    rt_font: rusttype::Font<'static>,
    builtin: printpdf::BuiltinFont,
}

impl FontData {
    /// Loads a font from the given TrueType data, using the given built-in font for rendering.
    pub fn new(data: Vec<u8>, builtin: printpdf::BuiltinFont) -> Result<FontData, Error> {
        let rt_font = rusttype::Font::try_from_vec(data)
            .ok_or_else(|| Error::new("Failed to parse font data", ErrorKind::InvalidFont))?;
        Ok(FontData { rt_font, builtin })
    }

    /// Loads a font from the given TrueType file.
    pub fn load(
        path: impl AsRef<path::Path>,
        builtin: printpdf::BuiltinFont,
    ) -> Result<FontData, Error> {
        let path = path.as_ref();
        let data = fs::read(path)
            .with_context(|| format!("Failed to read font file {}", path.display()))?;
        FontData::new(data, builtin)
    }
}

/// A collection of fonts with different styles: regular, bold, italic and bold italic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontFamily<T: Clone + std::fmt::Debug> {
    /// The regular variant of this font family.
    pub regular: T,
    /// The bold variant of this font family.
    pub bold: T,
    /// The italic variant of this font family.
    pub italic: T,
    /// The bold italic variant of this font family.
    pub bold_italic: T,
}

impl<T: Clone + std::fmt::Debug> FontFamily<T> {
    /// Returns the font for the given style.
    pub fn get(&self, style: crate::style::Style) -> &T {
        if style.is_bold() && style.is_italic() {
            &self.bold_italic
        } else if style.is_bold() {
            &self.bold
        } else if style.is_italic() {
            &self.italic
        } else {
            &self.regular
        }
    }
}

/// Loads the bundled DejaVu Sans family mapped to the Helvetica built-in fonts.
pub fn helvetica_family() -> Result<FontFamily<FontData>, Error> {
    use printpdf::BuiltinFont;
    Ok(FontFamily {
        regular: FontData::new(
            include_bytes!("../fonts/DejaVuSans.ttf").to_vec(),
            BuiltinFont::Helvetica,
        )?,
        bold: FontData::new(
            include_bytes!("../fonts/DejaVuSans-Bold.ttf").to_vec(),
            BuiltinFont::HelveticaBold,
        )?,
        italic: FontData::new(
            include_bytes!("../fonts/DejaVuSans-Oblique.ttf").to_vec(),
            BuiltinFont::HelveticaOblique,
        )?,
        bold_italic: FontData::new(
            include_bytes!("../fonts/DejaVuSans-BoldOblique.ttf").to_vec(),
            BuiltinFont::HelveticaBoldOblique,
        )?,
    })
}

/// Loads a font family from the given directory, mapped to the Helvetica built-in fonts.
///
/// The directory must contain `<name>-Regular.ttf`, `<name>-Bold.ttf`, `<name>-Italic.ttf` and
/// `<name>-BoldItalic.ttf`.
pub fn from_files(
    dir: impl AsRef<path::Path>,
    name: &str,
) -> Result<FontFamily<FontData>, Error> {
    use printpdf::BuiltinFont;
    let dir = dir.as_ref();
    let load = |suffix: &str, builtin: printpdf::BuiltinFont| {
        FontData::load(dir.join(format!("{}-{}.ttf", name, suffix)), builtin)
    };
    Ok(FontFamily {
        regular: load("Regular", BuiltinFont::Helvetica)?,
        bold: load("Bold", BuiltinFont::HelveticaBold)?,
        italic: load("Italic", BuiltinFont::HelveticaOblique)?,
        bold_italic: load("BoldItalic", BuiltinFont::HelveticaBoldOblique)?,
    })
}

/// A reference to a font loaded into a [`FontCache`][].
///
/// [`FontCache`]: struct.FontCache.html
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    idx: usize,
    line_height: Mm,
    glyph_height: Mm,
    ascent: Mm,
}

impl Font {
    fn new(idx: usize, rt_font: &rusttype::Font<'static>) -> Font {
        let v_metrics = rt_font.v_metrics_unscaled();
        let units_per_em = f32::from(rt_font.units_per_em());
        let glyph_height = (v_metrics.ascent - v_metrics.descent) / units_per_em;
        let line_height = glyph_height + v_metrics.line_gap / units_per_em;
        let ascent = v_metrics.ascent / units_per_em;
        Font {
            idx,
            line_height: Mm(line_height * PT_TO_MM),
            glyph_height: Mm(glyph_height * PT_TO_MM),
            ascent: Mm(ascent * PT_TO_MM),
        }
    }

    /// Returns the metrics of this font for the given font size.
    pub fn metrics(&self, font_size: u8) -> Metrics {
        let font_size = f32::from(font_size);
        Metrics {
            glyph_height: self.glyph_height * font_size,
            line_height: self.line_height * font_size,
            ascent: self.ascent * font_size,
        }
    }

    /// Returns the width of the given character with this font and the given font size.
    pub fn char_width(&self, font_cache: &FontCache, c: char, font_size: u8) -> Mm {
        let font = font_cache.rt_font(*self);
        let scale = rusttype::Scale::uniform(f32::from(font_size));
        let width = font.glyph(c).scaled(scale).h_metrics().advance_width;
        Mm(width * PT_TO_MM)
    }

    /// Returns the width of the given string with this font and the given font size, including
    /// kerning.
    pub fn str_width(&self, font_cache: &FontCache, s: &str, font_size: u8) -> Mm {
        let font = font_cache.rt_font(*self);
        let scale = rusttype::Scale::uniform(f32::from(font_size));
        let mut width = 0.0;
        let mut last: Option<rusttype::GlyphId> = None;
        for c in s.chars() {
            let glyph = font.glyph(c).scaled(scale);
            if let Some(last) = last {
                width += font.pair_kerning(scale, last, glyph.id());
            }
            width += glyph.h_metrics().advance_width;
            last = Some(glyph.id());
        }
        Mm(width * PT_TO_MM)
    }
}

/// The metrics of a font at a given font size, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// The height of a glyph.
    pub glyph_height: Mm,
    /// The height of a line, including the line gap.
    pub line_height: Mm,
    /// The ascent above the baseline.
    pub ascent: Mm,
}

/// Stores the loaded [`Font`][] instances and their raw data.
///
/// [`Font`]: struct.Font.html
#[derive(Clone, Debug)]
pub struct FontCache {
    fonts: Vec<FontData>,
    default_family: FontFamily<Font>,
}

impl FontCache {
    /// Creates a new font cache with the given default font family.
    pub fn new(default_family: FontFamily<FontData>) -> FontCache {
        let mut fonts = Vec::new();
        let mut add = |data: FontData| {
            let font = Font::new(fonts.len(), &data.rt_font);
            fonts.push(data);
            font
        };
        let default_family = FontFamily {
            regular: add(default_family.regular),
            bold: add(default_family.bold),
            italic: add(default_family.italic),
            bold_italic: add(default_family.bold_italic),
        };
        FontCache {
            fonts,
            default_family,
        }
    }

    /// Returns the default font family of this cache.
    pub fn default_font_family(&self) -> FontFamily<Font> {
        self.default_family
    }

    /// Returns the built-in font to render the given font with.
    pub fn builtin_font(&self, font: Font) -> printpdf::BuiltinFont {
        self.fonts[font.idx].builtin
    }

    fn rt_font(&self, font: Font) -> &rusttype::Font<'static> {
        &self.fonts[font.idx].rt_font
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    fn cache() -> FontCache {
        FontCache::new(helvetica_family().expect("failed to load bundled fonts"))
    }

    #[test]
    fn test_metrics_scale_with_font_size() {
        let cache = cache();
        let font = cache.default_font_family().regular;
        let m10 = font.metrics(10);
        let m20 = font.metrics(20);
        assert!(m10.line_height.0 > 0.0);
        assert!(float_cmp::approx_eq!(
            f32,
            m20.line_height.0,
            m10.line_height.0 * 2.0,
            ulps = 4
        ));
        assert!(m10.ascent < m10.line_height);
    }

    #[test]
    fn test_str_width_monotonic() {
        let cache = cache();
        let font = cache.default_font_family().regular;
        let short = font.str_width(&cache, "abc", 12);
        let long = font.str_width(&cache, "abcdef", 12);
        assert!(long > short);
        assert_eq!(font.str_width(&cache, "", 12), Mm(0.0));
    }

    #[test]
    fn test_family_selection() {
        let cache = cache();
        let family = cache.default_font_family();
        assert_eq!(*family.get(Style::new()), family.regular);
        assert_eq!(*family.get(Style::new().bold()), family.bold);
        assert_eq!(*family.get(Style::new().italic()), family.italic);
        assert_eq!(*family.get(Style::new().bold().italic()), family.bold_italic);
        assert_eq!(
            cache.builtin_font(family.bold),
            printpdf::BuiltinFont::HelveticaBold
        );
    }
}
