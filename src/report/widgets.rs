//! Drawing primitives shared by the report pages: progress bars, metric cards, wrapped
//! paragraphs and the traffic-light legend.

use crate::error::Error;
use crate::fonts::FontCache;
use crate::render::{sanitize_text, Area};
use crate::style::{Color, LineStyle, Style};
use crate::theme;
use crate::{Mm, Position, Size};

/// Prints a single line of text at the given position.
pub fn print_text(
    area: &Area<'_>,
    font_cache: &FontCache,
    position: Position,
    style: Style,
    text: &str,
) -> Result<(), Error> {
    area.print_str(font_cache, position, style, sanitize_text(text))?;
    Ok(())
}

/// Prints a single line of text centered around the given x position.
pub fn print_centered(
    area: &Area<'_>,
    font_cache: &FontCache,
    center_x: Mm,
    y: Mm,
    style: Style,
    text: &str,
) -> Result<(), Error> {
    let text = sanitize_text(text);
    let width = style.text_width(font_cache, &text);
    area.print_str(font_cache, Position::new(center_x - width * 0.5, y), style, text)?;
    Ok(())
}

/// Prints a single line of text with its right edge at the given x position.
pub fn print_right(
    area: &Area<'_>,
    font_cache: &FontCache,
    right_x: Mm,
    y: Mm,
    style: Style,
    text: &str,
) -> Result<(), Error> {
    let text = sanitize_text(text);
    let width = style.text_width(font_cache, &text);
    area.print_str(font_cache, Position::new(right_x - width, y), style, text)?;
    Ok(())
}

/// Breaks the given text into lines that fit into the given width.
pub fn wrap_text(font_cache: &FontCache, style: Style, width: Mm, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if style.text_width(font_cache, &candidate) <= width || line.is_empty() {
                line = candidate;
            } else {
                lines.push(line);
                line = word.to_string();
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// Prints a wrapped paragraph and returns the height it occupied.
pub fn print_paragraph(
    area: &Area<'_>,
    font_cache: &FontCache,
    position: Position,
    width: Mm,
    line_height: Mm,
    style: Style,
    text: &str,
) -> Result<Mm, Error> {
    let text = sanitize_text(text);
    let lines = wrap_text(font_cache, style, width, &text);
    let mut y = position.y;
    for line in &lines {
        area.print_str(font_cache, Position::new(position.x, y), style, line)?;
        y += line_height;
    }
    Ok(y - position.y)
}

/// Draws a horizontal progress bar with a light trough and a status-colored fill.
///
/// The fill width is proportional to the compliance percentage and clamped at 100%.  If
/// `show_text` is set, the percentage is printed in white in the center of the bar.
pub fn progress_bar(
    area: &Area<'_>,
    font_cache: &FontCache,
    position: Position,
    size: Size,
    compliance: Option<f32>,
    show_text: bool,
) -> Result<(), Error> {
    let radius = size.height * 0.5;
    area.fill_rounded_rect(position, size, radius, theme::LIGHT_GRAY);

    let value = compliance.filter(|c| c.is_finite()).unwrap_or(0.0);
    if value > 0.0 {
        let fill_width = (size.width * (value / 100.0)).min(size.width);
        area.fill_rounded_rect(
            position,
            Size::new(fill_width, size.height),
            radius,
            theme::compliance_color(compliance),
        );
    }

    if show_text && value > 0.0 {
        let style = Style::new()
            .bold()
            .with_font_size(7)
            .with_color(Color::rgb(255, 255, 255));
        let text = format!("{:.1}%", value);
        let text_y = position.y + (size.height - style.line_height(font_cache)) * 0.5;
        print_centered(
            area,
            font_cache,
            position.x + size.width * 0.5,
            text_y,
            style,
            &text,
        )?;
    }
    Ok(())
}

/// Draws a small metric card: a rounded rectangle with a drop shadow, a large value and a label.
#[allow(clippy::too_many_arguments)]
pub fn metric_card(
    area: &Area<'_>,
    font_cache: &FontCache,
    position: Position,
    size: Size,
    value: &str,
    label: &str,
    accent: Color,
    outlined: bool,
) -> Result<(), Error> {
    card_shadow(area, position, size, Mm(6.0));
    area.fill_rounded_rect(position, size, Mm(6.0), theme::CARD_BG);
    if outlined {
        area.stroke_rect(position, size, LineStyle::new(accent, Mm(0.8)));
    }

    let value_style = Style::new().bold().with_font_size(20).with_color(accent);
    print_centered(
        area,
        font_cache,
        position.x + size.width * 0.5,
        position.y + Mm(5.0),
        value_style,
        value,
    )?;

    let label_style = Style::new().with_font_size(7).with_color(theme::DARK);
    print_centered(
        area,
        font_cache,
        position.x + size.width * 0.5,
        position.y + Mm(15.0),
        label_style,
        label,
    )?;
    Ok(())
}

/// Draws the drop shadow of a card.
pub fn card_shadow(area: &Area<'_>, position: Position, size: Size, radius: Mm) {
    area.fill_rounded_rect(
        Position::new(position.x + Mm(2.0), position.y + Mm(2.0)),
        size,
        radius,
        Color::greyscale(190),
    );
}

/// Returns the height an analysis box of the given width will occupy for the given text.
pub fn analysis_box_height(font_cache: &FontCache, width: Mm, text: &str) -> Mm {
    let style = Style::new().with_font_size(8).with_color(theme::DARK);
    let lines = wrap_text(font_cache, style, width - Mm(14.0), &sanitize_text(text));
    Mm(10.0) + Mm(4.0) * lines.len() as f32
}

/// Draws a narrative analysis box: a light rounded background with a colored side bar.
///
/// Returns the height of the box, as [`analysis_box_height`] computes it.
#[allow(clippy::too_many_arguments)]
pub fn analysis_box(
    area: &Area<'_>,
    font_cache: &FontCache,
    position: Position,
    width: Mm,
    background: Color,
    accent: Color,
    text: &str,
) -> Result<Mm, Error> {
    let style = Style::new().with_font_size(8).with_color(theme::DARK);
    let line_height = Mm(4.0);
    let text = sanitize_text(text);
    let text_width = width - Mm(14.0);
    let lines = wrap_text(font_cache, style, text_width, &text);
    let height = Mm(10.0) + line_height * lines.len() as f32;

    area.fill_rounded_rect(position, Size::new(width, height), Mm(6.0), background);
    area.fill_rect(position, Size::new(Mm(3.0), height), accent);

    let mut y = position.y + Mm(5.0);
    for line in &lines {
        area.print_str(font_cache, Position::new(position.x + Mm(8.0), y), style, line)?;
        y += line_height;
    }
    Ok(height)
}

/// Draws the traffic-light legend at the given position.
pub fn legend(area: &Area<'_>, font_cache: &FontCache, y: Mm) -> Result<(), Error> {
    let entries = [
        (theme::STATUS_MET, ">= 100% Meta Cumplida", Mm(12.0)),
        (theme::STATUS_IN_PROGRESS, "80-99% En Progreso", Mm(62.0)),
        (theme::STATUS_AT_RISK, "< 80% Requiere Atención", Mm(112.0)),
    ];
    let style = Style::new().bold().with_font_size(7).with_color(theme::GRAY);
    for (color, text, x) in entries {
        area.fill_dot(Position::new(x, y + Mm(2.0)), Mm(1.5), color);
        print_text(area, font_cache, Position::new(x + Mm(3.0), y), style, text)?;
    }
    Ok(())
}

/// Formats a compliance value for display, using `N/D` for missing data.
pub fn format_compliance(compliance: Option<f32>) -> String {
    match compliance.filter(|c| c.is_finite()) {
        Some(c) => format!("{:.1}%", c),
        None => "N/D".to_string(),
    }
}

/// Formats a numeric cell value, using `N/D` for missing data.
pub fn format_value(value: Option<f32>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.1}", v),
        None => "N/D".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{helvetica_family, FontCache};

    fn cache() -> FontCache {
        FontCache::new(helvetica_family().unwrap())
    }

    #[test]
    fn test_wrap_text_fits_width() {
        let cache = cache();
        let style = Style::new().with_font_size(9);
        let width = Mm(60.0);
        let text = "La línea de Expansión alcanzó un cumplimiento sobresaliente durante el período evaluado.";
        let lines = wrap_text(&cache, style, width, text);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(style.text_width(&cache, line) <= width);
        }
    }

    #[test]
    fn test_wrap_text_keeps_long_words() {
        let cache = cache();
        let style = Style::new().with_font_size(9);
        let lines = wrap_text(&cache, style, Mm(5.0), "extraordinariamente corto");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "extraordinariamente");
    }

    #[test]
    fn test_wrap_text_skips_blank_paragraphs() {
        let cache = cache();
        let style = Style::new().with_font_size(9);
        let lines = wrap_text(&cache, style, Mm(100.0), "uno\n\n\ndos");
        assert_eq!(lines, vec!["uno".to_string(), "dos".to_string()]);
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_compliance(Some(97.14)), "97.1%");
        assert_eq!(format_compliance(None), "N/D");
        assert_eq!(format_compliance(Some(f32::NAN)), "N/D");
        assert_eq!(format_value(Some(4.25)), "4.2");
        assert_eq!(format_value(None), "N/D");
    }
}
