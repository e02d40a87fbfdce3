//! The color palette of the institutional report.

use once_cell::sync::Lazy;

use crate::style::Color;

/// Institutional navy, used for headings and the cover.
pub const PRIMARY: Color = Color::rgb(0x0a, 0x22, 0x40);
/// Accent blue for progress bars and links.
pub const ACCENT: Color = Color::rgb(0x1e, 0x88, 0xe5);
/// Background of summary cards and table headers.
pub const CARD_BG: Color = Color::rgb(0xf5, 0xf7, 0xfa);
/// Main body text color.
pub const DARK: Color = Color::rgb(0x21, 0x25, 0x29);
/// Secondary text color.
pub const GRAY: Color = Color::rgb(0x6c, 0x75, 0x7d);
/// Table borders and bar troughs.
pub const LIGHT_GRAY: Color = Color::rgb(0xe0, 0xe0, 0xe0);

/// Green for indicators that met their target.
pub const STATUS_MET: Color = Color::rgb(0x2e, 0x7d, 0x32);
/// Amber for indicators in progress.
pub const STATUS_IN_PROGRESS: Color = Color::rgb(0xf5, 0x7f, 0x17);
/// Red for indicators at risk.
pub const STATUS_AT_RISK: Color = Color::rgb(0xc6, 0x28, 0x28);
/// Gray for indicators without data.
pub const STATUS_NO_DATA: Color = GRAY;

/// The fixed colors of the known strategic lines, keyed by folded name.
static LINE_COLORS: Lazy<Vec<(&'static str, Color)>> = Lazy::new(|| {
    vec![
        ("expansion", Color::rgb(0xfb, 0xaf, 0x17)),
        ("transformacion organizacional", Color::rgb(0x42, 0xf2, 0xf2)),
        ("calidad", Color::rgb(0xec, 0x06, 0x77)),
        ("experiencia", Color::rgb(0x1f, 0xb2, 0xde)),
        ("sostenibilidad", Color::rgb(0xa6, 0xce, 0x38)),
        ("educacion para toda la vida", Color::rgb(0x0f, 0x38, 0x5a)),
    ]
});

/// Fallback colors for strategic lines without a fixed assignment.
static FALLBACK_COLORS: Lazy<Vec<Color>> = Lazy::new(|| {
    vec![
        ACCENT,
        Color::rgb(0x8e, 0x24, 0xaa),
        Color::rgb(0x00, 0x89, 0x7b),
        Color::rgb(0xef, 0x6c, 0x00),
        Color::rgb(0x5d, 0x40, 0x37),
    ]
});

/// Returns the color assigned to the given strategic line.
///
/// Known lines have fixed institutional colors; matching ignores case and accents, so datasets
/// with unaccented spellings still hit them.  Unknown lines get a stable fallback color derived
/// from the line name, so the same line keeps its color across pages.
pub fn line_color(name: &str) -> Color {
    let normalized = fold_name(name);
    for (line, color) in LINE_COLORS.iter() {
        if normalized == *line {
            return *color;
        }
    }
    let hash: usize = normalized.bytes().map(usize::from).sum();
    FALLBACK_COLORS[hash % FALLBACK_COLORS.len()]
}

/// Lowercases the name and strips the Spanish accents.
fn fold_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            c => c,
        })
        .collect()
}

/// Returns the status color for the given compliance percentage, or the no-data color.
pub fn compliance_color(compliance: Option<f32>) -> Color {
    match compliance {
        Some(c) if !c.is_finite() => STATUS_NO_DATA,
        Some(c) if c >= 100.0 => STATUS_MET,
        Some(c) if c >= 80.0 => STATUS_IN_PROGRESS,
        Some(_) => STATUS_AT_RISK,
        None => STATUS_NO_DATA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_line_colors() {
        assert_eq!(line_color("Expansión"), Color::rgb(0xfb, 0xaf, 0x17));
        assert_eq!(line_color("  calidad "), Color::rgb(0xec, 0x06, 0x77));
        assert_eq!(
            line_color("Educación para toda la vida"),
            Color::rgb(0x0f, 0x38, 0x5a)
        );
    }

    #[test]
    fn test_line_colors_ignore_accents() {
        assert_eq!(line_color("Expansion"), line_color("Expansión"));
        assert_eq!(
            line_color("Transformacion Organizacional"),
            Color::rgb(0x42, 0xf2, 0xf2)
        );
        assert_eq!(
            line_color("Educacion para toda la vida"),
            Color::rgb(0x0f, 0x38, 0x5a)
        );
    }

    #[test]
    fn test_unknown_line_color_is_stable() {
        let a = line_color("Internacionalización");
        let b = line_color("Internacionalización");
        assert_eq!(a, b);
    }

    #[test]
    fn test_compliance_colors() {
        assert_eq!(compliance_color(Some(120.0)), STATUS_MET);
        assert_eq!(compliance_color(Some(100.0)), STATUS_MET);
        assert_eq!(compliance_color(Some(99.9)), STATUS_IN_PROGRESS);
        assert_eq!(compliance_color(Some(80.0)), STATUS_IN_PROGRESS);
        assert_eq!(compliance_color(Some(79.9)), STATUS_AT_RISK);
        assert_eq!(compliance_color(None), STATUS_NO_DATA);
        assert_eq!(compliance_color(Some(f32::NAN)), STATUS_NO_DATA);
        assert_eq!(compliance_color(Some(f32::INFINITY)), STATUS_NO_DATA);
    }
}
