//! The table of contents page.

use crate::error::{Error, ErrorKind};
use crate::render::Renderer;
use crate::style::{Color, LineStyle, Style};
use crate::theme;
use crate::{Mm, Position, Size};

use super::{page_chrome, section_title, widgets, Ctx, MARGIN};

/// Fills the reserved contents page with the section list and their page numbers.
///
/// This runs after all other pages have been rendered, so the page numbers in `entries` are the
/// ones the sections actually landed on.
pub fn render(
    renderer: &Renderer,
    page_idx: usize,
    ctx: &Ctx<'_>,
    entries: &[(String, usize)],
) -> Result<(), Error> {
    let page = renderer.get_page(page_idx).ok_or_else(|| {
        Error::new("Missing reserved contents page", ErrorKind::Internal)
    })?;
    let area = page.first_layer().area();
    page_chrome(&area, ctx, page_idx + 1)?;

    let mut y = section_title(&area, ctx, super::CONTENT_TOP, "Tabla de Contenidos")?;
    y += Mm(4.0);

    let name_width = Mm(150.0);
    let page_width = Mm(40.0);
    let row_height = Mm(9.0);
    let table_width = name_width + page_width;

    // Header row.
    area.fill_rect(Position::new(MARGIN, y), Size::new(table_width, row_height), theme::PRIMARY);
    let header_style = Style::new()
        .bold()
        .with_font_size(10)
        .with_color(Color::rgb(255, 255, 255));
    widgets::print_text(
        &area,
        ctx.font_cache,
        Position::new(MARGIN + Mm(3.0), y + Mm(2.0)),
        header_style,
        "Sección",
    )?;
    widgets::print_right(
        &area,
        ctx.font_cache,
        MARGIN + table_width - Mm(3.0),
        y + Mm(2.0),
        header_style,
        "Página",
    )?;
    y += row_height;
    area.draw_line(
        vec![Position::new(MARGIN, y), Position::new(MARGIN + table_width, y)],
        LineStyle::new(theme::ACCENT, Mm(0.6)),
    );

    let grid = LineStyle::new(theme::LIGHT_GRAY, Mm(0.2));
    let name_style = Style::new().with_font_size(10).with_color(theme::DARK);
    let page_style = Style::new().with_font_size(10).with_color(theme::GRAY);
    for (name, page_no) in entries {
        widgets::print_text(
            &area,
            ctx.font_cache,
            Position::new(MARGIN + Mm(3.0), y + Mm(2.0)),
            name_style,
            name,
        )?;
        widgets::print_right(
            &area,
            ctx.font_cache,
            MARGIN + table_width - Mm(3.0),
            y + Mm(2.0),
            page_style,
            &page_no.to_string(),
        )?;
        y += row_height;
        area.draw_line(
            vec![Position::new(MARGIN, y), Position::new(MARGIN + table_width, y)],
            grid,
        );
    }
    Ok(())
}
