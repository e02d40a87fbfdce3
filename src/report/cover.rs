//! The cover page.

#[cfg(feature = "images")]
use log::warn;

use crate::error::Error;
use crate::render::Renderer;
use crate::style::{Color, Style};
use crate::theme;
use crate::{Mm, Position, Size};

use super::{widgets, Ctx};

/// Draws the cover on the first page, using the given image if one was provided and a plain
/// institutional cover otherwise.
#[cfg(feature = "images")]
pub fn render(renderer: &mut Renderer, ctx: &Ctx<'_>, image: Option<&[u8]>) -> Result<(), Error> {
    if let Some(data) = image {
        match renderer.add_image(data) {
            Ok(image) => {
                let area = renderer.first_page().first_layer().area();
                area.draw_image(&image, Position::default(), Size::a4());
                return Ok(());
            }
            Err(err) => warn!("cover image unusable, falling back to plain cover: {}", err),
        }
    }
    fallback(renderer, ctx)
}

/// Draws the plain institutional cover on the first page.
#[cfg(not(feature = "images"))]
pub fn render(renderer: &mut Renderer, ctx: &Ctx<'_>) -> Result<(), Error> {
    fallback(renderer, ctx)
}

fn fallback(renderer: &mut Renderer, ctx: &Ctx<'_>) -> Result<(), Error> {
    let area = renderer.first_page().first_layer().area();
    area.fill_rect(Position::default(), Size::a4(), theme::PRIMARY);

    let white = Color::rgb(255, 255, 255);
    let center = Size::a4().width * 0.5;

    widgets::print_centered(
        &area,
        ctx.font_cache,
        center,
        Mm(120.0),
        Style::new().bold().with_font_size(28).with_color(white),
        "INFORME ESTRATÉGICO",
    )?;
    widgets::print_centered(
        &area,
        ctx.font_cache,
        center,
        Mm(135.0),
        Style::new().with_font_size(16).with_color(white),
        "Plan de Desarrollo Institucional",
    )?;
    widgets::print_centered(
        &area,
        ctx.font_cache,
        center,
        Mm(155.0),
        Style::new().bold().with_font_size(14).with_color(white),
        &format!("Período 2021-{}", ctx.summary.year),
    )?;
    Ok(())
}
