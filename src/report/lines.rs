//! One page per strategic line: color band header, large progress bar, indicator table and the
//! per-line analysis box.

use crate::error::Error;
use crate::metrics::LineSummary;
use crate::model::IndicatorRecord;
use crate::render::{Area, Renderer};
use crate::style::{Color, Style};
use crate::theme;
use crate::{Mm, Position, Size};

use super::{add_content_page, widgets, Ctx, MARGIN, PAGE_BREAK_Y};

pub fn render(renderer: &mut Renderer, ctx: &Ctx<'_>) -> Result<(), Error> {
    let rows = ctx.dataset.progress(Some(ctx.summary.year));
    for line in ctx.lines {
        let indicators: Vec<&IndicatorRecord> = rows
            .iter()
            .filter(|r| r.line == line.line)
            .copied()
            .collect();
        render_line(renderer, ctx, line, &indicators)?;
    }
    Ok(())
}

fn render_line(
    renderer: &mut Renderer,
    ctx: &Ctx<'_>,
    line: &LineSummary,
    indicators: &[&IndicatorRecord],
) -> Result<(), Error> {
    add_content_page(renderer, ctx)?;
    let area = renderer.last_page().first_layer().area();
    let color = theme::line_color(&line.line);
    let white = Color::rgb(255, 255, 255);
    let center = Size::a4().width * 0.5;

    // Full-width color band with the line name and its compliance.
    let band_top = Mm(14.0);
    area.fill_rect(
        Position::new(Mm(0.0), band_top),
        Size::new(Size::a4().width, Mm(25.0)),
        color,
    );
    widgets::print_centered(
        &area,
        ctx.font_cache,
        center,
        band_top + Mm(5.0),
        Style::new().bold().with_font_size(16).with_color(white),
        &line.line,
    )?;
    widgets::print_centered(
        &area,
        ctx.font_cache,
        center,
        band_top + Mm(14.0),
        Style::new().with_font_size(10).with_color(white),
        &format!("Cumplimiento: {:.1}%", line.compliance),
    )?;

    let mut y = band_top + Mm(30.0);
    widgets::progress_bar(
        &area,
        ctx.font_cache,
        Position::new(Mm(20.0), y),
        Size::new(Mm(170.0), Mm(12.0)),
        Some(line.compliance),
        true,
    )?;
    y += Mm(20.0);

    widgets::print_text(
        &area,
        ctx.font_cache,
        Position::new(MARGIN, y),
        Style::new().bold().with_font_size(10).with_color(color),
        "Indicadores",
    )?;
    y += Mm(8.0);

    let mut remaining = indicators;
    let mut drawn_last;
    loop {
        let area = renderer.last_page().first_layer().area();
        drawn_last = indicator_table(&area, ctx, y, color, remaining)?;
        remaining = &remaining[drawn_last..];
        if remaining.is_empty() {
            break;
        }
        add_content_page(renderer, ctx)?;
        y = super::CONTENT_TOP;
    }
    y += Mm(7.0) + Mm(6.0) * drawn_last as f32 + Mm(8.0);

    if let Some(text) = ctx.analysis.lines.get(&line.line) {
        // Heading plus box must fit above the footer, otherwise they continue on a new page.
        let needed =
            Mm(8.0) + widgets::analysis_box_height(ctx.font_cache, ctx.content_width(), text);
        if y + needed > PAGE_BREAK_Y {
            add_content_page(renderer, ctx)?;
            y = super::CONTENT_TOP;
        }
        let area = renderer.last_page().first_layer().area();
        widgets::print_text(
            &area,
            ctx.font_cache,
            Position::new(MARGIN, y),
            Style::new().bold().with_font_size(10).with_color(color),
            "Análisis Estratégico",
        )?;
        y += Mm(8.0);
        widgets::analysis_box(
            &area,
            ctx.font_cache,
            Position::new(MARGIN, y),
            ctx.content_width(),
            theme::CARD_BG,
            color,
            text,
        )?;
    }
    Ok(())
}

/// Draws the indicator table header and as many rows as fit on the page.
///
/// Returns the number of rows drawn.
fn indicator_table(
    area: &Area<'_>,
    ctx: &Ctx<'_>,
    y: Mm,
    color: Color,
    rows: &[&IndicatorRecord],
) -> Result<usize, Error> {
    let name_width = Mm(110.0);
    let value_width = Mm(30.0);
    let bar_width = Mm(50.0);
    let header_height = Mm(7.0);
    let row_height = Mm(6.0);
    let white = Color::rgb(255, 255, 255);
    let mut y = y;

    area.fill_rect(
        Position::new(MARGIN, y),
        Size::new(name_width + value_width + bar_width, header_height),
        color,
    );
    let header_style = Style::new().bold().with_font_size(8).with_color(white);
    widgets::print_text(
        area,
        ctx.font_cache,
        Position::new(MARGIN + Mm(2.0), y + Mm(1.5)),
        header_style,
        "Indicador",
    )?;
    widgets::print_centered(
        area,
        ctx.font_cache,
        MARGIN + name_width + value_width * 0.5,
        y + Mm(1.5),
        header_style,
        "Cumplimiento",
    )?;
    widgets::print_centered(
        area,
        ctx.font_cache,
        MARGIN + name_width + value_width + bar_width * 0.5,
        y + Mm(1.5),
        header_style,
        "Progreso",
    )?;
    y += header_height;

    let mut drawn = 0;
    for (idx, record) in rows.iter().enumerate() {
        if y + row_height > PAGE_BREAK_Y {
            break;
        }
        if idx % 2 == 1 {
            area.fill_rect(
                Position::new(MARGIN, y),
                Size::new(name_width + value_width + bar_width, row_height),
                theme::CARD_BG,
            );
        }
        widgets::print_text(
            area,
            ctx.font_cache,
            Position::new(MARGIN + Mm(2.0), y + Mm(1.5)),
            Style::new().with_font_size(7).with_color(theme::DARK),
            truncate(&record.indicator, 65),
        )?;
        let compliance = record.compliance;
        widgets::print_centered(
            area,
            ctx.font_cache,
            MARGIN + name_width + value_width * 0.5,
            y + Mm(1.5),
            Style::new()
                .bold()
                .with_font_size(7)
                .with_color(theme::compliance_color(compliance)),
            &widgets::format_compliance(compliance),
        )?;
        widgets::progress_bar(
            area,
            ctx.font_cache,
            Position::new(MARGIN + name_width + value_width + Mm(2.0), y + Mm(1.5)),
            Size::new(bar_width - Mm(4.0), Mm(3.0)),
            compliance,
            false,
        )?;
        y += row_height;
        drawn += 1;
    }
    Ok(drawn)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
