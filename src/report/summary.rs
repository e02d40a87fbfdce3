//! The executive summary page: KPI cards, the global progress bar, the per-line heatmap table
//! and the executive analysis box.

use crate::error::Error;
use crate::model::Status;
use crate::render::{Area, Renderer};
use crate::style::{Color, Style};
use crate::theme;
use crate::{Mm, Position, Size};

use super::{add_content_page, section_title, widgets, Ctx, CONTENT_TOP, MARGIN};

pub fn render(renderer: &mut Renderer, ctx: &Ctx<'_>) -> Result<(), Error> {
    add_content_page(renderer, ctx)?;
    let area = renderer.last_page().first_layer().area();

    let mut y = section_title(&area, ctx, CONTENT_TOP, "Resumen Ejecutivo")?;
    y = subtitle(&area, ctx, y, "INDICADORES CLAVE DE DESEMPEÑO")?;
    y = kpi_cards(&area, ctx, y)?;

    y = subtitle(&area, ctx, y, "PROGRESO GLOBAL DEL PDI")?;
    widgets::progress_bar(
        &area,
        ctx.font_cache,
        Position::new(MARGIN, y),
        Size::new(ctx.content_width(), Mm(10.0)),
        Some(ctx.summary.average),
        true,
    )?;
    y += Mm(16.0);

    y = subtitle(&area, ctx, y, "CUMPLIMIENTO POR LÍNEA ESTRATÉGICA")?;
    y = heatmap_table(&area, ctx, y)?;
    y += Mm(5.0);

    if let Some(text) = &ctx.analysis.executive {
        y = subtitle(&area, ctx, y, "ANÁLISIS EJECUTIVO")?;
        let height = widgets::analysis_box(
            &area,
            ctx.font_cache,
            Position::new(MARGIN, y),
            ctx.content_width(),
            Color::rgb(0xe3, 0xf2, 0xfd),
            theme::ACCENT,
            text,
        )?;
        y += height + Mm(5.0);
    }

    widgets::legend(&area, ctx.font_cache, y)?;
    Ok(())
}

fn subtitle(area: &Area<'_>, ctx: &Ctx<'_>, y: Mm, text: &str) -> Result<Mm, Error> {
    let style = Style::new()
        .bold()
        .with_font_size(9)
        .with_color(theme::ACCENT);
    widgets::print_text(area, ctx.font_cache, Position::new(MARGIN, y), style, text)?;
    Ok(y + Mm(8.0))
}

/// Draws the large global compliance card and the four small count cards.
fn kpi_cards(area: &Area<'_>, ctx: &Ctx<'_>, y: Mm) -> Result<Mm, Error> {
    let summary = ctx.summary;
    let white = Color::rgb(255, 255, 255);

    // Large card, colored by the global status.
    let card_size = Size::new(Mm(60.0), Mm(50.0));
    let card_pos = Position::new(MARGIN, y);
    let card_color = theme::compliance_color(Some(summary.average));
    widgets::card_shadow(area, card_pos, card_size, Mm(8.0));
    area.fill_rounded_rect(card_pos, card_size, Mm(8.0), card_color);

    let center_x = card_pos.x + card_size.width * 0.5;
    widgets::print_centered(
        area,
        ctx.font_cache,
        center_x,
        y + Mm(8.0),
        Style::new().bold().with_font_size(8).with_color(white),
        "CUMPLIMIENTO GLOBAL",
    )?;
    widgets::print_centered(
        area,
        ctx.font_cache,
        center_x,
        y + Mm(18.0),
        Style::new().bold().with_font_size(32).with_color(white),
        &format!("{:.1}%", summary.average),
    )?;
    let status = Status::from_compliance(Some(summary.average));
    widgets::print_centered(
        area,
        ctx.font_cache,
        center_x,
        y + Mm(37.0),
        Style::new().with_font_size(7).with_color(white),
        &status.label().to_uppercase(),
    )?;

    // Small cards: met, in progress, not met, total.
    let small_size = Size::new(Mm(38.0), Mm(24.0));
    let start_x = Mm(75.0);
    let cards = [
        (summary.met, "CUMPLIDOS", theme::STATUS_MET, true),
        (summary.in_progress, "EN PROGRESO", theme::STATUS_IN_PROGRESS, true),
        (summary.not_met, "NO CUMPLIDOS", theme::STATUS_AT_RISK, true),
        (summary.total_indicators, "TOTAL", theme::PRIMARY, false),
    ];
    for (i, (value, label, accent, outlined)) in cards.iter().enumerate() {
        let col = i % 3;
        let row = i / 3;
        let pos = Position::new(
            start_x + Mm(42.0) * col as f32,
            y + Mm(27.0) * row as f32,
        );
        widgets::metric_card(
            area,
            ctx.font_cache,
            pos,
            small_size,
            &value.to_string(),
            label,
            *accent,
            *outlined,
        )?;
    }

    Ok(y + card_size.height + Mm(10.0))
}

/// Draws the per-line heatmap table: line dot and name, compliance and a mini progress bar.
fn heatmap_table(area: &Area<'_>, ctx: &Ctx<'_>, y: Mm) -> Result<Mm, Error> {
    let name_width = Mm(90.0);
    let value_width = Mm(35.0);
    let bar_width = Mm(65.0);
    let row_height = Mm(8.0);
    let mut y = y;

    // Header.
    area.fill_rect(
        Position::new(MARGIN, y),
        Size::new(name_width + value_width + bar_width, row_height),
        theme::PRIMARY,
    );
    let header_style = Style::new()
        .bold()
        .with_font_size(8)
        .with_color(Color::rgb(255, 255, 255));
    widgets::print_text(
        area,
        ctx.font_cache,
        Position::new(MARGIN + Mm(6.0), y + Mm(2.0)),
        header_style,
        "Línea Estratégica",
    )?;
    widgets::print_centered(
        area,
        ctx.font_cache,
        MARGIN + name_width + value_width * 0.5,
        y + Mm(2.0),
        header_style,
        "Cumplimiento",
    )?;
    widgets::print_centered(
        area,
        ctx.font_cache,
        MARGIN + name_width + value_width + bar_width * 0.5,
        y + Mm(2.0),
        header_style,
        "Progreso Visual",
    )?;
    y += row_height;

    // Keep the table above the legend and analysis box instead of running off the page.
    let max_y = Mm(240.0);
    for (idx, line) in ctx.lines.iter().enumerate() {
        if y + row_height > max_y {
            let rest = ctx.lines.len() - idx;
            widgets::print_text(
                area,
                ctx.font_cache,
                Position::new(MARGIN + Mm(6.0), y + Mm(1.0)),
                Style::new().italic().with_font_size(7).with_color(theme::GRAY),
                &format!("... y {} líneas más (ver detalle de indicadores)", rest),
            )?;
            y += row_height;
            break;
        }
        if idx % 2 == 1 {
            area.fill_rect(
                Position::new(MARGIN, y),
                Size::new(name_width + value_width + bar_width, row_height),
                theme::CARD_BG,
            );
        }

        // Line color dot and name.
        area.fill_dot(
            Position::new(MARGIN + Mm(3.0), y + row_height * 0.5),
            Mm(1.5),
            theme::line_color(&line.line),
        );
        widgets::print_text(
            area,
            ctx.font_cache,
            Position::new(MARGIN + Mm(6.0), y + Mm(2.0)),
            Style::new().with_font_size(8).with_color(theme::DARK),
            &line.line,
        )?;

        // Compliance, colored by status.
        let compliance = Some(line.compliance);
        widgets::print_centered(
            area,
            ctx.font_cache,
            MARGIN + name_width + value_width * 0.5,
            y + Mm(2.0),
            Style::new()
                .bold()
                .with_font_size(8)
                .with_color(theme::compliance_color(compliance)),
            &widgets::format_compliance(compliance),
        )?;

        widgets::progress_bar(
            area,
            ctx.font_cache,
            Position::new(MARGIN + name_width + value_width + Mm(2.0), y + Mm(2.0)),
            Size::new(bar_width - Mm(4.0), Mm(4.0)),
            compliance,
            false,
        )?;
        y += row_height;
    }
    Ok(y)
}
