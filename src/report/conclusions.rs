//! The closing page: top and bottom strategic lines, the glossary of acronyms and the final
//! footer.

use crate::error::Error;
use crate::render::{Area, Renderer};
use crate::style::{LineStyle, Style};
use crate::theme;
use crate::{Mm, Position};

use super::{add_content_page, section_title, widgets, Ctx, CONTENT_TOP, MARGIN};

/// The glossary of acronyms used in the indicator names.
const GLOSSARY: &[(&str, &str)] = &[
    ("PDI", "Plan de Desarrollo Institucional"),
    ("KPI", "Key Performance Indicator (Indicador Clave de Desempeño)"),
    ("B2B", "Business to Business (Negocio a Negocio)"),
    ("B2G", "Business to Government (Negocio a Gobierno)"),
    ("SSI", "Sistema de Soporte Institucional"),
    ("NPS", "Net Promoter Score (Índice de Satisfacción)"),
    ("EBITDA", "Earnings Before Interest, Taxes, Depreciation and Amortization"),
    ("ANS", "Acuerdo de Nivel de Servicio"),
    ("IA", "Inteligencia Artificial"),
];

pub fn render(renderer: &mut Renderer, ctx: &Ctx<'_>) -> Result<(), Error> {
    add_content_page(renderer, ctx)?;
    let area = renderer.last_page().first_layer().area();

    let mut y = section_title(&area, ctx, CONTENT_TOP, "Conclusiones Ejecutivas")?;
    y += Mm(3.0);

    // Top three lines of the period.
    y = heading(&area, ctx, y, theme::STATUS_MET, "Mejores Logros del Período")?;
    let body = Style::new().with_font_size(9).with_color(theme::DARK);
    for (i, line) in ctx.lines.iter().take(3).enumerate() {
        let text = format!(
            "{}. {}: {:.1}% de cumplimiento, superando la meta establecida para el período.",
            i + 1,
            line.line,
            line.compliance
        );
        let height = widgets::print_paragraph(
            &area,
            ctx.font_cache,
            Position::new(MARGIN + Mm(2.0), y),
            ctx.content_width() - Mm(4.0),
            Mm(5.0),
            body,
            &text,
        )?;
        y += height + Mm(2.0);
    }
    y += Mm(4.0);

    // The two weakest lines.
    y = heading(
        &area,
        ctx,
        y,
        theme::STATUS_AT_RISK,
        "Aspectos Críticos para el Próximo Ciclo",
    )?;
    for (i, line) in ctx.lines.iter().rev().take(2).enumerate() {
        let advice = if line.compliance < 100.0 {
            "requiere atención prioritaria y plan de acción correctivo."
        } else {
            "mantener el monitoreo para asegurar sostenibilidad."
        };
        let text = format!(
            "{}. {}: {:.1}% de cumplimiento, {}",
            i + 1,
            line.line,
            line.compliance,
            advice
        );
        let height = widgets::print_paragraph(
            &area,
            ctx.font_cache,
            Position::new(MARGIN + Mm(2.0), y),
            ctx.content_width() - Mm(4.0),
            Mm(5.0),
            body,
            &text,
        )?;
        y += height + Mm(2.0);
    }
    y += Mm(8.0);

    y = glossary(&area, ctx, y)?;
    y += Mm(10.0);

    // Closing footer.
    let footer_style = Style::new()
        .italic()
        .with_font_size(8)
        .with_color(theme::GRAY);
    area.draw_line(
        vec![
            Position::new(MARGIN + Mm(20.0), y),
            Position::new(MARGIN + ctx.content_width() - Mm(20.0), y),
        ],
        LineStyle::new(theme::LIGHT_GRAY, Mm(0.3)),
    );
    y += Mm(4.0);
    let center = MARGIN + ctx.content_width() * 0.5;
    widgets::print_centered(
        &area,
        ctx.font_cache,
        center,
        y,
        footer_style,
        "Generado automáticamente por el Sistema de Monitoreo PDI",
    )?;
    widgets::print_centered(
        &area,
        ctx.font_cache,
        center,
        y + Mm(5.0),
        footer_style,
        "Politécnico Grancolombiano - Institución Universitaria",
    )?;
    Ok(())
}

fn heading(
    area: &Area<'_>,
    ctx: &Ctx<'_>,
    y: Mm,
    color: crate::style::Color,
    text: &str,
) -> Result<Mm, Error> {
    area.fill_dot(Position::new(MARGIN + Mm(1.5), y + Mm(2.5)), Mm(1.5), color);
    widgets::print_text(
        area,
        ctx.font_cache,
        Position::new(MARGIN + Mm(5.0), y),
        Style::new().bold().with_font_size(11).with_color(color),
        text,
    )?;
    Ok(y + Mm(8.0))
}

/// Draws the glossary in two columns and returns the new vertical position.
fn glossary(area: &Area<'_>, ctx: &Ctx<'_>, y: Mm) -> Result<Mm, Error> {
    let mut y = y;
    widgets::print_text(
        area,
        ctx.font_cache,
        Position::new(MARGIN, y),
        Style::new()
            .bold()
            .with_font_size(12)
            .with_color(theme::PRIMARY),
        "Glosario de Siglas",
    )?;
    y += Mm(8.0);

    let acronym_style = Style::new().bold().with_font_size(8).with_color(theme::DARK);
    let text_style = Style::new().with_font_size(8).with_color(theme::DARK);
    let column_width = Mm(78.0);
    let half = GLOSSARY.len().div_ceil(2);
    let mut max_y = y;
    for (col, entries) in [&GLOSSARY[..half], &GLOSSARY[half..]].iter().enumerate() {
        let x = MARGIN + Mm(95.0) * col as f32;
        let mut col_y = y;
        for (acronym, definition) in entries.iter() {
            widgets::print_text(
                area,
                ctx.font_cache,
                Position::new(x, col_y),
                acronym_style,
                &format!("{}:", acronym),
            )?;
            let height = widgets::print_paragraph(
                area,
                ctx.font_cache,
                Position::new(x + Mm(14.0), col_y),
                column_width - Mm(14.0),
                Mm(4.0),
                text_style,
                definition,
            )?;
            col_y += height.max(Mm(4.0)) + Mm(1.0);
        }
        max_y = max_y.max(col_y);
    }
    Ok(max_y)
}
