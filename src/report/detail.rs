//! The indicator detail tables, grouped per strategic line into quantitative KPIs, binary
//! milestones and rows without data.

use crate::error::Error;
use crate::metrics::{detail_sections, DetailGroup};
use crate::model::{IndicatorRecord, Status};
use crate::render::Renderer;
use crate::style::{Color, Style};
use crate::theme;
use crate::{Mm, Position, Size};

use super::{add_content_page, section_title, widgets, Ctx, CONTENT_TOP, MARGIN, PAGE_BREAK_Y};

const NAME_WIDTH: Mm = Mm(75.0);
const TARGET_WIDTH: Mm = Mm(20.0);
const ACTUAL_WIDTH: Mm = Mm(20.0);
const VALUE_WIDTH: Mm = Mm(25.0);
const BAR_WIDTH: Mm = Mm(50.0);
const HEADER_HEIGHT: Mm = Mm(6.0);
const ROW_HEIGHT: Mm = Mm(6.0);

pub fn render(renderer: &mut Renderer, ctx: &Ctx<'_>) -> Result<(), Error> {
    add_content_page(renderer, ctx)?;
    {
        let area = renderer.last_page().first_layer().area();
        section_title(&area, ctx, CONTENT_TOP, "Detalle de Indicadores")?;
    }
    let mut y = CONTENT_TOP + Mm(14.0);

    let rows = ctx.dataset.progress_and_gaps(Some(ctx.summary.year));
    let mut lines: Vec<&str> = Vec::new();
    for row in &rows {
        if !lines.contains(&row.line.as_str()) {
            lines.push(&row.line);
        }
    }
    lines.sort_unstable();

    for line in lines {
        let line_rows: Vec<&IndicatorRecord> = rows
            .iter()
            .filter(|r| r.line == line)
            .copied()
            .collect();
        let sections = detail_sections(&line_rows);
        let color = theme::line_color(line);

        y = ensure_room(renderer, ctx, y, Mm(30.0))?;
        {
            let area = renderer.last_page().first_layer().area();
            area.fill_rect(
                Position::new(MARGIN, y),
                Size::new(ctx.content_width(), Mm(8.0)),
                color,
            );
            widgets::print_text(
                &area,
                ctx.font_cache,
                Position::new(MARGIN + Mm(2.0), y + Mm(2.0)),
                Style::new()
                    .bold()
                    .with_font_size(10)
                    .with_color(Color::rgb(255, 255, 255)),
                line,
            )?;
        }
        y += Mm(10.0);

        let groups = [
            (DetailGroup::Kpi, &sections.kpis),
            (DetailGroup::Milestone, &sections.milestones),
            (DetailGroup::NoData, &sections.no_data),
        ];
        for (group, group_rows) in groups {
            if group_rows.is_empty() {
                continue;
            }
            y = render_section(renderer, ctx, y, color, group, group_rows)?;
            y += Mm(3.0);
        }
        y += Mm(5.0);
    }
    Ok(())
}

/// Starts a new page if less than `needed` vertical space is left, returning the new cursor.
fn ensure_room(
    renderer: &mut Renderer,
    ctx: &Ctx<'_>,
    y: Mm,
    needed: Mm,
) -> Result<Mm, Error> {
    if y + needed > PAGE_BREAK_Y {
        add_content_page(renderer, ctx)?;
        Ok(CONTENT_TOP)
    } else {
        Ok(y)
    }
}

fn render_section(
    renderer: &mut Renderer,
    ctx: &Ctx<'_>,
    y: Mm,
    color: Color,
    group: DetailGroup,
    rows: &[&IndicatorRecord],
) -> Result<Mm, Error> {
    let mut y = ensure_room(renderer, ctx, y, Mm(20.0))?;
    {
        let area = renderer.last_page().first_layer().area();
        let heading_color = match group {
            DetailGroup::NoData => theme::GRAY,
            _ => theme::DARK,
        };
        widgets::print_text(
            &area,
            ctx.font_cache,
            Position::new(MARGIN, y),
            Style::new().bold().with_font_size(8).with_color(heading_color),
            group.heading(),
        )?;
    }
    y += Mm(6.0);

    let mut remaining = rows;
    loop {
        let drawn = {
            let area = renderer.last_page().first_layer().area();
            table_header(&area, ctx, y, color)?;
            let mut row_y = y + HEADER_HEIGHT;
            let mut drawn = 0;
            for (idx, record) in remaining.iter().enumerate() {
                if row_y + ROW_HEIGHT > PAGE_BREAK_Y {
                    break;
                }
                table_row(&area, ctx, row_y, idx, record)?;
                row_y += ROW_HEIGHT;
                drawn += 1;
            }
            y = row_y;
            drawn
        };
        remaining = &remaining[drawn..];
        if remaining.is_empty() {
            return Ok(y);
        }
        add_content_page(renderer, ctx)?;
        y = CONTENT_TOP;
    }
}

fn table_header(
    area: &crate::render::Area<'_>,
    ctx: &Ctx<'_>,
    y: Mm,
    color: Color,
) -> Result<(), Error> {
    let style = Style::new()
        .bold()
        .with_font_size(7)
        .with_color(Color::rgb(255, 255, 255));
    let total = NAME_WIDTH + TARGET_WIDTH + ACTUAL_WIDTH + VALUE_WIDTH + BAR_WIDTH;
    area.fill_rect(Position::new(MARGIN, y), Size::new(total, HEADER_HEIGHT), color);

    widgets::print_text(
        area,
        ctx.font_cache,
        Position::new(MARGIN + Mm(2.0), y + Mm(1.5)),
        style,
        "Indicador",
    )?;
    let mut x = MARGIN + NAME_WIDTH;
    for (label, width) in [
        ("Meta", TARGET_WIDTH),
        ("Ejecución", ACTUAL_WIDTH),
        ("Cumplimiento", VALUE_WIDTH),
        ("Progreso", BAR_WIDTH),
    ] {
        widgets::print_centered(area, ctx.font_cache, x + width * 0.5, y + Mm(1.5), style, label)?;
        x += width;
    }
    Ok(())
}

fn table_row(
    area: &crate::render::Area<'_>,
    ctx: &Ctx<'_>,
    y: Mm,
    idx: usize,
    record: &IndicatorRecord,
) -> Result<(), Error> {
    let total = NAME_WIDTH + TARGET_WIDTH + ACTUAL_WIDTH + VALUE_WIDTH + BAR_WIDTH;
    if idx % 2 == 1 {
        area.fill_rect(Position::new(MARGIN, y), Size::new(total, ROW_HEIGHT), theme::CARD_BG);
    }

    let text_style = Style::new().with_font_size(7).with_color(theme::DARK);
    widgets::print_text(
        area,
        ctx.font_cache,
        Position::new(MARGIN + Mm(2.0), y + Mm(1.5)),
        text_style,
        truncate(&record.indicator, 50),
    )?;

    let mut x = MARGIN + NAME_WIDTH;
    for (value, width) in [(record.target, TARGET_WIDTH), (record.actual, ACTUAL_WIDTH)] {
        widgets::print_centered(
            area,
            ctx.font_cache,
            x + width * 0.5,
            y + Mm(1.5),
            text_style,
            &widgets::format_value(value),
        )?;
        x += width;
    }

    let compliance = record.compliance;
    let status = Status::from_compliance(compliance);
    // No-data rows show a single N/D and leave the progress column empty.
    let cell = if status == Status::NoData {
        "N/D".to_string()
    } else {
        format!("{} {}", status.marker(), widgets::format_compliance(compliance))
    };
    widgets::print_centered(
        area,
        ctx.font_cache,
        x + VALUE_WIDTH * 0.5,
        y + Mm(1.5),
        Style::new()
            .bold()
            .with_font_size(7)
            .with_color(theme::compliance_color(compliance)),
        &cell,
    )?;
    x += VALUE_WIDTH;

    if status != Status::NoData {
        widgets::progress_bar(
            area,
            ctx.font_cache,
            Position::new(x + Mm(2.0), y + Mm(1.5)),
            Size::new(BAR_WIDTH - Mm(4.0), Mm(3.0)),
            compliance,
            false,
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
