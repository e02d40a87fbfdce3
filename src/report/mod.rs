//! The strategic report document.
//!
//! A [`ReportBuilder`][] takes a [`Dataset`][] and produces a multi-page PDF: cover, table of
//! contents, executive summary, one page per strategic line, grouped indicator detail tables and
//! a closing page with conclusions and the glossary.
//!
//! [`ReportBuilder`]: struct.ReportBuilder.html
//! [`Dataset`]: ../model/struct.Dataset.html

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path;

use log::{debug, info};
use serde::Deserialize;

use crate::error::{Context as _, Error};
use crate::fonts::{self, FontCache};
use crate::metrics::{line_summaries, LineSummary, Summary};
use crate::model::Dataset;
use crate::render::{Area, Renderer};
use crate::style::Style;
use crate::theme;
use crate::{Mm, Position, Size};

mod conclusions;
mod contents;
mod cover;
mod detail;
mod lines;
mod summary;
pub mod widgets;

/// The left and right page margin.
const MARGIN: Mm = Mm(10.0);
/// The vertical position where content pages break to a new page.
const PAGE_BREAK_Y: Mm = Mm(270.0);
/// The vertical position where content starts on chrome pages.
const CONTENT_TOP: Mm = Mm(22.0);

/// Narrative analysis texts to embed in the report.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Analysis {
    /// The executive analysis shown on the summary page.
    #[serde(default, alias = "ejecutivo")]
    pub executive: Option<String>,
    /// Per-line analysis texts, keyed by strategic line name.
    #[serde(default, alias = "lineas")]
    pub lines: BTreeMap<String, String>,
}

impl Analysis {
    /// Parses analysis texts from a JSON object.
    pub fn from_json(json: &str) -> Result<Analysis, Error> {
        serde_json::from_str(json).context("Failed to parse analysis JSON")
    }

    /// Loads analysis texts from a JSON file.
    pub fn load(path: impl AsRef<path::Path>) -> Result<Analysis, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis file {}", path.display()))?;
        Analysis::from_json(&json)
    }
}

/// Builds the strategic report PDF from a dataset.
pub struct ReportBuilder {
    dataset: Dataset,
    year: Option<i32>,
    analysis: Analysis,
    #[cfg(feature = "images")]
    cover_image: Option<Vec<u8>>,
}

impl ReportBuilder {
    /// Creates a new builder for the given dataset.
    pub fn new(dataset: Dataset) -> ReportBuilder {
        ReportBuilder {
            dataset,
            year: None,
            analysis: Analysis::default(),
            #[cfg(feature = "images")]
            cover_image: None,
        }
    }

    /// Sets the report year.  Defaults to the latest year in the dataset.
    pub fn with_year(mut self, year: i32) -> ReportBuilder {
        self.year = Some(year);
        self
    }

    /// Sets the narrative analysis texts.
    pub fn with_analysis(mut self, analysis: Analysis) -> ReportBuilder {
        self.analysis = analysis;
        self
    }

    /// Sets the cover image (PNG or JPEG data).  Without an image, a plain institutional cover
    /// is drawn instead.
    ///
    /// *Only available if the `images` feature is enabled.*
    #[cfg(feature = "images")]
    pub fn with_cover_image(mut self, data: Vec<u8>) -> ReportBuilder {
        self.cover_image = Some(data);
        self
    }

    /// Renders the report.
    pub fn build(self) -> Result<Report, Error> {
        let font_cache = FontCache::new(fonts::helvetica_family()?);
        let summary = Summary::compute(&self.dataset, self.year);
        let lines = line_summaries(&self.dataset, Some(summary.year));
        info!(
            "rendering report for {}: {} indicators, {} lines",
            summary.year,
            summary.total_indicators,
            lines.len()
        );

        let ctx = Ctx {
            font_cache: &font_cache,
            dataset: &self.dataset,
            summary: &summary,
            lines: &lines,
            analysis: &self.analysis,
        };

        let title = format!("Informe Estratégico PDI {}", summary.year);
        let mut renderer = Renderer::new(Size::a4(), &title)?;

        #[cfg(feature = "images")]
        cover::render(&mut renderer, &ctx, self.cover_image.as_deref())?;
        #[cfg(not(feature = "images"))]
        cover::render(&mut renderer, &ctx)?;

        // The table of contents page is reserved here and filled in at the end, once the
        // actual page numbers are known.
        renderer.add_page(Size::a4());
        let toc_page_idx = renderer.page_count() - 1;
        let mut toc: Vec<(String, usize)> = Vec::new();

        toc.push(("Resumen Ejecutivo".to_string(), renderer.page_count() + 1));
        summary::render(&mut renderer, &ctx)?;

        if !lines.is_empty() {
            toc.push((
                "Análisis por Línea Estratégica".to_string(),
                renderer.page_count() + 1,
            ));
            lines::render(&mut renderer, &ctx)?;
        }

        toc.push(("Detalle de Indicadores".to_string(), renderer.page_count() + 1));
        detail::render(&mut renderer, &ctx)?;

        toc.push((
            "Conclusiones y Glosario".to_string(),
            renderer.page_count() + 1,
        ));
        conclusions::render(&mut renderer, &ctx)?;

        contents::render(&renderer, toc_page_idx, &ctx, &toc)?;
        debug!("rendered {} pages", renderer.page_count());

        Ok(Report { renderer })
    }
}

/// A rendered report, ready to be written out.
pub struct Report {
    renderer: Renderer,
}

impl Report {
    /// Returns the number of pages of the report.
    pub fn page_count(&self) -> usize {
        self.renderer.page_count()
    }

    /// Writes the report to the given writer.
    pub fn write(self, w: impl io::Write) -> Result<(), Error> {
        self.renderer.write(w)
    }

    /// Writes the report to the given file.
    pub fn write_to_file(self, path: impl AsRef<path::Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        self.write(file)
    }
}

/// Shared state for the page generators.
struct Ctx<'a> {
    font_cache: &'a FontCache,
    dataset: &'a Dataset,
    summary: &'a Summary,
    lines: &'a [LineSummary],
    analysis: &'a Analysis,
}

impl Ctx<'_> {
    fn content_width(&self) -> Mm {
        Size::a4().width - MARGIN * 2.0
    }
}

/// Draws the running header and footer on a content page.
fn page_chrome(area: &Area<'_>, ctx: &Ctx<'_>, page_no: usize) -> Result<(), Error> {
    let header_style = Style::new()
        .italic()
        .with_font_size(8)
        .with_color(theme::GRAY);
    widgets::print_centered(
        area,
        ctx.font_cache,
        Size::a4().width * 0.5,
        Mm(8.0),
        header_style,
        "Informe Estratégico - Plan de Desarrollo Institucional",
    )?;
    widgets::print_centered(
        area,
        ctx.font_cache,
        Size::a4().width * 0.5,
        Size::a4().height - Mm(12.0),
        header_style,
        &format!("Página {}", page_no),
    )?;
    Ok(())
}

/// Adds a content page with header and footer and returns its page number.
fn add_content_page(renderer: &mut Renderer, ctx: &Ctx<'_>) -> Result<usize, Error> {
    renderer.add_page(Size::a4());
    let page_no = renderer.page_count();
    let area = renderer.last_page().first_layer().area();
    page_chrome(&area, ctx, page_no)?;
    Ok(page_no)
}

/// Draws a section title in the institutional navy and returns the new vertical position.
fn section_title(
    area: &Area<'_>,
    ctx: &Ctx<'_>,
    y: Mm,
    text: &str,
) -> Result<Mm, Error> {
    let style = Style::new()
        .bold()
        .with_font_size(16)
        .with_color(theme::PRIMARY);
    area.print_str(ctx.font_cache, Position::new(MARGIN, y), style, text)?;
    Ok(y + Mm(10.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_from_json() {
        let json = r#"{
            "executive": "Cumplimiento global sobresaliente.",
            "lines": {"Calidad": "Mantiene la acreditación."}
        }"#;
        let analysis = Analysis::from_json(json).unwrap();
        assert!(analysis.executive.is_some());
        assert_eq!(analysis.lines.len(), 1);
        assert!(analysis.lines.contains_key("Calidad"));
    }

    #[test]
    fn test_analysis_defaults() {
        let analysis = Analysis::from_json("{}").unwrap();
        assert!(analysis.executive.is_none());
        assert!(analysis.lines.is_empty());
    }

    #[test]
    fn test_build_sample_report() {
        let report = ReportBuilder::new(Dataset::sample())
            .with_year(2025)
            .build()
            .unwrap();
        // Cover, contents, summary, six line pages, detail and conclusions.
        assert!(report.page_count() >= 10);
        let mut buf = Vec::new();
        report.write(&mut buf).unwrap();
        assert!(buf.starts_with(b"%PDF"));
    }
}
