use lopdf::Document;

use pdi_report::model::{Dataset, Direction, IndicatorRecord};
use pdi_report::report::{Analysis, ReportBuilder};

fn record(line: &str, indicator: String, compliance: Option<f32>) -> IndicatorRecord {
    IndicatorRecord {
        line: line.to_string(),
        objective: None,
        indicator,
        source: "Avance".to_string(),
        year: 2025,
        target: compliance.map(|_| 100.0),
        actual: compliance,
        compliance,
        direction: Direction::Increasing,
    }
}

fn render(dataset: Dataset, analysis: Analysis) -> String {
    let report = ReportBuilder::new(dataset)
        .with_year(2025)
        .with_analysis(analysis)
        .build()
        .unwrap();
    let mut buf = Vec::new();
    report.write(&mut buf).unwrap();
    all_text(&Document::load_mem(&buf).unwrap())
}

fn render_sample() -> Vec<u8> {
    let analysis = Analysis::from_json(
        r#"{
            "executive": "El plan presenta un cumplimiento global sobresaliente.",
            "lines": {"Calidad": "La acreditacion institucional se mantiene vigente."}
        }"#,
    )
    .unwrap();
    let report = ReportBuilder::new(Dataset::sample())
        .with_year(2025)
        .with_analysis(analysis)
        .build()
        .unwrap();
    let mut buf = Vec::new();
    report.write(&mut buf).unwrap();
    buf
}

fn all_text(doc: &Document) -> String {
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut text = String::new();
    for page in pages {
        if let Ok(page_text) = doc.extract_text(&[page]) {
            text.push_str(&page_text);
        }
    }
    text
}

#[test]
fn report_has_expected_page_structure() {
    let buf = render_sample();
    assert!(buf.starts_with(b"%PDF"));

    let doc = Document::load_mem(&buf).expect("generated PDF should parse");
    // Cover, contents, summary, six line pages, at least one detail page and conclusions.
    assert!(doc.get_pages().len() >= 10, "got {} pages", doc.get_pages().len());
}

#[test]
fn report_contains_section_titles() {
    let buf = render_sample();
    let doc = Document::load_mem(&buf).unwrap();
    let text = all_text(&doc);

    assert!(text.contains("Tabla de Contenidos"));
    assert!(text.contains("Resumen Ejecutivo"));
    assert!(text.contains("Detalle de Indicadores"));
    assert!(text.contains("Conclusiones Ejecutivas"));
    assert!(text.contains("Glosario de Siglas"));
}

#[test]
fn report_lists_all_strategic_lines() {
    let buf = render_sample();
    let doc = Document::load_mem(&buf).unwrap();
    let text = all_text(&doc);

    for line in ["Calidad", "Sostenibilidad", "Experiencia"] {
        assert!(text.contains(line), "missing line {}", line);
    }
}

#[test]
fn no_data_detail_row_shows_a_single_nd() {
    let dataset = Dataset {
        records: vec![
            record("Calidad", "Tasa de graduación oportuna".to_string(), Some(97.1)),
            record("Calidad", "Indicador sin meta definida".to_string(), None),
        ],
    };
    let text = render(dataset, Analysis::default());

    assert!(text.contains("Sin Meta Definida"));
    assert!(!text.contains("N/D N/D"), "no-data compliance cell is doubled");
}

#[test]
fn line_analysis_survives_a_full_indicator_table() {
    // 71 rows fill the line page and one continuation page to the bottom margin.
    let records: Vec<IndicatorRecord> = (0..71)
        .map(|i| record("Calidad", format!("Indicador de seguimiento {:02}", i), Some(100.0)))
        .collect();
    let analysis = Analysis::from_json(
        r#"{"lines": {"Calidad":
            "El comité recomienda consolidar la trazabilidad de los resultados del ciclo."}}"#,
    )
    .unwrap();
    let text = render(Dataset { records }, analysis);

    assert!(text.contains("Análisis Estratégico"));
    assert!(text.contains("trazabilidad"), "analysis text dropped past the page bottom");
}

#[test]
fn summary_heatmap_caps_rows_for_many_lines() {
    let records: Vec<IndicatorRecord> = (0..16)
        .map(|i| record(&format!("Línea {:02}", i), format!("Indicador {:02}", i), Some(90.0)))
        .collect();
    let text = render(Dataset { records }, Analysis::default());

    assert!(text.contains("líneas más"), "overflowing heatmap rows are not summarized");
    // The legend still lands on the page below the capped table.
    assert!(text.contains("Meta Cumplida"));
}

#[test]
fn empty_dataset_still_renders() {
    let dataset = Dataset::from_json("[]").unwrap();
    let report = ReportBuilder::new(dataset).with_year(2025).build().unwrap();
    // Cover, contents, summary, detail and conclusions; no per-line pages.
    assert!(report.page_count() >= 5);
    let mut buf = Vec::new();
    report.write(&mut buf).unwrap();
    assert!(Document::load_mem(&buf).is_ok());
}
