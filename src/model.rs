//! The indicator data model.
//!
//! A [`Dataset`][] is a flat list of indicator records, one row per indicator, year and source.
//! Records are loaded from JSON and normalized before any metric is computed: compliance values
//! stored as decimal fractions are scaled to percentages, and missing compliance values are
//! derived from target and actual where possible.
//!
//! [`Dataset`]: struct.Dataset.html

use std::fs;
use std::path;

use serde::Deserialize;

use crate::error::{Context as _, Error};

/// The years covered by the development plan.  2021 is the baseline year and is excluded from
/// progress metrics.
pub const PLAN_YEARS: std::ops::RangeInclusive<i32> = 2022..=2026;

/// The source tag of progress rows.  Other sources hold targets or baseline values.
pub const PROGRESS_SOURCE: &str = "Avance";

/// The direction of an indicator: whether a higher or a lower actual value is better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Direction {
    /// A higher actual value is better.
    #[default]
    #[serde(alias = "Creciente", alias = "creciente")]
    Increasing,
    /// A lower actual value is better.
    #[serde(alias = "Decreciente", alias = "decreciente")]
    Decreasing,
}

/// A single indicator row: one measurement of one indicator in one year.
#[derive(Clone, Debug, Deserialize)]
pub struct IndicatorRecord {
    /// The strategic line the indicator belongs to.
    #[serde(alias = "Linea", alias = "Línea")]
    pub line: String,
    /// The objective within the strategic line, if the dataset carries the cascade structure.
    #[serde(default, alias = "Objetivo")]
    pub objective: Option<String>,
    /// The indicator name.
    #[serde(alias = "Indicador")]
    pub indicator: String,
    /// The source of the row, e.g. `Avance` for progress rows.
    #[serde(default = "default_source", alias = "Fuente")]
    pub source: String,
    /// The year the row refers to.
    #[serde(alias = "Año", alias = "Ano")]
    pub year: i32,
    /// The target value.
    #[serde(default, alias = "Meta")]
    pub target: Option<f32>,
    /// The actual (executed) value.
    #[serde(default, alias = "Ejecución", alias = "Ejecucion")]
    pub actual: Option<f32>,
    /// The compliance percentage, if already present in the source data.
    #[serde(default, alias = "Cumplimiento")]
    pub compliance: Option<f32>,
    /// The indicator direction.
    #[serde(default, alias = "Sentido")]
    pub direction: Direction,
}

fn default_source() -> String {
    PROGRESS_SOURCE.to_string()
}

impl IndicatorRecord {
    /// Returns whether this is a progress row with a usable compliance value for the plan years.
    pub fn is_progress(&self) -> bool {
        self.source == PROGRESS_SOURCE
            && PLAN_YEARS.contains(&self.year)
            && self.compliance.map_or(false, f32::is_finite)
    }
}

/// Calculates the compliance percentage for the given target and actual values.
///
/// For decreasing indicators a lower actual value is better, so staying below the target yields
/// more than 100%.  Returns `None` if either value is missing or the target is zero.
pub fn compute_compliance(
    target: Option<f32>,
    actual: Option<f32>,
    direction: Direction,
) -> Option<f32> {
    let target = target.filter(|t| t.is_finite() && *t != 0.0)?;
    let actual = actual.filter(|a| a.is_finite())?;
    let compliance = match direction {
        Direction::Increasing => actual / target * 100.0,
        Direction::Decreasing => {
            if actual <= target {
                100.0 + (target - actual) / target * 100.0
            } else {
                target / actual * 100.0
            }
        }
    };
    Some(compliance)
}

/// The traffic-light status of an indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    /// The target was met (compliance at or above 100%).
    Met,
    /// The indicator is in progress (compliance between 80% and 100%).
    InProgress,
    /// The indicator requires attention (compliance below 80%).
    AtRisk,
    /// No compliance value is available.
    NoData,
}

impl Status {
    /// Determines the status for the given compliance percentage.
    pub fn from_compliance(compliance: Option<f32>) -> Status {
        match compliance {
            Some(c) if !c.is_finite() => Status::NoData,
            Some(c) if c >= 100.0 => Status::Met,
            Some(c) if c >= 80.0 => Status::InProgress,
            Some(_) => Status::AtRisk,
            None => Status::NoData,
        }
    }

    /// Returns the display label of this status.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Met => "Meta cumplida",
            Status::InProgress => "En progreso",
            Status::AtRisk => "Requiere atención",
            Status::NoData => "Sin datos",
        }
    }

    /// Returns a short marker suitable for the built-in PDF fonts.
    pub fn marker(&self) -> &'static str {
        match self {
            Status::Met => "OK",
            Status::InProgress => "!",
            Status::AtRisk => "X",
            Status::NoData => "N/D",
        }
    }
}

/// A loaded indicator dataset.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    /// All indicator rows.
    pub records: Vec<IndicatorRecord>,
}

impl Dataset {
    /// Parses a dataset from a JSON array of records and normalizes it.
    pub fn from_json(json: &str) -> Result<Dataset, Error> {
        let mut dataset: Dataset =
            serde_json::from_str(json).context("Failed to parse dataset JSON")?;
        dataset.normalize();
        Ok(dataset)
    }

    /// Loads a dataset from a JSON file and normalizes it.
    pub fn load(path: impl AsRef<path::Path>) -> Result<Dataset, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file {}", path.display()))?;
        Dataset::from_json(&json)
    }

    /// Normalizes the dataset.
    ///
    /// If all compliance values are at most 2, they are treated as decimal fractions and scaled
    /// to percentages.  Missing compliance values are then computed from target and actual.
    pub fn normalize(&mut self) {
        let max = self
            .records
            .iter()
            .filter_map(|r| r.compliance)
            .filter(|c| c.is_finite())
            .fold(f32::NEG_INFINITY, f32::max);
        if max.is_finite() && max <= 2.0 {
            for record in &mut self.records {
                if let Some(compliance) = &mut record.compliance {
                    *compliance *= 100.0;
                }
            }
        }
        for record in &mut self.records {
            if record.compliance.is_none() {
                record.compliance =
                    compute_compliance(record.target, record.actual, record.direction);
            }
        }
    }

    /// Returns the progress rows for the given year, or for the latest year in the dataset.
    pub fn progress(&self, year: Option<i32>) -> Vec<&IndicatorRecord> {
        let year = year.or_else(|| self.latest_year());
        self.records
            .iter()
            .filter(|r| year.map_or(true, |y| r.year == y))
            .filter(|r| r.is_progress())
            .collect()
    }

    /// Like [`progress`](#method.progress), but keeps rows without a compliance value so they
    /// can be listed as `N/D` in the detail tables.
    pub fn progress_and_gaps(&self, year: Option<i32>) -> Vec<&IndicatorRecord> {
        let year = year.or_else(|| self.latest_year());
        self.records
            .iter()
            .filter(|r| year.map_or(true, |y| r.year == y))
            .filter(|r| r.source == PROGRESS_SOURCE && PLAN_YEARS.contains(&r.year))
            .collect()
    }

    /// Returns the most recent year present in the dataset.
    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// Returns the distinct strategic lines, in order of first appearance.
    pub fn lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = Vec::new();
        for record in &self.records {
            if !lines.contains(&record.line.as_str()) {
                lines.push(&record.line);
            }
        }
        lines
    }

    /// Builds an example dataset covering the six strategic lines of the institutional plan.
    pub fn sample() -> Dataset {
        fn record(
            line: &str,
            indicator: &str,
            target: f32,
            actual: f32,
            compliance: f32,
        ) -> IndicatorRecord {
            IndicatorRecord {
                line: line.to_string(),
                objective: None,
                indicator: indicator.to_string(),
                source: PROGRESS_SOURCE.to_string(),
                year: 2025,
                target: Some(target),
                actual: Some(actual),
                compliance: Some(compliance),
                direction: Direction::Increasing,
            }
        }

        let records = vec![
            record("Expansión", "Número de estudiantes matriculados B2B", 15000.0, 16200.0, 108.0),
            record("Expansión", "Número de estudiantes matriculados B2G", 8000.0, 8500.0, 106.3),
            record("Expansión", "Tasa de cobertura educación superior", 35.0, 38.0, 108.6),
            record("Expansión", "Número de programas académicos activos", 120.0, 128.0, 106.7),
            record("Expansión", "Índice de presencia regional", 85.0, 88.0, 103.5),
            record("Calidad", "Tasa de graduación oportuna", 70.0, 68.0, 97.1),
            record("Calidad", "Acreditación institucional vigente", 100.0, 100.0, 100.0),
            record("Calidad", "Índice de calidad docente", 4.2, 4.3, 102.4),
            record("Sostenibilidad", "EBITDA institucional", 25000.0, 24500.0, 98.0),
            record("Sostenibilidad", "Índice de sostenibilidad ambiental", 80.0, 77.0, 96.3),
            record("Sostenibilidad", "Ratio de eficiencia energética", 0.75, 0.72, 96.0),
            record("Sostenibilidad", "Porcentaje de residuos reciclados", 60.0, 58.0, 96.7),
            record("Transformación Organizacional", "Índice de madurez digital", 75.0, 84.0, 112.0),
            record("Transformación Organizacional", "Procesos automatizados", 40.0, 43.4, 108.5),
            record("Transformación Organizacional", "Índice de clima organizacional", 82.0, 88.2, 107.6),
            record("Educación para toda la vida", "Matrícula en educación continua", 12000.0, 12504.0, 104.2),
            record("Educación para toda la vida", "Cursos de formación abierta", 180.0, 191.0, 106.1),
            record("Educación para toda la vida", "Certificaciones emitidas", 9500.0, 10118.0, 106.5),
            record("Experiencia", "NPS estudiantil", 58.0, 59.1, 101.9),
            record("Experiencia", "Tasa de retención estudiantil", 88.0, 90.6, 103.0),
            record("Experiencia", "Cumplimiento de ANS de servicio", 95.0, 100.0, 105.3),
        ];
        Dataset { records }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_compute_compliance_increasing() {
        let c = compute_compliance(Some(100.0), Some(108.0), Direction::Increasing).unwrap();
        assert!(approx_eq!(f32, c, 108.0, ulps = 2));
        assert_eq!(compute_compliance(Some(0.0), Some(5.0), Direction::Increasing), None);
        assert_eq!(compute_compliance(None, Some(5.0), Direction::Increasing), None);
        assert_eq!(compute_compliance(Some(10.0), None, Direction::Increasing), None);
    }

    #[test]
    fn test_compute_compliance_decreasing() {
        // Below target is better than 100%.
        let c = compute_compliance(Some(10.0), Some(8.0), Direction::Decreasing).unwrap();
        assert!(approx_eq!(f32, c, 120.0, ulps = 2));
        // At target is exactly 100%.
        let c = compute_compliance(Some(10.0), Some(10.0), Direction::Decreasing).unwrap();
        assert!(approx_eq!(f32, c, 100.0, ulps = 2));
        // Above target falls below 100%.
        let c = compute_compliance(Some(10.0), Some(12.5), Direction::Decreasing).unwrap();
        assert!(approx_eq!(f32, c, 80.0, ulps = 2));
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(Status::from_compliance(Some(100.0)), Status::Met);
        assert_eq!(Status::from_compliance(Some(99.95)), Status::InProgress);
        assert_eq!(Status::from_compliance(Some(80.0)), Status::InProgress);
        assert_eq!(Status::from_compliance(Some(79.9)), Status::AtRisk);
        assert_eq!(Status::from_compliance(Some(f32::NAN)), Status::NoData);
        assert_eq!(Status::from_compliance(None), Status::NoData);
    }

    #[test]
    fn test_normalize_decimal_fractions() {
        let json = r#"[
            {"line": "Calidad", "indicator": "A", "year": 2025, "compliance": 1.05},
            {"line": "Calidad", "indicator": "B", "year": 2025, "compliance": 0.82}
        ]"#;
        let dataset = Dataset::from_json(json).unwrap();
        assert!(approx_eq!(f32, dataset.records[0].compliance.unwrap(), 105.0, ulps = 2));
        assert!(approx_eq!(f32, dataset.records[1].compliance.unwrap(), 82.0, ulps = 2));
    }

    #[test]
    fn test_normalize_keeps_percentages() {
        let json = r#"[
            {"line": "Calidad", "indicator": "A", "year": 2025, "compliance": 105.0},
            {"line": "Calidad", "indicator": "B", "year": 2025, "compliance": 1.5}
        ]"#;
        let dataset = Dataset::from_json(json).unwrap();
        assert!(approx_eq!(f32, dataset.records[1].compliance.unwrap(), 1.5, ulps = 2));
    }

    #[test]
    fn test_normalize_fills_missing_compliance() {
        let json = r#"[
            {"line": "Expansión", "indicator": "A", "year": 2025, "target": 50.0, "actual": 55.0},
            {"line": "Expansión", "indicator": "B", "year": 2025, "target": 10.0, "actual": 8.0,
             "direction": "Decreciente"}
        ]"#;
        let dataset = Dataset::from_json(json).unwrap();
        assert!(approx_eq!(f32, dataset.records[0].compliance.unwrap(), 110.0, ulps = 2));
        assert!(approx_eq!(f32, dataset.records[1].compliance.unwrap(), 120.0, ulps = 2));
    }

    #[test]
    fn test_spanish_field_names() {
        let json = r#"[
            {"Linea": "Calidad", "Indicador": "Tasa", "Fuente": "Avance", "Año": 2024,
             "Meta": 70.0, "Ejecución": 68.0, "Cumplimiento": 97.1, "Sentido": "Creciente"}
        ]"#;
        let dataset = Dataset::from_json(json).unwrap();
        let record = &dataset.records[0];
        assert_eq!(record.line, "Calidad");
        assert_eq!(record.year, 2024);
        assert_eq!(record.direction, Direction::Increasing);
    }

    #[test]
    fn test_progress_filters() {
        let json = r#"[
            {"line": "Calidad", "indicator": "A", "source": "Avance", "year": 2025, "compliance": 97.0},
            {"line": "Calidad", "indicator": "B", "source": "Meta", "year": 2025, "compliance": 100.0},
            {"line": "Calidad", "indicator": "C", "source": "Avance", "year": 2021, "compliance": 90.0},
            {"line": "Calidad", "indicator": "D", "source": "Avance", "year": 2025}
        ]"#;
        let dataset = Dataset::from_json(json).unwrap();
        let progress = dataset.progress(Some(2025));
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].indicator, "A");
        // The N/D row is kept for the detail tables.
        let with_gaps = dataset.progress_and_gaps(Some(2025));
        assert_eq!(with_gaps.len(), 2);
    }

    #[test]
    fn test_sample_covers_six_lines() {
        let dataset = Dataset::sample();
        assert_eq!(dataset.lines().len(), 6);
        assert_eq!(dataset.latest_year(), Some(2025));
        assert!(dataset.records.iter().all(|r| r.is_progress()));
    }
}
