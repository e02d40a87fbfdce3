//! Aggregated metrics over an indicator dataset.

use crate::model::{Dataset, IndicatorRecord, Status};

/// The global metrics shown on the executive summary page.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// The average compliance over all progress rows, rounded to one decimal.
    pub average: f32,
    /// The number of distinct indicators with progress data.
    pub total_indicators: usize,
    /// The number of rows with compliance at or above 100%.
    pub met: usize,
    /// The number of rows with compliance between 80% and 100%.
    pub in_progress: usize,
    /// The number of rows with compliance below 80%.
    pub not_met: usize,
    /// The number of distinct strategic lines.
    pub total_lines: usize,
    /// The year the metrics refer to.
    pub year: i32,
}

impl Summary {
    /// Computes the global metrics for the given year, or for the latest year in the dataset.
    pub fn compute(dataset: &Dataset, year: Option<i32>) -> Summary {
        let year = year.or_else(|| dataset.latest_year()).unwrap_or(2025);
        let rows = dataset.progress(Some(year));
        let mut met = 0;
        let mut in_progress = 0;
        let mut not_met = 0;
        let mut sum = 0.0;
        for row in &rows {
            // is_progress guarantees a finite compliance value.
            let compliance = row.compliance.unwrap_or(0.0);
            sum += compliance;
            match Status::from_compliance(Some(compliance)) {
                Status::Met => met += 1,
                Status::InProgress => in_progress += 1,
                _ => not_met += 1,
            }
        }
        let average = if rows.is_empty() {
            0.0
        } else {
            round1(sum / rows.len() as f32)
        };
        Summary {
            average,
            total_indicators: count_distinct(rows.iter().map(|r| r.indicator.as_str())),
            met,
            in_progress,
            not_met,
            total_lines: count_distinct(rows.iter().map(|r| r.line.as_str())),
            year,
        }
    }
}

/// The aggregated compliance of one strategic line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSummary {
    /// The strategic line name.
    pub line: String,
    /// The average compliance of the line, rounded to one decimal.
    pub compliance: f32,
    /// The number of distinct indicators in the line.
    pub indicators: usize,
}

/// Computes the per-line compliance averages, sorted by compliance in descending order.
pub fn line_summaries(dataset: &Dataset, year: Option<i32>) -> Vec<LineSummary> {
    let year = year.or_else(|| dataset.latest_year());
    let rows = dataset.progress(year);
    let mut summaries: Vec<LineSummary> = Vec::new();
    for row in &rows {
        if summaries.iter().any(|s| s.line == row.line) {
            continue;
        }
        let line_rows: Vec<&&IndicatorRecord> =
            rows.iter().filter(|r| r.line == row.line).collect();
        let sum: f32 = line_rows.iter().filter_map(|r| r.compliance).sum();
        summaries.push(LineSummary {
            line: row.line.clone(),
            compliance: round1(sum / line_rows.len() as f32),
            indicators: count_distinct(line_rows.iter().map(|r| r.indicator.as_str())),
        });
    }
    summaries.sort_by(|a, b| {
        b.compliance
            .partial_cmp(&a.compliance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

/// The section an indicator row belongs to in the detail tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailGroup {
    /// A quantitative KPI with a gradual compliance value.
    Kpi,
    /// A binary project milestone, reported as exactly 0% or 100%.
    Milestone,
    /// A row without a compliance value.
    NoData,
}

impl DetailGroup {
    /// Returns the section heading of this group.
    pub fn heading(&self) -> &'static str {
        match self {
            DetailGroup::Kpi => "KPIs Cuantitativos",
            DetailGroup::Milestone => "Hitos de Proyecto (100% / 0%)",
            DetailGroup::NoData => "Sin Meta Definida (N/D)",
        }
    }
}

/// Returns whether the given compliance value marks a binary milestone.
pub fn is_milestone(compliance: Option<f32>) -> bool {
    matches!(compliance, Some(c) if c == 0.0 || c == 100.0)
}

/// Classifies an indicator row into its detail table section.
pub fn group_for_detail(record: &IndicatorRecord) -> DetailGroup {
    match record.compliance {
        None => DetailGroup::NoData,
        Some(c) if !c.is_finite() => DetailGroup::NoData,
        compliance if is_milestone(compliance) => DetailGroup::Milestone,
        Some(_) => DetailGroup::Kpi,
    }
}

/// The sort rank of a detail row.  Rows that require attention come first, met rows last.
pub fn detail_rank(compliance: Option<f32>) -> u8 {
    match compliance {
        None => 3,
        Some(c) if !c.is_finite() => 3,
        Some(c) if c < 80.0 => 0,
        Some(c) if c < 100.0 => 1,
        Some(_) => 2,
    }
}

/// The detail table sections of a single strategic line.
#[derive(Clone, Debug, Default)]
pub struct DetailSections<'a> {
    /// Quantitative KPIs, attention-first.
    pub kpis: Vec<&'a IndicatorRecord>,
    /// Binary milestones.
    pub milestones: Vec<&'a IndicatorRecord>,
    /// Rows without compliance data.
    pub no_data: Vec<&'a IndicatorRecord>,
}

/// Splits the rows of one line into the detail table sections and sorts the KPIs by rank.
pub fn detail_sections<'a>(rows: &[&'a IndicatorRecord]) -> DetailSections<'a> {
    let mut sections = DetailSections::default();
    for row in rows {
        match group_for_detail(row) {
            DetailGroup::Kpi => sections.kpis.push(row),
            DetailGroup::Milestone => sections.milestones.push(row),
            DetailGroup::NoData => sections.no_data.push(row),
        }
    }
    sections
        .kpis
        .sort_by_key(|r| detail_rank(r.compliance));
    sections
}

fn count_distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.len()
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::model::Dataset;

    #[test]
    fn test_summary_on_sample() {
        let dataset = Dataset::sample();
        let summary = Summary::compute(&dataset, None);
        assert_eq!(summary.year, 2025);
        assert_eq!(summary.total_indicators, 21);
        assert_eq!(summary.total_lines, 6);
        assert_eq!(summary.met + summary.in_progress + summary.not_met, 21);
        assert_eq!(summary.not_met, 0);
        assert!(summary.average > 100.0);
    }

    #[test]
    fn test_summary_empty_dataset() {
        let dataset = Dataset::default();
        let summary = Summary::compute(&dataset, Some(2025));
        assert_eq!(summary.total_indicators, 0);
        assert!(approx_eq!(f32, summary.average, 0.0, ulps = 2));
    }

    #[test]
    fn test_line_summaries_sorted_descending() {
        let dataset = Dataset::sample();
        let lines = line_summaries(&dataset, None);
        assert_eq!(lines.len(), 6);
        assert!(lines.windows(2).all(|w| w[0].compliance >= w[1].compliance));
        assert_eq!(lines[0].line, "Transformación Organizacional");
        assert!(approx_eq!(f32, lines[0].compliance, 109.4, ulps = 2));
        let calidad = lines.iter().find(|l| l.line == "Calidad").unwrap();
        assert_eq!(calidad.indicators, 3);
        assert!(approx_eq!(f32, calidad.compliance, 99.8, ulps = 2));
    }

    #[test]
    fn test_milestone_classification() {
        assert!(is_milestone(Some(0.0)));
        assert!(is_milestone(Some(100.0)));
        assert!(!is_milestone(Some(99.9)));
        assert!(!is_milestone(None));
    }

    #[test]
    fn test_detail_rank_order() {
        assert_eq!(detail_rank(Some(50.0)), 0);
        assert_eq!(detail_rank(Some(80.0)), 1);
        assert_eq!(detail_rank(Some(99.9)), 1);
        assert_eq!(detail_rank(Some(100.0)), 2);
        assert_eq!(detail_rank(None), 3);
        assert_eq!(detail_rank(Some(f32::NAN)), 3);
    }

    #[test]
    fn test_detail_sections_split_and_sort() {
        let dataset = Dataset::sample();
        let rows = dataset.progress(None);
        let calidad: Vec<_> = rows
            .iter()
            .filter(|r| r.line == "Calidad")
            .copied()
            .collect();
        let sections = detail_sections(&calidad);
        // The accreditation milestone sits at exactly 100%.
        assert_eq!(sections.milestones.len(), 1);
        assert_eq!(sections.kpis.len(), 2);
        assert!(sections.no_data.is_empty());
        // Attention-first: 97.1% before 102.4%.
        assert!(sections.kpis[0].compliance.unwrap() < 100.0);
    }
}
