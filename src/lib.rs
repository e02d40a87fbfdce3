//! PDF report generation for institutional development plan (PDI) metrics.
//!
//! This crate turns tabular compliance data (indicators with targets, actuals
//! and strategic-line groupings) into a fixed-layout, multi-page PDF report:
//! a cover, a table of contents, an executive summary with KPI cards and a
//! per-line heatmap, one page per strategic line, grouped indicator detail
//! tables and a closing page with conclusions and a glossary.
//!
//! The crate is organized in three layers:
//!
//! - [`model`] and [`metrics`] hold the input records and the aggregations
//!   (overall summary, per-line summaries and the detail-table grouping).
//! - [`render`] is a thin, top-left-coordinate wrapper over [`printpdf`][]
//!   operations: pages, drawable areas, filled shapes and builtin-font text.
//! - [`report`] composes the actual pages, using the palette and thresholds
//!   in [`theme`].
//!
//! ```no_run
//! use pdi_report::model::Dataset;
//! use pdi_report::report::ReportBuilder;
//!
//! let dataset = Dataset::sample();
//! let report = ReportBuilder::new(dataset).with_year(2025).build()?;
//! report.write_to_file("informe_estrategico.pdf")?;
//! # Ok::<(), pdi_report::error::Error>(())
//! ```
//!
//! [`printpdf`]: https://docs.rs/printpdf/latest/printpdf

use derive_more::{Add, AddAssign, Div, From, Into, Mul, MulAssign, Sub, SubAssign, Sum};

pub mod error;
pub mod fonts;
pub mod metrics;
pub mod model;
pub mod render;
pub mod report;
pub mod style;
pub mod theme;

pub use error::Error;

/// A length in millimetres, the unit used throughout the layout code.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign, Mul,
    MulAssign, Div, From, Into, Sum,
)]
pub struct Mm(pub f32);

impl Mm {
    /// Returns the maximum of the two lengths.
    pub fn max(self, other: Mm) -> Mm {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }

    /// Returns the minimum of the two lengths.
    pub fn min(self, other: Mm) -> Mm {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }
}

impl From<i32> for Mm {
    fn from(mm: i32) -> Mm {
        Mm(mm as f32)
    }
}

impl From<Mm> for printpdf::Mm {
    fn from(mm: Mm) -> printpdf::Mm {
        printpdf::Mm(mm.0)
    }
}

impl From<printpdf::Mm> for Mm {
    fn from(mm: printpdf::Mm) -> Mm {
        Mm(mm.0)
    }
}

impl From<Mm> for printpdf::Pt {
    fn from(mm: Mm) -> printpdf::Pt {
        printpdf::Mm(mm.0).into()
    }
}

impl From<printpdf::Pt> for Mm {
    fn from(pt: printpdf::Pt) -> Mm {
        Mm(printpdf::Mm::from(pt).0)
    }
}

/// A position on a page or in an area, relative to the top left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Add, AddAssign, Sub, SubAssign)]
pub struct Position {
    pub x: Mm,
    pub y: Mm,
}

impl Position {
    pub fn new(x: impl Into<Mm>, y: impl Into<Mm>) -> Position {
        Position {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl<X: Into<Mm>, Y: Into<Mm>> From<(X, Y)> for Position {
    fn from((x, y): (X, Y)) -> Position {
        Position::new(x, y)
    }
}

/// The size of a page or area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Add, AddAssign, Sub, SubAssign)]
pub struct Size {
    pub width: Mm,
    pub height: Mm,
}

impl Size {
    pub fn new(width: impl Into<Mm>, height: impl Into<Mm>) -> Size {
        Size {
            width: width.into(),
            height: height.into(),
        }
    }

    /// The size of an ISO A4 page in portrait orientation.
    pub fn a4() -> Size {
        Size::new(210.0, 297.0)
    }
}

impl<W: Into<Mm>, H: Into<Mm>> From<(W, H)> for Size {
    fn from((width, height): (W, H)) -> Size {
        Size::new(width, height)
    }
}

/// Margins reducing a drawable area on all four sides.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Margins {
    pub fn trbl(
        top: impl Into<Mm>,
        right: impl Into<Mm>,
        bottom: impl Into<Mm>,
        left: impl Into<Mm>,
    ) -> Margins {
        Margins {
            top: top.into(),
            right: right.into(),
            bottom: bottom.into(),
            left: left.into(),
        }
    }

    pub fn all(margin: impl Into<Mm>) -> Margins {
        let margin = margin.into();
        Margins {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

impl<T: Into<Mm>, R: Into<Mm>, B: Into<Mm>, L: Into<Mm>> From<(T, R, B, L)> for Margins {
    fn from((top, right, bottom, left): (T, R, B, L)) -> Margins {
        Margins::trbl(top, right, bottom, left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn mm_arithmetic() {
        let a = Mm(10.0) + Mm(5.0);
        assert!(approx_eq!(f32, a.0, 15.0));
        let b = a - Mm(3.0);
        assert!(approx_eq!(f32, b.0, 12.0));
        let c = b * 2.0;
        assert!(approx_eq!(f32, c.0, 24.0));
        assert_eq!(Mm(3.0).max(Mm(4.0)), Mm(4.0));
        assert_eq!(Mm(3.0).min(Mm(4.0)), Mm(3.0));
    }

    #[test]
    fn mm_pt_round_trip() {
        let pt: printpdf::Pt = Mm(25.4).into();
        assert!(approx_eq!(f32, pt.0, 72.0, epsilon = 0.01));
        let mm: Mm = pt.into();
        assert!(approx_eq!(f32, mm.0, 25.4, epsilon = 0.001));
    }

    #[test]
    fn position_from_tuple() {
        let pos = Position::from((10, Mm(5.0)));
        assert_eq!(pos, Position::new(10.0, 5.0));
        let sum = pos + Position::new(1.0, 2.0);
        assert_eq!(sum, Position::new(11.0, 7.0));
    }

    #[test]
    fn margins_all_sides() {
        let margins = Margins::all(10.0);
        assert_eq!(margins.top, Mm(10.0));
        assert_eq!(margins.left, Mm(10.0));
        assert_eq!(margins, Margins::from((10.0, 10.0, 10.0, 10.0)));
    }
}
