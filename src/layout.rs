//! # Chart layout
//!
//! Arranges a [`DistributionSet`] into the 2×3 grid of named plot slots the
//! render sink consumes: Beta curves on the first row, count distributions on
//! the second. Slots for distributions that need observations stay empty
//! until something has been observed.

use serde::Serialize;

use crate::distributions::engine::DistributionSet;
use crate::distributions::series::DistributionKind;
use crate::utils::count_to_f64;

pub const GRID_ROWS: usize = 2;
pub const GRID_COLS: usize = 3;

pub const RATE_AXIS_LABEL: &str = "Left handedness";
pub const COUNT_AXIS_LABEL: &str = "Number of left handed students";

/// Data drawn in a single slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Series {
    /// `(p, density)` samples joined by a line.
    Curve { points: Vec<(f64, f64)> },
    /// `(count, mass)` bars centred on each count.
    Bars { points: Vec<(u64, f64)> },
    Empty,
}

impl Series {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Largest finite y value, if any.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        match self {
            Self::Curve { points } => crate::utils::max_finite(points.iter().map(|p| p.1)),
            Self::Bars { points } => crate::utils::max_finite(points.iter().map(|p| p.1)),
            Self::Empty => None,
        }
    }
}

/// One slot of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub kind: DistributionKind,
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
    pub title: &'static str,
    pub x_label: &'static str,
    /// Fixed x-axis range; `None` lets the renderer fit the data.
    pub x_range: Option<(f64, f64)>,
    pub series: Series,
}

/// The laid-out 2×3 grid, panels in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGrid {
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
}

impl ChartGrid {
    /// Panel at a zero-based `(row, col)` position.
    #[must_use]
    pub fn panel(&self, row: usize, col: usize) -> Option<&Panel> {
        self.panels.get(row * self.cols + col)
    }

    #[must_use]
    pub fn panel_for(&self, kind: DistributionKind) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.kind == kind)
    }
}

/// Lay out every distribution of `set` in its grid slot.
#[must_use]
pub fn layout(set: &DistributionSet) -> ChartGrid {
    let population = count_to_f64(set.parameters.population_size);
    let panels = DistributionKind::ALL
        .into_iter()
        .enumerate()
        .map(|(index, kind)| {
            let row = index / GRID_COLS;
            let series = if kind.is_continuous() {
                set.curve(kind).map_or(Series::Empty, |curve| Series::Curve {
                    points: curve.points().collect(),
                })
            } else {
                set.mass_function(kind).map_or(Series::Empty, |pmf| Series::Bars {
                    points: pmf.points().collect(),
                })
            };
            // Shifted predictions keep the whole population on the axis.
            let x_range = matches!(
                kind,
                DistributionKind::PlugIn | DistributionKind::PosteriorPredictive
            )
            .then_some((-0.5, population + 0.5));
            Panel {
                kind,
                row,
                col: index % GRID_COLS,
                title: kind.title(),
                x_label: if row == 0 {
                    RATE_AXIS_LABEL
                } else {
                    COUNT_AXIS_LABEL
                },
                x_range,
                series,
            }
        })
        .collect();
    ChartGrid {
        rows: GRID_ROWS,
        cols: GRID_COLS,
        panels,
    }
}
