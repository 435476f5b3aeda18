/////////////////////////////////////////////////////////////////////////////////////////////\
//
// Numerical summaries and table rendering for the handedness distributions.
//
// Created on: 18 Oct 2026     Author: Tobias Kragholm
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Distribution summaries
//!
//! Mean, spread, mode and an equal-tailed credible interval for every
//! distribution in a [`DistributionSet`]. Beta curves are summarized in
//! closed form (the interval inverts the regularized incomplete beta
//! function); mass functions are summarized from their probabilities.

use comfy_table::{
    Attribute, Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED,
};
use serde::Serialize;

use super::density::beta_quantile;
use super::engine::{DistributionError, DistributionSet};
use super::series::{DensityCurve, DistributionKind, MassFunction};
use crate::utils::count_to_f64;

/// Settings for summaries and their rendering.
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    /// Probability mass inside the reported interval.
    pub credible_mass: f64,
    /// Decimal places in rendered tables.
    pub precision: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            credible_mass: 0.95,
            precision: 3,
        }
    }
}

impl SummaryOptions {
    /// # Errors
    ///
    /// Returns `DistributionError::InvalidParameter` if the credible mass is
    /// not strictly between 0 and 1.
    pub fn validate(self) -> Result<(), DistributionError> {
        if !(self.credible_mass > 0.0 && self.credible_mass < 1.0) {
            return Err(DistributionError::InvalidParameter {
                parameter: "credible_mass",
                reason: format!("must lie in (0, 1), got {}", self.credible_mass),
            });
        }
        Ok(())
    }
}

/// Summary statistics for one distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub kind: DistributionKind,
    pub mean: f64,
    pub std_dev: f64,
    /// `None` when the mode is not unique (U-shaped or flat Beta densities).
    pub mode: Option<f64>,
    pub interval_low: f64,
    pub interval_high: f64,
}

/// Summaries for every distribution that was produced, in grid order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummaries {
    pub credible_mass: f64,
    pub rows: Vec<DistributionSummary>,
}

impl DistributionSummaries {
    #[must_use]
    pub fn get(&self, kind: DistributionKind) -> Option<&DistributionSummary> {
        self.rows.iter().find(|row| row.kind == kind)
    }
}

/// Summarize every distribution present in `set`.
///
/// # Errors
///
/// Returns `DistributionError::InvalidParameter` if `options` are invalid.
pub fn summarize(
    set: &DistributionSet,
    options: SummaryOptions,
) -> Result<DistributionSummaries, DistributionError> {
    options.validate()?;
    let rows = DistributionKind::ALL
        .into_iter()
        .filter_map(|kind| {
            set.curve(kind)
                .map(|curve| summarize_curve(kind, curve, options.credible_mass))
                .or_else(|| {
                    set.mass_function(kind)
                        .map(|pmf| summarize_mass(kind, pmf, options.credible_mass))
                })
        })
        .collect();
    Ok(DistributionSummaries {
        credible_mass: options.credible_mass,
        rows,
    })
}

fn summarize_curve(
    kind: DistributionKind,
    curve: &DensityCurve,
    credible_mass: f64,
) -> DistributionSummary {
    let (a, b) = (curve.alpha, curve.beta);
    let sum = a + b;
    let variance = a * b / (sum * sum * (sum + 1.0));
    let mode = if a > 1.0 && b > 1.0 {
        Some((a - 1.0) / (sum - 2.0))
    } else if (a <= 1.0 && b > 1.0) || (a < 1.0 && b >= 1.0) {
        Some(0.0)
    } else if (b <= 1.0 && a > 1.0) || (b < 1.0 && a >= 1.0) {
        Some(1.0)
    } else {
        // U-shaped or flat
        None
    };
    let tail = 0.5 * (1.0 - credible_mass);
    DistributionSummary {
        kind,
        mean: a / sum,
        std_dev: variance.sqrt(),
        mode,
        interval_low: beta_quantile(tail, a, b),
        interval_high: beta_quantile(1.0 - tail, a, b),
    }
}

fn summarize_mass(
    kind: DistributionKind,
    pmf: &MassFunction,
    credible_mass: f64,
) -> DistributionSummary {
    let mean = pmf.mean();
    let variance: f64 = pmf
        .points()
        .map(|(count, mass)| {
            let diff = count_to_f64(count) - mean;
            diff * diff * mass
        })
        .sum();

    let mut mode = (pmf.offset, f64::NEG_INFINITY);
    for (count, mass) in pmf.points() {
        if mass > mode.1 {
            mode = (count, mass);
        }
    }

    let tail = 0.5 * (1.0 - credible_mass);
    let low = cumulative_crossing(pmf, tail);
    let high = cumulative_crossing(pmf, 1.0 - tail);
    DistributionSummary {
        kind,
        mean,
        std_dev: variance.max(0.0).sqrt(),
        mode: Some(count_to_f64(mode.0)),
        interval_low: count_to_f64(low),
        interval_high: count_to_f64(high),
    }
}

// Smallest count whose cumulative mass reaches `level`.
fn cumulative_crossing(pmf: &MassFunction, level: f64) -> u64 {
    let mut cumulative = 0.0;
    for (count, mass) in pmf.points() {
        cumulative += mass;
        if cumulative >= level - 1e-12 {
            return count;
        }
    }
    pmf.last_count()
}

/// Render summaries to a formatted table using `comfy_table`.
#[must_use]
pub fn render_summary_table(summaries: &DistributionSummaries, precision: usize) -> String {
    let interval = format!("{:.0}% interval", summaries.credible_mass * 100.0);
    let mut table = make_table(&["distribution", "mean", "sd", "mode", interval.as_str()]);
    for row in &summaries.rows {
        let digits = if row.kind.is_continuous() { precision } else { 0 };
        table.add_row(vec![
            Cell::new(row.kind.title()).add_attribute(Attribute::Bold),
            number_cell(row.mean, precision),
            number_cell(row.std_dev, precision),
            row.mode
                .map_or_else(|| Cell::new("-"), |mode| number_cell(mode, digits)),
            Cell::new(format!(
                "[{:.digits$}, {:.digits$}]",
                row.interval_low, row.interval_high
            ))
            .set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// Render the validated parameter tuple as a two-column table.
#[must_use]
pub fn render_parameter_table(set: &DistributionSet, precision: usize) -> String {
    let params = &set.parameters;
    let observation = params.observation;
    let mut table = make_table(&["parameter", "value"]);
    let rows = [
        ("alpha", format!("{:.precision$}", params.prior.alpha)),
        ("beta", format!("{:.precision$}", params.prior.beta)),
        ("left-handed", observation.left_count.to_string()),
        ("right-handed", observation.right_count.to_string()),
        ("population", params.population_size.to_string()),
        ("unobserved", params.remaining().to_string()),
        (
            "observed rate",
            format!("{:.precision$}", observation.left_rate()),
        ),
    ];
    for (name, value) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

fn make_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    table
}

fn number_cell(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
}
