/////////////////////////////////////////////////////////////////////////////////////////////\
//
// Shared numeric helpers for grids, conversions and quadrature.
//
// Created on: 18 Oct 2026     Author: Tobias Kragholm
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities
//!
//! Shared helpers for evaluation grids, lossless-enough integer conversions,
//! and simple numerical checks on sampled series.

use num_traits::ToPrimitive;

#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Convert a population count to `f64`.
///
/// Counts above 2^53 lose precision, which is far beyond any population
/// the engine is asked to enumerate.
#[must_use]
pub fn count_to_f64(value: u64) -> f64 {
    value.to_f64().unwrap_or(f64::MAX)
}

/// `points` uniformly spaced values covering `[start, end]` inclusive.
///
/// The final element is pinned to `end` so the grid never overshoots the
/// support of a distribution.
#[must_use]
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / usize_to_f64(points - 1);
            let mut grid: Vec<f64> = (0..points)
                .map(|i| step.mul_add(usize_to_f64(i), start))
                .collect();
            grid[points - 1] = end;
            grid
        }
    }
}

/// Trapezoid-rule integral of `ys` sampled at `xs`.
///
/// Non-finite samples contribute nothing.
#[must_use]
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| {
            if y[0].is_finite() && y[1].is_finite() {
                0.5 * (x[1] - x[0]) * (y[0] + y[1])
            } else {
                0.0
            }
        })
        .sum()
}

/// Largest finite value in `values`, if any.
#[must_use]
pub fn max_finite(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |max, value| match max {
            Some(current) if current >= value => Some(current),
            _ => Some(value),
        })
}

#[must_use]
pub fn contains_nan(values: &[f64]) -> bool {
    values.iter().any(|value| value.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_covers_both_endpoints() {
        let grid = linspace(0.0, 1.0, 1000);
        assert_eq!(grid.len(), 1000);
        assert_relative_eq!(grid[0], 0.0);
        assert_relative_eq!(grid[999], 1.0);
        assert_relative_eq!(grid[1] - grid[0], 1.0 / 999.0, epsilon = 1e-15);
    }

    #[test]
    fn linspace_handles_tiny_grids() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.25, 1.0, 1), vec![0.25]);
    }

    #[test]
    fn trapezoid_integrates_linear_function_exactly() {
        let xs = linspace(0.0, 1.0, 11);
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x).collect();
        assert_relative_eq!(trapezoid(&xs, &ys), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn trapezoid_skips_infinite_endpoints() {
        let xs = [0.0, 0.5, 1.0];
        let ys = [f64::INFINITY, 1.0, 1.0];
        assert_relative_eq!(trapezoid(&xs, &ys), 0.5);
    }

    #[test]
    fn max_finite_ignores_infinities_and_nan() {
        let max = max_finite([1.0, f64::INFINITY, 3.0, f64::NAN, 2.0]);
        assert_eq!(max, Some(3.0));
        assert_eq!(max_finite([f64::INFINITY]), None);
    }

    #[test]
    fn count_to_f64_is_exact_for_small_counts() {
        assert_relative_eq!(count_to_f64(1_234), 1_234.0);
    }
}
