//! Sampled series produced by the engine.

use std::fmt;

use serde::Serialize;

use super::density::beta_cdf;
use crate::utils::{count_to_f64, trapezoid};

/// The six distributions shown in the handedness grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    Prior,
    Likelihood,
    Posterior,
    PriorPredictive,
    PlugIn,
    PosteriorPredictive,
}

impl DistributionKind {
    /// All kinds in grid order (row-major).
    pub const ALL: [Self; 6] = [
        Self::Prior,
        Self::Likelihood,
        Self::Posterior,
        Self::PriorPredictive,
        Self::PlugIn,
        Self::PosteriorPredictive,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Prior => "Prior",
            Self::Likelihood => "Likelihood",
            Self::Posterior => "Posterior",
            Self::PriorPredictive => "Prior Predictive Distribution",
            Self::PlugIn => "Predictions given MLE",
            Self::PosteriorPredictive => "Posterior Predictive Distribution",
        }
    }

    /// Whether the distribution is a density over the rate `p`.
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(self, Self::Prior | Self::Likelihood | Self::Posterior)
    }

    /// Whether the distribution is only produced once something was observed.
    #[must_use]
    pub const fn requires_observations(self) -> bool {
        !matches!(self, Self::Prior | Self::PriorPredictive)
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Beta density sampled on a grid over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub alpha: f64,
    pub beta: f64,
    pub x: Vec<f64>,
    pub density: Vec<f64>,
}

impl DensityCurve {
    /// `(p, density)` pairs in grid order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.density.iter().copied())
    }

    /// Area under the sampled curve.
    ///
    /// Trapezoid rule between finite samples. An interval that touches a
    /// diverging endpoint contributes its exact mass from [`beta_cdf`].
    #[must_use]
    pub fn area(&self) -> f64 {
        let diverging: f64 = self
            .x
            .windows(2)
            .zip(self.density.windows(2))
            .filter(|(_, y)| !(y[0].is_finite() && y[1].is_finite()))
            .map(|(x, _)| {
                beta_cdf(x[1], self.alpha, self.beta) - beta_cdf(x[0], self.alpha, self.beta)
            })
            .sum();
        trapezoid(&self.x, &self.density) + diverging
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Discrete family that generated a [`MassFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DiscreteFamily {
    Binomial { trials: u64, p: f64 },
    BetaBinomial { trials: u64, alpha: f64, beta: f64 },
}

impl DiscreteFamily {
    #[must_use]
    pub const fn trials(self) -> u64 {
        match self {
            Self::Binomial { trials, .. } | Self::BetaBinomial { trials, .. } => trials,
        }
    }
}

/// Probability mass over the contiguous counts `offset ..= offset + trials`.
///
/// `mass[j]` is the probability of `offset + j` left-handed people in total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassFunction {
    pub family: DiscreteFamily,
    pub offset: u64,
    pub mass: Vec<f64>,
}

impl MassFunction {
    /// Absolute counts covered by the support.
    pub fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.mass.len() as u64).map(move |j| self.offset + j)
    }

    /// `(count, mass)` pairs in increasing count order.
    pub fn points(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.counts().zip(self.mass.iter().copied())
    }

    /// Mass at an absolute count; `0` outside the support.
    #[must_use]
    pub fn mass_at(&self, count: u64) -> f64 {
        count
            .checked_sub(self.offset)
            .and_then(|j| usize::try_from(j).ok())
            .and_then(|j| self.mass.get(j).copied())
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Largest count in the support.
    #[must_use]
    pub fn last_count(&self) -> u64 {
        self.offset + self.family.trials()
    }

    /// Expected absolute count.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.points()
            .map(|(count, mass)| count_to_f64(count) * mass)
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mass.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }
}
