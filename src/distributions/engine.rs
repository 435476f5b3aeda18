/////////////////////////////////////////////////////////////////////////////////////////////\
//
// Prior, likelihood, posterior and predictive distributions for a binary trait.
//
// Created on: 18 Oct 2026     Author: Tobias Kragholm
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Distribution engine
//!
//! Computes the six distributions of the handedness grid from a validated
//! parameter tuple. With `total = left + right` and
//! `remaining = population - total`:
//!
//! - prior: `Beta(alpha, beta)` on a uniform grid over `[0, 1]`;
//! - likelihood: `Beta(left + 1, right + 1)`;
//! - posterior: `Beta(alpha + left, beta + right)`;
//! - prior predictive: `BetaBinomial(population, alpha, beta)`;
//! - plug-in prediction: `Binomial(remaining, left / total)` shifted by `left`;
//! - posterior predictive: `BetaBinomial(remaining, alpha + left, beta + right)`
//!   shifted by `left`.
//!
//! Everything except the prior and the prior predictive is omitted when
//! nothing has been observed. A zero shape parameter makes the prior
//! improper; the engine rejects it with
//! [`DistributionError::DegenerateDistribution`] instead of sampling NaN.

use serde::Serialize;
use thiserror::Error;

use super::density::{beta_binomial_mass, beta_density, binomial_mass};
use super::series::{DensityCurve, DiscreteFamily, DistributionKind, MassFunction};
use crate::input::{MAX_POPULATION, ModelParameters, PriorSpec};
use crate::utils::{contains_nan, linspace};

/// Grid resolution used by the reference plots.
pub const DEFAULT_RESOLUTION: usize = 1_000;

/// Errors returned by the distribution engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistributionError {
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    #[error("{distribution} is degenerate for Beta({alpha}, {beta}): shape parameters must be positive")]
    DegenerateDistribution {
        distribution: DistributionKind,
        alpha: f64,
        beta: f64,
    },
    #[error("{distribution} produced non-finite values")]
    NumericalFailure { distribution: DistributionKind },
}

/// Evaluation settings for the engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Number of grid points for the Beta curves, endpoints included.
    pub resolution: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl EngineOptions {
    /// # Errors
    ///
    /// Returns `DistributionError::InvalidParameter` if the grid cannot span
    /// both endpoints.
    pub fn validate(self) -> Result<(), DistributionError> {
        if self.resolution < 2 {
            return Err(DistributionError::InvalidParameter {
                parameter: "resolution",
                reason: format!("must be at least 2, got {}", self.resolution),
            });
        }
        Ok(())
    }
}

/// The six distributions for one parameter tuple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSet {
    pub parameters: ModelParameters,
    pub prior: DensityCurve,
    pub likelihood: Option<DensityCurve>,
    pub posterior: Option<DensityCurve>,
    pub prior_predictive: MassFunction,
    pub plug_in: Option<MassFunction>,
    pub posterior_predictive: Option<MassFunction>,
}

impl DistributionSet {
    /// Density curve for a continuous kind, if it was produced.
    #[must_use]
    pub const fn curve(&self, kind: DistributionKind) -> Option<&DensityCurve> {
        match kind {
            DistributionKind::Prior => Some(&self.prior),
            DistributionKind::Likelihood => self.likelihood.as_ref(),
            DistributionKind::Posterior => self.posterior.as_ref(),
            _ => None,
        }
    }

    /// Mass function for a discrete kind, if it was produced.
    #[must_use]
    pub const fn mass_function(&self, kind: DistributionKind) -> Option<&MassFunction> {
        match kind {
            DistributionKind::PriorPredictive => Some(&self.prior_predictive),
            DistributionKind::PlugIn => self.plug_in.as_ref(),
            DistributionKind::PosteriorPredictive => self.posterior_predictive.as_ref(),
            _ => None,
        }
    }

    /// Whether any observation-dependent distribution is present.
    #[must_use]
    pub const fn has_observations(&self) -> bool {
        self.posterior.is_some()
    }
}

/// Compute all distributions with the default grid.
///
/// # Errors
///
/// Returns `DistributionError` if the parameters are invalid or the prior is
/// improper.
pub fn compute(parameters: &ModelParameters) -> Result<DistributionSet, DistributionError> {
    compute_with_options(parameters, EngineOptions::default())
}

/// Compute all distributions.
///
/// # Errors
///
/// Returns `DistributionError::InvalidParameter` for negative or non-finite
/// shapes, an empty population, a population above [`MAX_POPULATION`], or a
/// population smaller than the observed total. Returns `DistributionError::DegenerateDistribution` when a shape
/// parameter is exactly zero.
pub fn compute_with_options(
    parameters: &ModelParameters,
    options: EngineOptions,
) -> Result<DistributionSet, DistributionError> {
    options.validate()?;
    check_parameters(parameters)?;

    let prior = parameters.prior;
    let observation = parameters.observation;
    let total = observation.total();
    let remaining = parameters.remaining();
    let grid = linspace(0.0, 1.0, options.resolution);

    let prior_curve = density_curve(DistributionKind::Prior, prior, &grid)?;
    let prior_predictive = beta_binomial(
        DistributionKind::PriorPredictive,
        prior,
        parameters.population_size,
        0,
    )?;

    let (likelihood, posterior, plug_in, posterior_predictive) = if total > 0 {
        let flat = PriorSpec::new(1.0, 1.0).update(observation);
        let updated = prior.update(observation);
        let p_hat = observation.left_rate();
        (
            Some(density_curve(DistributionKind::Likelihood, flat, &grid)?),
            Some(density_curve(DistributionKind::Posterior, updated, &grid)?),
            Some(binomial(p_hat, remaining, observation.left_count)),
            Some(beta_binomial(
                DistributionKind::PosteriorPredictive,
                updated,
                remaining,
                observation.left_count,
            )?),
        )
    } else {
        (None, None, None, None)
    };

    tracing::debug!(
        alpha = prior.alpha,
        beta = prior.beta,
        left = observation.left_count,
        right = observation.right_count,
        population = parameters.population_size,
        remaining,
        "computed handedness distributions"
    );

    Ok(DistributionSet {
        parameters: *parameters,
        prior: prior_curve,
        likelihood,
        posterior,
        prior_predictive,
        plug_in,
        posterior_predictive,
    })
}

fn check_parameters(parameters: &ModelParameters) -> Result<(), DistributionError> {
    let prior = parameters.prior;
    for (name, value) in [("alpha", prior.alpha), ("beta", prior.beta)] {
        if !value.is_finite() || value < 0.0 {
            return Err(DistributionError::InvalidParameter {
                parameter: name,
                reason: format!("must be finite and non-negative, got {value}"),
            });
        }
    }
    if parameters.population_size == 0 {
        return Err(DistributionError::InvalidParameter {
            parameter: "population_size",
            reason: "must be at least 1".to_string(),
        });
    }
    if parameters.population_size > MAX_POPULATION {
        return Err(DistributionError::InvalidParameter {
            parameter: "population_size",
            reason: format!(
                "must be at most {MAX_POPULATION}, got {}",
                parameters.population_size
            ),
        });
    }
    let total = parameters
        .observation
        .checked_total()
        .ok_or_else(|| DistributionError::InvalidParameter {
            parameter: "observation",
            reason: "observed counts overflow".to_string(),
        })?;
    if parameters.population_size < total {
        return Err(DistributionError::InvalidParameter {
            parameter: "population_size",
            reason: format!(
                "population ({}) is smaller than the observed total ({total})",
                parameters.population_size
            ),
        });
    }
    Ok(())
}

fn ensure_proper(kind: DistributionKind, shapes: PriorSpec) -> Result<(), DistributionError> {
    if shapes.alpha > 0.0 && shapes.beta > 0.0 {
        return Ok(());
    }
    tracing::warn!(
        distribution = %kind,
        alpha = shapes.alpha,
        beta = shapes.beta,
        "rejecting improper distribution"
    );
    Err(DistributionError::DegenerateDistribution {
        distribution: kind,
        alpha: shapes.alpha,
        beta: shapes.beta,
    })
}

fn density_curve(
    kind: DistributionKind,
    shapes: PriorSpec,
    grid: &[f64],
) -> Result<DensityCurve, DistributionError> {
    ensure_proper(kind, shapes)?;
    let density: Vec<f64> = grid
        .iter()
        .map(|&x| beta_density(x, shapes.alpha, shapes.beta))
        .collect();
    if contains_nan(&density) {
        return Err(DistributionError::NumericalFailure { distribution: kind });
    }
    Ok(DensityCurve {
        alpha: shapes.alpha,
        beta: shapes.beta,
        x: grid.to_vec(),
        density,
    })
}

fn beta_binomial(
    kind: DistributionKind,
    shapes: PriorSpec,
    trials: u64,
    offset: u64,
) -> Result<MassFunction, DistributionError> {
    ensure_proper(kind, shapes)?;
    let mass: Vec<f64> = (0..=trials)
        .map(|k| beta_binomial_mass(k, trials, shapes.alpha, shapes.beta))
        .collect();
    if mass.iter().any(|value| !value.is_finite()) {
        return Err(DistributionError::NumericalFailure { distribution: kind });
    }
    Ok(MassFunction {
        family: DiscreteFamily::BetaBinomial {
            trials,
            alpha: shapes.alpha,
            beta: shapes.beta,
        },
        offset,
        mass,
    })
}

fn binomial(p: f64, trials: u64, offset: u64) -> MassFunction {
    MassFunction {
        family: DiscreteFamily::Binomial { trials, p },
        offset,
        mass: (0..=trials).map(|k| binomial_mass(k, trials, p)).collect(),
    }
}
