//! # Parameter intake
//!
//! Validates the five scalar controls (prior shapes, observed counts and the
//! requested population size) and enforces the population floor: the
//! population can never be smaller than the number of people already observed.
//!
//! The floor is a pure function of the request. A host that wants the
//! population to stay raised after the observations shrink feeds the accepted
//! population back into its next request with
//! [`ParameterRequest::adopt_population`].
//!
//! # Examples
//!
//! ```
//! use handedness_models::{ParameterRequest, validate};
//!
//! let request = ParameterRequest {
//!     left_count: 8,
//!     right_count: 7,
//!     requested_population: 10,
//!     ..ParameterRequest::default()
//! };
//! let params = validate(&request).expect("valid request");
//!
//! assert_eq!(params.population_size, 15);
//! assert_eq!(params.remaining(), 0);
//! ```
//!
//! ```
//! use handedness_models::{ParameterRequest, validate};
//!
//! let request = ParameterRequest {
//!     alpha: -1.0,
//!     ..ParameterRequest::default()
//! };
//!
//! assert!(validate(&request).is_err());
//! ```

use serde::Serialize;
use thiserror::Error;

/// Default population offered by the input surface.
pub const DEFAULT_POPULATION: u64 = 10;

/// Largest population the engine will tabulate. Predictive supports hold one
/// mass per count, so this bounds their length.
pub const MAX_POPULATION: u64 = 1_000_000;

/// Errors returned when validating intake parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("shape parameter `{name}` must be finite, got {value}")]
    NonFiniteShape { name: &'static str, value: f64 },
    #[error("shape parameter `{name}` must be non-negative, got {value}")]
    NegativeShape { name: &'static str, value: f64 },
    #[error("requested population must be at least 1")]
    ZeroPopulation,
    #[error("population {population} exceeds the supported maximum of {max}")]
    PopulationTooLarge { population: u64, max: u64 },
    #[error("observed counts ({left} left, {right} right) overflow the population range")]
    CountOverflow { left: u64, right: u64 },
}

/// Shape parameters of the Beta prior on the left-handedness rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorSpec {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for PriorSpec {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

impl PriorSpec {
    #[must_use]
    pub const fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Conjugate update with the observed counts.
    #[must_use]
    pub fn update(self, observation: Observation) -> Self {
        Self {
            alpha: self.alpha + crate::utils::count_to_f64(observation.left_count),
            beta: self.beta + crate::utils::count_to_f64(observation.right_count),
        }
    }

    /// # Errors
    ///
    /// Returns `InputError` if either shape is negative or non-finite.
    pub fn validate(self) -> Result<(), InputError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() {
                return Err(InputError::NonFiniteShape { name, value });
            }
            if value < 0.0 {
                return Err(InputError::NegativeShape { name, value });
            }
        }
        Ok(())
    }
}

/// Observed left- and right-handed counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub left_count: u64,
    pub right_count: u64,
}

impl Observation {
    #[must_use]
    pub const fn new(left_count: u64, right_count: u64) -> Self {
        Self {
            left_count,
            right_count,
        }
    }

    /// Total number of people observed, or `None` on overflow.
    #[must_use]
    pub const fn checked_total(self) -> Option<u64> {
        self.left_count.checked_add(self.right_count)
    }

    /// Total number of people observed.
    ///
    /// Saturates at `u64::MAX`; validated parameters never get close.
    #[must_use]
    pub const fn total(self) -> u64 {
        self.left_count.saturating_add(self.right_count)
    }

    /// Observed share of left-handed people, `0` when nothing was observed.
    #[must_use]
    pub fn left_rate(self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => {
                crate::utils::count_to_f64(self.left_count) / crate::utils::count_to_f64(total)
            }
        }
    }
}

/// Raw values as they arrive from the input surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRequest {
    pub alpha: f64,
    pub beta: f64,
    pub left_count: u64,
    pub right_count: u64,
    pub requested_population: u64,
}

impl Default for ParameterRequest {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            left_count: 0,
            right_count: 0,
            requested_population: DEFAULT_POPULATION,
        }
    }
}

impl ParameterRequest {
    /// Carry the accepted population into the next request.
    ///
    /// This is the one-way ratchet of the input surface: once the population
    /// has been raised to cover the observations it stays raised until the
    /// user lowers it explicitly.
    pub const fn adopt_population(&mut self, accepted: &ModelParameters) {
        self.requested_population = accepted.population_size;
    }
}

/// Validated parameter tuple consumed by the distribution engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelParameters {
    pub prior: PriorSpec,
    pub observation: Observation,
    pub population_size: u64,
}

impl ModelParameters {
    #[must_use]
    pub const fn new(prior: PriorSpec, observation: Observation, population_size: u64) -> Self {
        Self {
            prior,
            observation,
            population_size,
        }
    }

    /// People in the population that have not been observed yet.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.population_size
            .saturating_sub(self.observation.total())
    }
}

/// Population floor: never smaller than the number of people observed.
#[must_use]
pub const fn ratchet_population(requested_population: u64, total_observed: u64) -> u64 {
    if requested_population < total_observed {
        total_observed
    } else {
        requested_population
    }
}

/// Validate a raw request and apply the population floor.
///
/// # Errors
///
/// Returns `InputError` if a shape parameter is negative or non-finite, the
/// requested population is zero, the observed counts overflow, or the
/// population after the floor exceeds [`MAX_POPULATION`].
pub fn validate(request: &ParameterRequest) -> Result<ModelParameters, InputError> {
    let prior = PriorSpec::new(request.alpha, request.beta);
    prior.validate()?;
    if request.requested_population == 0 {
        return Err(InputError::ZeroPopulation);
    }
    let observation = Observation::new(request.left_count, request.right_count);
    let total = observation
        .checked_total()
        .ok_or(InputError::CountOverflow {
            left: request.left_count,
            right: request.right_count,
        })?;
    let population_size = ratchet_population(request.requested_population, total);
    if population_size > MAX_POPULATION {
        return Err(InputError::PopulationTooLarge {
            population: population_size,
            max: MAX_POPULATION,
        });
    }
    if population_size != request.requested_population {
        tracing::debug!(
            requested = request.requested_population,
            population_size,
            "population raised to observed total"
        );
    }
    Ok(ModelParameters::new(prior, observation, population_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(left_count: u64, right_count: u64, requested_population: u64) -> ParameterRequest {
        ParameterRequest {
            left_count,
            right_count,
            requested_population,
            ..ParameterRequest::default()
        }
    }

    #[test]
    fn validate_raises_population_to_observed_total() {
        let params = validate(&request(6, 9, 10)).expect("valid request");
        assert_eq!(params.population_size, 15);
        assert_eq!(params.remaining(), 0);
    }

    #[test]
    fn validate_keeps_population_above_total() {
        let params = validate(&request(4, 1, 20)).expect("valid request");
        assert_eq!(params.population_size, 20);
        assert_eq!(params.remaining(), 15);
    }

    #[test]
    fn validate_accepts_zero_shape_parameters() {
        let params = validate(&ParameterRequest {
            alpha: 0.0,
            beta: 0.0,
            ..ParameterRequest::default()
        })
        .expect("zero shapes are boundary inputs");
        assert_eq!(params.prior, PriorSpec::new(0.0, 0.0));
    }

    #[test]
    fn validate_rejects_negative_shape() {
        let err = validate(&ParameterRequest {
            beta: -0.5,
            ..ParameterRequest::default()
        })
        .expect_err("negative beta should fail");
        assert_eq!(
            err,
            InputError::NegativeShape {
                name: "beta",
                value: -0.5
            }
        );
    }

    #[test]
    fn validate_rejects_non_finite_shape() {
        let err = validate(&ParameterRequest {
            alpha: f64::INFINITY,
            ..ParameterRequest::default()
        })
        .expect_err("infinite alpha should fail");
        assert!(matches!(
            err,
            InputError::NonFiniteShape { name: "alpha", .. }
        ));
    }

    #[test]
    fn validate_rejects_zero_population() {
        let err = validate(&request(0, 0, 0)).expect_err("zero population should fail");
        assert_eq!(err, InputError::ZeroPopulation);
    }

    #[test]
    fn validate_rejects_overflowing_counts() {
        let err = validate(&request(u64::MAX, 1, 10)).expect_err("overflow should fail");
        assert_eq!(
            err,
            InputError::CountOverflow {
                left: u64::MAX,
                right: 1
            }
        );
    }

    #[test]
    fn validate_rejects_population_above_maximum() {
        let err = validate(&request(0, 0, u64::MAX)).expect_err("huge population should fail");
        assert_eq!(
            err,
            InputError::PopulationTooLarge {
                population: u64::MAX,
                max: MAX_POPULATION
            }
        );
        assert!(validate(&request(0, 0, MAX_POPULATION)).is_ok());
    }

    #[test]
    fn validate_rejects_observed_total_above_maximum() {
        let err = validate(&request(MAX_POPULATION, 1, 10)).expect_err("floor exceeds maximum");
        assert_eq!(
            err,
            InputError::PopulationTooLarge {
                population: MAX_POPULATION + 1,
                max: MAX_POPULATION
            }
        );
    }

    #[test]
    fn adopted_population_survives_shrinking_observations() {
        let mut raw = request(12, 8, 10);
        let first = validate(&raw).expect("valid request");
        raw.adopt_population(&first);
        assert_eq!(raw.requested_population, 20);

        raw.left_count = 1;
        raw.right_count = 1;
        let second = validate(&raw).expect("valid request");
        assert_eq!(second.population_size, 20);
    }

    #[test]
    fn left_rate_is_zero_without_observations() {
        assert!(Observation::default().left_rate().abs() < 1e-15);
        assert!((Observation::new(4, 1).left_rate() - 0.8).abs() < 1e-15);
    }

    #[test]
    fn prior_update_adds_counts_to_shapes() {
        let posterior = PriorSpec::new(1.0, 1.0).update(Observation::new(3, 2));
        assert_eq!(posterior, PriorSpec::new(4.0, 3.0));
    }
}
