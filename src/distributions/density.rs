//! Closed-form Beta, Binomial and Beta-Binomial evaluation.
//!
//! Every function here assumes strictly positive, finite shape parameters;
//! the engine checks them before calling in.

use std::cmp::Ordering;

use statrs::function::beta::beta_reg;
use statrs::function::factorial::ln_binomial;
use statrs::function::gamma::ln_gamma;

use crate::utils::count_to_f64;

const QUANTILE_ITERATIONS: usize = 200;
const QUANTILE_TOLERANCE: f64 = 1.0e-12;

/// Natural log of the Beta function `B(a, b)`.
#[must_use]
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Density of `Beta(alpha, beta)` at `x`.
///
/// Outside `[0, 1]` the density is `0`. At the endpoints the density is the
/// one-sided limit, which is `+inf` for a shape below one.
#[must_use]
pub fn beta_density(x: f64, alpha: f64, beta: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return 0.0;
    }
    if x == 0.0 {
        return endpoint_density(alpha, beta);
    }
    if x == 1.0 {
        return endpoint_density(beta, alpha);
    }
    let log_kernel = (alpha - 1.0).mul_add(x.ln(), (beta - 1.0) * (-x).ln_1p());
    (log_kernel - ln_beta(alpha, beta)).exp()
}

// `near` is the shape attached to the endpoint being evaluated.
fn endpoint_density(near: f64, far: f64) -> f64 {
    match near.partial_cmp(&1.0) {
        Some(Ordering::Less) => f64::INFINITY,
        Some(Ordering::Equal) => (-ln_beta(1.0, far)).exp(),
        _ => 0.0,
    }
}

/// CDF of `Beta(alpha, beta)` via the regularized incomplete beta function.
#[must_use]
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else {
        beta_reg(alpha, beta, x)
    }
}

/// Inverse CDF of `Beta(alpha, beta)` by bisection on [`beta_cdf`].
#[must_use]
pub fn beta_quantile(probability: f64, alpha: f64, beta: f64) -> f64 {
    if probability <= 0.0 {
        return 0.0;
    }
    if probability >= 1.0 {
        return 1.0;
    }
    let mut low = 0.0_f64;
    let mut high = 1.0_f64;
    for _ in 0..QUANTILE_ITERATIONS {
        let mid = 0.5 * (low + high);
        if beta_cdf(mid, alpha, beta) < probability {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < QUANTILE_TOLERANCE {
            break;
        }
    }
    0.5 * (low + high)
}

/// Probability mass of `Binomial(trials, p)` at `k`.
///
/// `p` of exactly `0` or `1` places all mass on `0` or `trials`.
#[must_use]
pub fn binomial_mass(k: u64, trials: u64, p: f64) -> f64 {
    if k > trials {
        return 0.0;
    }
    if p <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p >= 1.0 {
        return if k == trials { 1.0 } else { 0.0 };
    }
    let successes = count_to_f64(k);
    let failures = count_to_f64(trials - k);
    let log_mass = successes.mul_add(p.ln(), failures * (-p).ln_1p());
    (ln_binomial(trials, k) + log_mass).exp()
}

/// Probability mass of `BetaBinomial(trials, alpha, beta)` at `k`.
#[must_use]
pub fn beta_binomial_mass(k: u64, trials: u64, alpha: f64, beta: f64) -> f64 {
    if k > trials {
        return 0.0;
    }
    let successes = count_to_f64(k);
    let failures = count_to_f64(trials - k);
    let log_mass = ln_binomial(trials, k) + ln_beta(successes + alpha, failures + beta)
        - ln_beta(alpha, beta);
    log_mass.exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn uniform_beta_density_is_one_everywhere() {
        for x in [0.0, 0.3, 0.5, 1.0] {
            assert_relative_eq!(beta_density(x, 1.0, 1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn beta_density_matches_closed_form() {
        // Beta(4, 3): 60 x^3 (1 - x)^2
        let x: f64 = 0.4;
        let expected = 60.0 * x.powi(3) * (1.0 - x).powi(2);
        assert_relative_eq!(beta_density(x, 4.0, 3.0), expected, max_relative = 1e-12);
    }

    #[test]
    fn beta_density_endpoint_limits() {
        assert!(beta_density(0.0, 0.5, 2.0).is_infinite());
        assert_relative_eq!(beta_density(0.0, 1.0, 3.0), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(beta_density(0.0, 2.0, 2.0), 0.0);
        assert_abs_diff_eq!(beta_density(1.0, 2.0, 2.0), 0.0);
        assert_relative_eq!(beta_density(1.0, 5.0, 1.0), 5.0, epsilon = 1e-12);
        assert!(beta_density(1.0, 2.0, 0.5).is_infinite());
    }

    #[test]
    fn beta_density_is_zero_outside_unit_interval() {
        assert_abs_diff_eq!(beta_density(-0.1, 2.0, 2.0), 0.0);
        assert_abs_diff_eq!(beta_density(1.1, 2.0, 2.0), 0.0);
    }

    #[test]
    fn beta_quantile_inverts_cdf() {
        let q = beta_quantile(0.975, 4.0, 3.0);
        assert_relative_eq!(beta_cdf(q, 4.0, 3.0), 0.975, epsilon = 1e-9);
        assert_relative_eq!(beta_quantile(0.5, 2.0, 2.0), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn binomial_mass_matches_closed_form() {
        // C(15, 12) 0.8^12 0.2^3
        let expected = 455.0 * 0.8_f64.powi(12) * 0.2_f64.powi(3);
        assert_relative_eq!(binomial_mass(12, 15, 0.8), expected, max_relative = 1e-10);
    }

    #[test]
    fn binomial_mass_degenerate_rates() {
        assert_abs_diff_eq!(binomial_mass(0, 5, 0.0), 1.0);
        assert_abs_diff_eq!(binomial_mass(1, 5, 0.0), 0.0);
        assert_abs_diff_eq!(binomial_mass(5, 5, 1.0), 1.0);
        assert_abs_diff_eq!(binomial_mass(4, 5, 1.0), 0.0);
        assert_abs_diff_eq!(binomial_mass(0, 0, 0.3), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn beta_binomial_with_flat_prior_is_uniform() {
        for k in 0..=10 {
            assert_relative_eq!(
                beta_binomial_mass(k, 10, 1.0, 1.0),
                1.0 / 11.0,
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn beta_binomial_without_trials_is_certain() {
        assert_abs_diff_eq!(beta_binomial_mass(0, 0, 4.0, 3.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(beta_binomial_mass(1, 0, 4.0, 3.0), 0.0);
    }
}
