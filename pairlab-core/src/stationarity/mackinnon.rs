//! MacKinnon response surfaces for the Dickey-Fuller tau distribution.
//!
//! Only the constant-only, single-series case is tabulated: that is the
//! regression both unit-root tests in this crate run.
//!
//! - p-values: MacKinnon (1994), normal-CDF of a polynomial in tau.
//! - critical values: MacKinnon (2010), polynomial in 1/nobs.

use super::CriticalValues;
use statrs::function::erf::erfc;

/// Above this tau the p-value is 1.
const TAU_MAX: f64 = 2.74;
/// Below this tau the p-value is 0.
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials.
const TAU_STAR: f64 = -1.61;

const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

const CRIT_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Evaluate `c[0] + c[1] x + c[2] x^2 + ...` (Horner).
fn polyval(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Approximate p-value of a Dickey-Fuller tau statistic (constant, no trend).
pub fn p_value(tau: f64) -> f64 {
    if tau > TAU_MAX {
        return 1.0;
    }
    if tau < TAU_MIN {
        return 0.0;
    }
    let coefs: &[f64] = if tau <= TAU_STAR { &SMALL_P } else { &LARGE_P };
    standard_normal_cdf(polyval(coefs, tau))
}

fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Finite-sample 1%, 5%, 10% critical values for `nobs` observations.
pub fn critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs as f64;
    CriticalValues {
        one_pct: polyval(&CRIT_1, inv),
        five_pct: polyval(&CRIT_5, inv),
        ten_pct: polyval(&CRIT_10, inv),
    }
}
