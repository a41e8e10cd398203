//! Phillips-Perron Z-tau test, constant-only regression.
//!
//! Fits `y[t] = c + rho * y[t-1] + u[t]` and corrects the t-statistic of
//! `rho - 1` for serial correlation in `u` with a Bartlett-kernel (Newey-West)
//! long-run variance. No lagged differences enter the regression, which makes
//! it a useful cross-check on the ADF lag choice.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    check_input, mackinnon, ols, schwert_lags, StationarityError, TestKind, TestStatistic,
};

const TEST: TestKind = TestKind::PhillipsPerron;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PpConfig {
    /// Newey-West bandwidth. `None` uses `ceil(12 * (n/100)^(1/4))`.
    pub lags: Option<usize>,
}

/// Run the Phillips-Perron test on `values`.
pub fn phillips_perron_test(
    values: &[f64],
    config: &PpConfig,
) -> Result<TestStatistic, StationarityError> {
    check_input(TEST, values)?;

    let n = values.len();
    let lags = config.lags.unwrap_or_else(|| schwert_lags(n));
    let nobs = n - 1;
    if nobs < 2 + lags {
        return Err(StationarityError::non_computable(
            TEST,
            format!("{n} observations are too few for bandwidth {lags}"),
        ));
    }

    let y = DVector::from_iterator(nobs, values[1..].iter().copied());
    let x = DMatrix::from_fn(nobs, 2, |r, c| if c == 0 { 1.0 } else { values[r] });
    let fit = ols::fit(&y, &x).map_err(|e| StationarityError::non_computable(TEST, e.to_string()))?;

    let t = nobs as f64;
    let u = &fit.residuals;
    let gamma0 = u.norm_squared() / t;
    let long_run = (1..=lags).fold(gamma0, |acc, j| {
        let weight = 1.0 - j as f64 / (lags as f64 + 1.0);
        let gamma_j = (j..nobs).map(|i| u[i] * u[i - j]).sum::<f64>() / t;
        acc + 2.0 * weight * gamma_j
    });
    if long_run.is_nan() || long_run <= 0.0 {
        return Err(StationarityError::non_computable(
            TEST,
            "long-run variance is not positive",
        ));
    }

    let rho = fit.params[1];
    let sigma = fit.std_errors[1];
    let s = (fit.ssr / (nobs - fit.k()) as f64).sqrt();
    let lambda = long_run.sqrt();

    let statistic = (gamma0 / long_run).sqrt() * (rho - 1.0) / sigma
        - 0.5 * ((long_run - gamma0) / lambda) * (t * sigma / s);
    if !statistic.is_finite() {
        return Err(StationarityError::non_computable(
            TEST,
            "statistic is not finite",
        ));
    }

    debug!(lags, nobs, statistic, "Phillips-Perron regression fitted");
    Ok(TestStatistic {
        test: TEST,
        statistic,
        p_value: mackinnon::p_value(statistic),
        critical_values: mackinnon::critical_values(nobs),
        lags,
        nobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stationarity::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    #[test]
    fn white_noise_rejects_unit_root() {
        let values = noise(250, 42);
        let stat = phillips_perron_test(&values, &PpConfig::default()).unwrap();
        assert!(stat.p_value < 0.01, "p = {}", stat.p_value);
        assert_eq!(stat.lags, 16);
        assert_eq!(stat.nobs, 249);
    }

    #[test]
    fn zero_bandwidth_is_plain_dickey_fuller() {
        // With no kernel terms the correction vanishes and Z-tau is the
        // ordinary t-statistic of rho - 1.
        let values = noise(100, 5);
        let stat = phillips_perron_test(&values, &PpConfig { lags: Some(0) }).unwrap();

        let y = DVector::from_iterator(99, values[1..].iter().copied());
        let x = DMatrix::from_fn(99, 2, |r, c| if c == 0 { 1.0 } else { values[r] });
        let fit = ols::fit(&y, &x).unwrap();
        let df_tau = (fit.params[1] - 1.0) / fit.std_errors[1];
        assert!((stat.statistic - df_tau).abs() < 1e-9);
    }

    #[test]
    fn bandwidth_larger_than_sample_is_rejected() {
        let values = noise(10, 1);
        let err = phillips_perron_test(&values, &PpConfig { lags: Some(20) }).unwrap_err();
        assert!(matches!(
            err,
            StationarityError::NonComputableStatistic {
                test: TestKind::PhillipsPerron,
                ..
            }
        ));
    }

    #[test]
    fn identical_input_is_bit_identical() {
        let values = noise(120, 9);
        let a = phillips_perron_test(&values, &PpConfig::default()).unwrap();
        let b = phillips_perron_test(&values, &PpConfig::default()).unwrap();
        assert_eq!(a.statistic.to_bits(), b.statistic.to_bits());
    }

    // Reference values: arch `PhillipsPerron(x, trend="c", test_type="tau")`
    // with the default bandwidth, regression evaluated in exact arithmetic.

    #[test]
    fn matches_reference_on_stationary_series() {
        let values = fixtures::lcg_ar2(150);
        let stat = phillips_perron_test(&values, &PpConfig::default()).unwrap();
        assert_eq!(stat.lags, 14);
        assert_eq!(stat.nobs, 149);
        assert!((stat.statistic - -2.884541399927982).abs() < 1e-6);
        assert!((stat.p_value - 0.047175379714452015).abs() < 1e-6);
    }

    #[test]
    fn matches_reference_on_integrated_series() {
        let values = fixtures::cumulative(&fixtures::lcg_ar2(150));
        let stat = phillips_perron_test(&values, &PpConfig::default()).unwrap();
        assert_eq!(stat.lags, 14);
        assert_eq!(stat.nobs, 149);
        assert!((stat.statistic - -1.313410714566715).abs() < 1e-6);
        assert!((stat.p_value - 0.6230147806881345).abs() < 1e-6);
    }
}
