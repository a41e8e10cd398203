//! Unit-root testing of a spread.
//!
//! Two independent tests run against the same series:
//! - Augmented Dickey-Fuller: lagged differences soak up serial correlation,
//!   lag order chosen by information criterion.
//! - Phillips-Perron: plain Dickey-Fuller regression, Newey-West correction of
//!   the t-statistic.
//!
//! Both share the null hypothesis "the series has a unit root". A test declares
//! the spread stationary when its p-value is below the configured threshold.
//! The two verdicts are reported side by side and never merged.
//!
//! Everything here is pure and deterministic: the same input always yields
//! bit-identical statistics.

pub mod adf;
pub mod mackinnon;
mod ols;
pub mod pp;

pub use adf::{adf_test, AdfConfig, LagSelection};
pub use pp::{phillips_perron_test, PpConfig};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Default significance threshold. Deliberately looser than the textbook 0.05:
/// it trades more false positives for sensitivity to weak mean reversion.
pub const DEFAULT_THRESHOLD: f64 = 0.30;

/// Below this many observations lag selection and the asymptotic p-values are
/// unreliable. Shorter series are still tested, with a warning.
pub const MIN_RELIABLE_OBSERVATIONS: usize = 20;

/// A range at or below this fraction of the largest magnitude is no variation.
const RELATIVE_RANGE_TOLERANCE: f64 = 1e-10;

/// Which unit-root test produced a statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    AugmentedDickeyFuller,
    PhillipsPerron,
}

impl TestKind {
    /// Short label used in reports ("ADF", "Phillips-Perron").
    pub fn label(&self) -> &'static str {
        match self {
            TestKind::AugmentedDickeyFuller => "ADF",
            TestKind::PhillipsPerron => "Phillips-Perron",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StationarityError {
    #[error("{test} statistic is not computable: {reason}")]
    NonComputableStatistic { test: TestKind, reason: String },
}

impl StationarityError {
    pub(crate) fn non_computable(test: TestKind, reason: impl Into<String>) -> Self {
        StationarityError::NonComputableStatistic {
            test,
            reason: reason.into(),
        }
    }
}

/// Critical values of the tau distribution at the usual levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

/// Raw output of one unit-root test, before a threshold is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    pub test: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
    /// ADF: lagged differences used. PP: Newey-West bandwidth.
    pub lags: usize,
    /// Observations in the final regression.
    pub nobs: usize,
}

impl TestStatistic {
    pub fn verdict(&self, threshold: f64) -> StationarityVerdict {
        StationarityVerdict {
            test: self.test,
            statistic: self.statistic,
            p_value: self.p_value,
            critical_values: self.critical_values,
            lags: self.lags,
            nobs: self.nobs,
            threshold,
            is_stationary: self.p_value < threshold,
        }
    }
}

/// A test result with the pass/fail decision attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationarityVerdict {
    pub test: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
    pub lags: usize,
    pub nobs: usize,
    pub threshold: f64,
    /// `p_value < threshold`: the unit-root null is rejected.
    pub is_stationary: bool,
}

/// Settings for [`evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub threshold: f64,
    pub adf: AdfConfig,
    pub pp: PpConfig,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            adf: AdfConfig::default(),
            pp: PpConfig::default(),
        }
    }
}

impl EvaluatorConfig {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

/// Both verdicts for one spread. Each test fails or succeeds on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityReport {
    pub threshold: f64,
    pub adf: Result<StationarityVerdict, StationarityError>,
    pub phillips_perron: Result<StationarityVerdict, StationarityError>,
}

impl StationarityReport {
    /// Outcomes in report order.
    pub fn outcomes(&self) -> [(TestKind, &Result<StationarityVerdict, StationarityError>); 2] {
        [
            (TestKind::AugmentedDickeyFuller, &self.adf),
            (TestKind::PhillipsPerron, &self.phillips_perron),
        ]
    }

    /// Verdicts of the tests that could be computed.
    pub fn verdicts(&self) -> Vec<StationarityVerdict> {
        self.outcomes()
            .into_iter()
            .filter_map(|(_, r)| r.as_ref().ok().copied())
            .collect()
    }
}

/// Run both unit-root tests on `values` and apply the threshold.
pub fn evaluate(values: &[f64], config: &EvaluatorConfig) -> StationarityReport {
    if values.len() < MIN_RELIABLE_OBSERVATIONS {
        warn!(
            observations = values.len(),
            minimum = MIN_RELIABLE_OBSERVATIONS,
            "too few observations for a reliable unit-root test"
        );
    }

    let adf = adf_test(values, &config.adf).map(|s| s.verdict(config.threshold));
    let phillips_perron =
        phillips_perron_test(values, &config.pp).map(|s| s.verdict(config.threshold));

    for (test, outcome) in [
        (TestKind::AugmentedDickeyFuller, &adf),
        (TestKind::PhillipsPerron, &phillips_perron),
    ] {
        match outcome {
            Ok(v) => info!(
                test = %test,
                statistic = v.statistic,
                p_value = v.p_value,
                stationary = v.is_stationary,
                "unit-root test complete"
            ),
            Err(e) => warn!(test = %test, error = %e, "unit-root test failed"),
        }
    }

    StationarityReport {
        threshold: config.threshold,
        adf,
        phillips_perron,
    }
}

/// [`evaluate`] with default test settings and the given threshold.
pub fn evaluate_with_threshold(values: &[f64], threshold: f64) -> StationarityReport {
    evaluate(values, &EvaluatorConfig::with_threshold(threshold))
}

/// Default automatic lag length, `ceil(12 * (n / 100)^(1/4))`.
pub(crate) fn schwert_lags(n: usize) -> usize {
    (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize
}

/// Reject inputs no regression can handle: non-finite values or no variation.
///
/// Variation is judged against the level of the series, so a constant spread
/// carrying round-off noise counts as constant.
pub(crate) fn check_input(test: TestKind, values: &[f64]) -> Result<(), StationarityError> {
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(StationarityError::non_computable(
            test,
            format!("non-finite value at index {i}"),
        ));
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let scale = min.abs().max(max.abs());
    if values.is_empty() || max - min <= RELATIVE_RANGE_TOLERANCE * scale {
        return Err(StationarityError::non_computable(
            test,
            "series has zero variance",
        ));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample_statistic(p_value: f64) -> TestStatistic {
        TestStatistic {
            test: TestKind::AugmentedDickeyFuller,
            statistic: -2.0,
            p_value,
            critical_values: mackinnon::critical_values(100),
            lags: 1,
            nobs: 98,
        }
    }

    #[test]
    fn verdict_uses_strict_threshold() {
        assert!(sample_statistic(0.29).verdict(0.30).is_stationary);
        assert!(!sample_statistic(0.30).verdict(0.30).is_stationary);
        assert!(!sample_statistic(0.29).verdict(0.05).is_stationary);
    }

    #[test]
    fn zero_series_is_not_computable_for_both_tests() {
        let report = evaluate(&[0.0; 100], &EvaluatorConfig::default());
        for (test, outcome) in report.outcomes() {
            match outcome {
                Err(StationarityError::NonComputableStatistic { test: t, .. }) => {
                    assert_eq!(*t, test)
                }
                other => panic!("expected failure for {test}, got {other:?}"),
            }
        }
        assert!(report.verdicts().is_empty());
    }

    #[test]
    fn nan_input_is_not_computable() {
        let mut values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).sin()).collect();
        values[10] = f64::NAN;
        let err = check_input(TestKind::PhillipsPerron, &values).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn default_threshold_is_relaxed() {
        assert_eq!(EvaluatorConfig::default().threshold, 0.30);
    }

    #[test]
    fn schwert_lag_rule() {
        assert_eq!(schwert_lags(100), 12);
        assert_eq!(schwert_lags(250), 16);
        assert_eq!(schwert_lags(1000), 22);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(TestKind::AugmentedDickeyFuller.to_string(), "ADF");
        assert_eq!(TestKind::PhillipsPerron.to_string(), "Phillips-Perron");
    }

    fn failure_reasons(values: &[f64]) -> Vec<String> {
        let report = evaluate(values, &EvaluatorConfig::default());
        report
            .outcomes()
            .into_iter()
            .map(|(test, outcome)| match outcome {
                Err(StationarityError::NonComputableStatistic { test: t, reason }) => {
                    assert_eq!(*t, test);
                    reason.clone()
                }
                Ok(v) => panic!("expected failure for {test}, got {v:?}"),
            })
            .collect()
    }

    #[test]
    fn linear_trend_is_not_computable() {
        // Every regression on a straight line fits exactly.
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let reasons = failure_reasons(&values);
        assert!(reasons[1].contains("fits exactly"), "{reasons:?}");
    }

    #[test]
    fn constant_with_round_off_is_not_computable_for_both_tests() {
        let mut values = vec![5.0; 100];
        values[50] += 1e-13;
        let reasons = failure_reasons(&values);
        assert_eq!(reasons[0], reasons[1]);
        assert!(reasons[0].contains("zero variance"));
    }

    #[test]
    fn small_spread_around_zero_is_still_tested() {
        let values: Vec<f64> = (0..100)
            .map(|i| 1e-6 * (((i * 37) % 101) as f64 / 101.0 - 0.5))
            .collect();
        let report = evaluate(&values, &EvaluatorConfig::default());
        assert!(report.adf.is_ok());
        assert!(report.phillips_perron.is_ok());
    }
}
