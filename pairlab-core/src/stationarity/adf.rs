//! Augmented Dickey-Fuller test, constant-only regression.
//!
//! For each usable t the regression is
//!
//! ```text
//! dy[t] = c + gamma * y[t] + sum_{i=1..p} beta_i * dy[t - i] + e[t]
//! ```
//!
//! and the statistic is the t-value of `gamma`. The lag order `p` is picked by
//! fitting every order up to `max_lag` on a common sample (trimmed by
//! `max_lag`) and keeping the smallest information criterion. The winning
//! order is then refit on the longest sample it allows.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    check_input, mackinnon, ols, schwert_lags, StationarityError, TestKind, TestStatistic,
};

const TEST: TestKind = TestKind::AugmentedDickeyFuller;

/// How the number of lagged differences is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagSelection {
    /// Minimize Akaike's criterion.
    #[default]
    Aic,
    /// Minimize the Bayesian (Schwarz) criterion.
    Bic,
    /// Use `max_lag` lags as given.
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdfConfig {
    pub autolag: LagSelection,
    /// Upper bound on lagged differences. `None` uses `ceil(12 * (n/100)^(1/4))`
    /// capped at `n/2 - 2`.
    pub max_lag: Option<usize>,
}

/// Run the ADF test on `values`.
pub fn adf_test(values: &[f64], config: &AdfConfig) -> Result<TestStatistic, StationarityError> {
    check_input(TEST, values)?;

    let n = values.len();
    // A constant plus the level leave room for at most n/2 - 2 lags.
    let cap = (n / 2).checked_sub(2).ok_or_else(|| {
        StationarityError::non_computable(TEST, format!("{n} observations are too few"))
    })?;
    let max_lag = match config.max_lag {
        Some(lag) if lag > cap => {
            return Err(StationarityError::non_computable(
                TEST,
                format!("max_lag {lag} exceeds {cap} allowed for {n} observations"),
            ))
        }
        Some(lag) => lag,
        None => schwert_lags(n).min(cap),
    };

    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let lags = match config.autolag {
        LagSelection::Fixed => max_lag,
        LagSelection::Aic => select_lag(values, &diffs, max_lag, ols::OlsFit::aic)?,
        LagSelection::Bic => select_lag(values, &diffs, max_lag, ols::OlsFit::bic)?,
    };

    let (y, x) = design(values, &diffs, lags, lags);
    let fit = ols::fit(&y, &x)
        .map_err(|e| StationarityError::non_computable(TEST, format!("{e} at {lags} lags")))?;

    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return Err(StationarityError::non_computable(
            TEST,
            "statistic is not finite",
        ));
    }

    debug!(lags, nobs = fit.nobs, statistic, "ADF regression fitted");
    Ok(TestStatistic {
        test: TEST,
        statistic,
        p_value: mackinnon::p_value(statistic),
        critical_values: mackinnon::critical_values(fit.nobs),
        lags,
        nobs: fit.nobs,
    })
}

/// Lag order in `0..=max_lag` with the lowest criterion on the common sample.
/// Ties keep the smaller order; a NaN criterion never wins.
fn select_lag(
    values: &[f64],
    diffs: &[f64],
    max_lag: usize,
    criterion: fn(&ols::OlsFit) -> f64,
) -> Result<usize, StationarityError> {
    let mut best: Option<(usize, f64)> = None;
    let mut last_error = None;
    for p in 0..=max_lag {
        let (y, x) = design(values, diffs, max_lag, p);
        let fit = match ols::fit(&y, &x) {
            Ok(fit) => fit,
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        };
        let score = criterion(&fit);
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| score < b) {
            best = Some((p, score));
        }
    }
    best.map(|(p, _)| p).ok_or_else(|| {
        let reason = match last_error {
            Some(e) => format!("no lag order produced a valid regression ({e})"),
            None => "no lag order produced a valid regression".to_string(),
        };
        StationarityError::non_computable(TEST, reason)
    })
}

/// Response and design matrix for `lags` lagged differences, starting at
/// difference index `trim`. Columns: constant, lagged level, lagged diffs.
fn design(
    values: &[f64],
    diffs: &[f64],
    trim: usize,
    lags: usize,
) -> (DVector<f64>, DMatrix<f64>) {
    let rows = diffs.len() - trim;
    let cols = 2 + lags;
    let y = DVector::from_iterator(rows, diffs[trim..].iter().copied());
    let x = DMatrix::from_fn(rows, cols, |r, c| {
        let t = trim + r;
        match c {
            0 => 1.0,
            1 => values[t],
            _ => diffs[t - (c - 1)],
        }
    });
    (y, x)
}
