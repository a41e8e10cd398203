//! Fixed-window rolling statistics of the close.
//!
//! A window containing a NaN yields NaN. The standard deviation is the sample
//! estimate (n - 1 denominator).

use super::{closes, Indicator};
use crate::domain::Bar;

/// Rolling mean; NaN until `window` values are available.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling sample standard deviation; NaN for `window < 2`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 {
        return vec![f64::NAN; values.len()];
    }
    rolling(values, window, sample_std)
}

fn sample_std(w: &[f64]) -> f64 {
    let mean = w.iter().sum::<f64>() / w.len() as f64;
    let ss: f64 = w.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (w.len() - 1) as f64).sqrt()
}

fn rolling(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }
    for (i, w) in values.windows(window).enumerate() {
        if w.iter().all(|v| !v.is_nan()) {
            result[i + window - 1] = f(w);
        }
    }
    result
}

#[derive(Debug, Clone)]
pub struct RollingStd {
    period: usize,
    name: String,
}

impl RollingStd {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "rolling std period must be >= 2");
        Self {
            period,
            name: format!("rolling_std_{period}"),
        }
    }
}

impl Indicator for RollingStd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_std(&closes(bars), self.period)
    }
}

/// Distance of the close from its rolling mean, in rolling standard deviations.
#[derive(Debug, Clone)]
pub struct ZScore {
    period: usize,
}

impl ZScore {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "z-score period must be >= 2");
        Self { period }
    }
}

impl Indicator for ZScore {
    fn name(&self) -> &str {
        "z_score"
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let mean = rolling_mean(&closes, self.period);
        let std = rolling_std(&closes, self.period);
        closes
            .iter()
            .zip(mean.iter().zip(&std))
            .map(|(c, (m, s))| (c - m) / s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rolling_std_known_values() {
        let result = rolling_std(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // sample std of (1,2,3) and (2,3,4) is 1
        assert_approx(result[2], 1.0, DEFAULT_EPSILON);
        assert_approx(result[3], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_poisons_only_its_windows() {
        let result = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], 3.5, DEFAULT_EPSILON);
        assert_approx(result[4], 4.5, DEFAULT_EPSILON);
    }

    #[test]
    fn z_score_of_last_point() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let z = ZScore::new(3).compute(&bars);
        // mean 2, std 1
        assert_approx(z[2], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_window_gives_non_finite_z_score() {
        let bars = make_bars(&[5.0, 5.0, 5.0]);
        let z = ZScore::new(3).compute(&bars);
        assert!(!z[2].is_finite());
    }

    #[test]
    fn short_history_is_all_nan() {
        let bars = make_bars(&[1.0, 2.0]);
        assert!(RollingStd::new(20).compute(&bars).iter().all(|v| v.is_nan()));
    }
}
