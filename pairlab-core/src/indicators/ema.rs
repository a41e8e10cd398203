//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (span + 1), seeded with the first close (no SMA seed).
//! A value is reported once `min_periods` non-NaN closes have been seen.
//!
//! NaN inputs are skipped by the recursion: the previous value carries
//! through, and the weight of the old average keeps decaying across the gap.

use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    min_periods: usize,
    name: String,
}

impl Ema {
    /// EMA with no warmup: valid from the first close.
    pub fn new(span: usize) -> Self {
        Self::with_min_periods(span, 0)
    }

    pub fn with_min_periods(span: usize, min_periods: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            min_periods,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.min_periods.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.span, self.min_periods)
    }
}

/// EMA of an arbitrary series. Used by MACD.
pub fn ema_of_series(values: &[f64], span: usize, min_periods: usize) -> Vec<f64> {
    ewm_mean(values, 2.0 / (span as f64 + 1.0), min_periods)
}

/// Exponentially weighted mean with smoothing factor `alpha`.
pub fn ewm_mean(values: &[f64], alpha: f64, min_periods: usize) -> Vec<f64> {
    let required = min_periods.max(1);
    let mut result = vec![f64::NAN; values.len()];
    let mut mean = f64::NAN;
    let mut old_weight = 1.0;
    let mut seen = 0usize;

    for (i, &x) in values.iter().enumerate() {
        if x.is_nan() {
            if seen > 0 {
                old_weight *= 1.0 - alpha;
            }
        } else if seen == 0 {
            mean = x;
            seen = 1;
        } else {
            let w = old_weight * (1.0 - alpha);
            mean = (w * mean + alpha * x) / (w + alpha);
            old_weight = 1.0;
            seen += 1;
        }
        if seen >= required {
            result[i] = mean;
        }
    }
    result
}
