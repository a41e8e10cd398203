//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! bar has no previous close and uses high-low.
//! Seed: ATR[period-1] = mean of the first `period` true ranges.
//! Then Wilder smoothing: ATR[t] = (ATR[t-1] * (period-1) + TR[t]) / period.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range series. NaN where high or low is missing; a missing previous
/// close falls back to high-low.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let range = bar.high - bar.low;
            if range.is_nan() {
                return f64::NAN;
            }
            match i.checked_sub(1).map(|p| bars[p].close) {
                Some(pc) if !pc.is_nan() => {
                    range.max((bar.high - pc).abs()).max((bar.low - pc).abs())
                }
                _ => range,
            }
        })
        .collect()
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        let tr = true_range(bars);
        let p = self.period as f64;
        let mut atr = tr[..self.period].iter().sum::<f64>() / p;
        result[self.period - 1] = atr;
        for i in self.period..n {
            atr = (atr * (p - 1.0) + tr[i]) / p;
            result[i] = atr;
        }
        result
    }
}
