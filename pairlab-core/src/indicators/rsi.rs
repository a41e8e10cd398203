//! Relative Strength Index (RSI).
//!
//! Gains and losses of the close are smoothed with alpha = 1/period,
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! The first bar has no previous close and counts as a zero change, so the
//! first value appears at index period - 1.
//! Edge cases: avg_loss == 0 gives 100.

use super::ema::ewm_mean;
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let n = closes.len();

        // A missing neighbour makes the change unknown; it counts as neither
        // gain nor loss.
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = closes[i] - closes[i - 1];
            if change > 0.0 {
                gains[i] = change;
            } else if change < 0.0 {
                losses[i] = -change;
            }
        }

        let alpha = 1.0 / self.period as f64;
        let avg_gain = ewm_mean(&gains, alpha, self.period);
        let avg_loss = ewm_mean(&losses, alpha, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| compute_rsi(g, l))
            .collect()
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[1].is_nan());
        assert_approx(result[2], 100.0, 1e-6);
        assert_approx(result[5], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[5], 0.0, 1e-6);
    }

    #[test]
    fn rsi_known_value() {
        // period 2, alpha 0.5
        // gains  0, 2, 0  -> ewm 0, 1, 0.5
        // losses 0, 0, 1  -> ewm 0, 0, 0.5
        let bars = make_bars(&[10.0, 12.0, 11.0]);
        let result = Rsi::new(2).compute(&bars);
        assert!(result[0].is_nan());
        assert_approx(result[1], 100.0, 1e-9);
        assert_approx(result[2], 50.0, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 13);
    }
}
