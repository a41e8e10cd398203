//! MACD line: EMA(fast) - EMA(slow) of the close.
//!
//! Each EMA is seeded from the first close and masked until `span` closes
//! have been seen, so the line starts at index slow - 1.

use super::ema::ema_of_series;
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1 && fast < slow, "MACD needs 1 <= fast < slow");
        Self { fast, slow }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "macd"
    }

    fn lookback(&self) -> usize {
        self.slow - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let fast = ema_of_series(&closes, self.fast, self.fast);
        let slow = ema_of_series(&closes, self.slow, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}
