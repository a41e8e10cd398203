//! Bollinger Bands: rolling mean +/- multiplier * rolling sample stddev.
//!
//! Two bands, each a separate Indicator instance. The middle band is the
//! rolling mean and is exposed through `Sma::named`.
//! Lookback: period - 1.

use super::rolling::{rolling_mean, rolling_std};
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    High,
    Low,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
}

impl Bollinger {
    pub fn high(period: usize, multiplier: f64) -> Self {
        Self::band(period, multiplier, BollingerBand::High)
    }

    pub fn low(period: usize, multiplier: f64) -> Self {
        Self::band(period, multiplier, BollingerBand::Low)
    }

    fn band(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        Self {
            period,
            multiplier,
            band,
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        match self.band {
            BollingerBand::High => "bollinger_high",
            BollingerBand::Low => "bollinger_low",
        }
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let sign = match self.band {
            BollingerBand::High => 1.0,
            BollingerBand::Low => -1.0,
        };
        rolling_mean(&closes, self.period)
            .into_iter()
            .zip(rolling_std(&closes, self.period))
            .map(|(mean, std)| mean + sign * self.multiplier * std)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bands_are_symmetric_around_the_mean() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        let high = Bollinger::high(3, 2.0).compute(&bars);
        let low = Bollinger::low(3, 2.0).compute(&bars);
        assert!(high[1].is_nan() && low[1].is_nan());
        // mean 3, sample std 1
        assert_approx(high[3], 5.0, DEFAULT_EPSILON);
        assert_approx(low[3], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_prices_collapse_the_bands() {
        let bars = make_bars(&[7.0; 5]);
        let high = Bollinger::high(3, 2.0).compute(&bars);
        let low = Bollinger::low(3, 2.0).compute(&bars);
        assert_approx(high[4], 7.0, DEFAULT_EPSILON);
        assert_approx(low[4], 7.0, DEFAULT_EPSILON);
    }
}
