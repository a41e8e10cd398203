//! Technical indicators for enriching a single ticker's bars.
//!
//! Indicators are pure functions: bar history in, numeric series out, one
//! value per bar. They play no part in the pair test; the enriched frame is
//! what the `fetch` command exports.
//!
//! Multi-output indicators (Bollinger) are exposed as separate named
//! instances per band, keeping the single-series `Indicator` trait unchanged.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod enrich;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use enrich::{IndicatorEnricher, IndicatorFrame};
pub use macd::Macd;
pub use rolling::{RollingStd, ZScore};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::Bar;

/// An indicator over a full bar history.
///
/// `compute` returns a vector of the same length as `bars`. Warmup positions
/// are `f64::NAN`. No value at bar t may depend on bars after t.
pub trait Indicator: Send + Sync {
    /// Column name in the enriched output (e.g. "sma_50", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are NaN on clean input.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
                adj_close: close,
            }
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
