//! Bars plus indicator columns, computed in one pass over a fixed indicator set.

use super::{Atr, Bollinger, Ema, Indicator, Macd, RollingStd, Rsi, Sma, ZScore};
use crate::domain::Bar;
use tracing::debug;

/// Bars with named indicator columns of equal length, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    bars: Vec<Bar>,
    columns: Vec<(String, Vec<f64>)>,
}

impl IndicatorFrame {
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn columns(&self) -> &[(String, Vec<f64>)] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Ordered set of indicators applied to a bar history.
pub struct IndicatorEnricher {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorEnricher {
    pub fn empty() -> Self {
        Self {
            indicators: Vec::new(),
        }
    }

    /// The standard enrichment: 20-day rolling band statistics, RSI(14),
    /// SMA(50), EMA(50), MACD(12, 26) and ATR(14).
    pub fn standard() -> Self {
        Self::empty()
            .with(Sma::named(20, "rolling_mean_20"))
            .with(RollingStd::new(20))
            .with(ZScore::new(20))
            .with(Bollinger::high(20, 2.0))
            .with(Bollinger::low(20, 2.0))
            .with(Rsi::new(14))
            .with(Sma::new(50))
            .with(Ema::new(50))
            .with(Macd::default())
            .with(Atr::new(14))
    }

    pub fn with(mut self, indicator: impl Indicator + 'static) -> Self {
        self.indicators.push(Box::new(indicator));
        self
    }

    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    pub fn enrich(&self, bars: &[Bar]) -> IndicatorFrame {
        let columns = self
            .indicators
            .iter()
            .map(|ind| (ind.name().to_string(), ind.compute(bars)))
            .collect::<Vec<_>>();
        debug!(
            bars = bars.len(),
            columns = columns.len(),
            "computed indicator frame"
        );
        IndicatorFrame {
            bars: bars.to_vec(),
            columns,
        }
    }
}

impl Default for IndicatorEnricher {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn standard_columns_in_order() {
        let frame = IndicatorEnricher::standard().enrich(&make_bars(&[1.0, 2.0, 3.0]));
        let names: Vec<&str> = frame.column_names().collect();
        assert_eq!(
            names,
            vec![
                "rolling_mean_20",
                "rolling_std_20",
                "z_score",
                "bollinger_high",
                "bollinger_low",
                "rsi_14",
                "sma_50",
                "ema_50",
                "macd",
                "atr_14",
            ]
        );
    }

    #[test]
    fn every_column_matches_bar_count() {
        let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let frame = IndicatorEnricher::standard().enrich(&make_bars(&closes));
        assert_eq!(frame.len(), 30);
        for (name, values) in frame.columns() {
            assert_eq!(values.len(), 30, "{name}");
        }
    }

    #[test]
    fn custom_enricher() {
        let frame = IndicatorEnricher::empty()
            .with(Sma::new(2))
            .enrich(&make_bars(&[1.0, 3.0]));
        assert_eq!(frame.column("sma_2").unwrap()[1], 2.0);
        assert!(frame.column("rsi_14").is_none());
    }

    #[test]
    fn empty_history_gives_empty_frame() {
        let frame = IndicatorEnricher::standard().enrich(&[]);
        assert!(frame.is_empty());
        assert!(frame.columns().iter().all(|(_, v)| v.is_empty()));
    }
}
