//! Synthetic data provider for offline runs and tests.
//!
//! Every symbol is `level + common_factor + idiosyncratic`, where the common factor
//! is a random walk shared by all symbols of one provider (seeded by the provider
//! seed) and the idiosyncratic part is a stationary AR(1) seeded by BLAKE3 of the
//! symbol. The difference of any two synthetic symbols therefore cancels the random
//! walk and is stationary: synthetic pairs are cointegrated by construction.
//!
//! Results are fully deterministic for a given (seed, symbol, start, end).

use super::provider::{DataProvider, DataSource, FetchError, FetchResult};
use crate::domain::Bar;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::{info, warn};

/// Deterministic generator of cointegrated price paths.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    /// Daily standard deviation of the shared random walk.
    factor_sigma: f64,
    /// Daily innovation standard deviation of the per-symbol AR(1).
    idio_sigma: f64,
    /// AR(1) coefficient of the per-symbol component; |phi| < 1.
    phi: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            factor_sigma: 0.5,
            idio_sigma: 0.4,
            phi: 0.7,
        }
    }

    pub fn with_phi(mut self, phi: f64) -> Self {
        assert!(phi.abs() < 1.0, "AR(1) coefficient must be inside the unit circle");
        self.phi = phi;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed for the per-symbol component, independent of fetch order.
    fn symbol_seed(&self, symbol: &str) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        *hasher.finalize().as_bytes()
    }

    fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                days.push(current);
            }
            current += chrono::Duration::days(1);
        }
        days
    }

    fn generate(&self, symbol: &str, days: &[NaiveDate]) -> Vec<Bar> {
        let factor_step = Normal::new(0.0, self.factor_sigma).expect("factor sigma is positive");
        let idio_step = Normal::new(0.0, self.idio_sigma).expect("idio sigma is positive");

        let mut factor_rng = StdRng::seed_from_u64(self.seed);
        let mut symbol_rng = StdRng::from_seed(self.symbol_seed(symbol));

        let level = 80.0 + f64::from(symbol_rng.gen_range(0u32..120));
        let mut factor = 0.0_f64;
        let mut idio = 0.0_f64;
        let mut prev_close = level;

        days.iter()
            .map(|&date| {
                factor += factor_step.sample(&mut factor_rng);
                idio = self.phi * idio + idio_step.sample(&mut symbol_rng);

                let close = level + factor + idio;
                let open = prev_close;
                let wick: f64 = symbol_rng.gen_range(0.0..0.5);
                let bar = Bar {
                    date,
                    open,
                    high: open.max(close) + wick,
                    low: open.min(close) - wick,
                    close,
                    volume: symbol_rng.gen_range(500_000..5_000_000u64),
                    adj_close: close,
                };
                prev_close = close;
                bar
            })
            .collect()
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, FetchError> {
        let days = Self::trading_days(start, end);
        if days.is_empty() {
            return Err(FetchError::EmptyRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        warn!(symbol, "generating synthetic data; results are not market data");
        let bars = self.generate(symbol, &days);
        info!(symbol, bars = bars.len(), seed = self.seed, "generated synthetic bars");

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Synthetic,
        })
    }
}
