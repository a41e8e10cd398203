//! Pair-test pipeline: fetch, spread, describe, evaluate.
//!
//! Entry point: [`run_pair_test`]. Data and spread failures abort the run;
//! a unit-root test that cannot be computed is recorded in the result and the
//! other test still runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use pairlab_core::data::{DataProvider, DataSource, FetchError};
use pairlab_core::describe::{describe, SeriesSummary};
use pairlab_core::domain::{PriceSeries, SeriesError};
use pairlab_core::spread::{build_spread, SpreadError};
use pairlab_core::stationarity::{evaluate, StationarityError, StationarityVerdict, TestKind};

use crate::config::{ConfigError, PairTestConfig};

/// Current schema version of the JSON result.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors that abort a pair test.
#[derive(Debug, Error)]
pub enum PairTestError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Fetch(#[from] FetchError),
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
    #[error("spread error: {0}")]
    Spread(#[from] SpreadError),
}

/// Outcome of one unit-root test as stored in the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Computed(StationarityVerdict),
    Failed { reason: String },
}

impl TestOutcome {
    pub fn verdict(&self) -> Option<&StationarityVerdict> {
        match self {
            TestOutcome::Computed(v) => Some(v),
            TestOutcome::Failed { .. } => None,
        }
    }

    pub fn is_stationary(&self) -> bool {
        self.verdict().is_some_and(|v| v.is_stationary)
    }
}

impl From<Result<StationarityVerdict, StationarityError>> for TestOutcome {
    fn from(result: Result<StationarityVerdict, StationarityError>) -> Self {
        match result {
            Ok(verdict) => TestOutcome::Computed(verdict),
            Err(StationarityError::NonComputableStatistic { reason, .. }) => {
                TestOutcome::Failed { reason }
            }
        }
    }
}

/// Complete, serializable result of one pair test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairTestResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub ticker_a: String,
    pub ticker_b: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub source: DataSource,
    /// Length of the spread, i.e. common dates of both legs.
    pub observations: usize,
    pub dropped_a: usize,
    pub dropped_b: usize,
    pub threshold: f64,
    pub summary: Option<SeriesSummary>,
    pub adf: TestOutcome,
    pub phillips_perron: TestOutcome,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl PairTestResult {
    /// Outcomes in report order.
    pub fn outcomes(&self) -> [(TestKind, &TestOutcome); 2] {
        [
            (TestKind::AugmentedDickeyFuller, &self.adf),
            (TestKind::PhillipsPerron, &self.phillips_perron),
        ]
    }
}

/// Run the full pair test for `config` against `provider`.
pub fn run_pair_test(
    config: &PairTestConfig,
    provider: &dyn DataProvider,
) -> Result<PairTestResult, PairTestError> {
    config.validate()?;
    let (start, end) = config.date_range()?;

    info!(
        ticker_a = %config.ticker_a,
        ticker_b = %config.ticker_b,
        %start,
        %end,
        provider = provider.name(),
        "starting pair test"
    );

    let leg_a = fetch_closes(provider, &config.ticker_a, start, end)?;
    let leg_b = fetch_closes(provider, &config.ticker_b, start, end)?;

    let spread = build_spread(&leg_a.series, &leg_b.series)?;
    let values = spread.values();
    info!(observations = values.len(), "spread built");

    let summary = describe(&values);
    let report = evaluate(&values, &config.evaluator_config());

    Ok(PairTestResult {
        schema_version: SCHEMA_VERSION,
        ticker_a: config.ticker_a.clone(),
        ticker_b: config.ticker_b.clone(),
        start,
        end,
        source: leg_a.source,
        observations: values.len(),
        dropped_a: spread.dropped_left,
        dropped_b: spread.dropped_right,
        threshold: config.threshold,
        summary,
        adf: report.adf.into(),
        phillips_perron: report.phillips_perron.into(),
    })
}

struct Leg {
    series: PriceSeries,
    source: DataSource,
}

fn fetch_closes(
    provider: &dyn DataProvider,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Leg, PairTestError> {
    let fetched = provider.fetch(ticker, start, end)?;
    let series = PriceSeries::from_closes(ticker, &fetched.bars)?;
    let missing = fetched.bars.len() - series.len();
    if missing > 0 {
        warn!(ticker, missing, "bars without a close were dropped");
    }
    debug!(ticker, closes = series.len(), "fetched closes");
    Ok(Leg {
        series,
        source: fetched.source,
    })
}
