//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV import,
//! synthetic generation) so the pair test can swap implementations and mock for tests.
//!
//! A fetch is a single attempt. Failures are terminal for the run: nothing in this
//! layer retries, backs off, or falls back to another source.

use crate::domain::{Bar, Symbol};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for fetch operations.
///
/// These are designed to be displayable in the CLI without further wrapping.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no bars for '{symbol}' between {start} and {end}")]
    EmptyRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: Symbol,
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::CsvImport => "CSV import",
            DataSource::Synthetic => "synthetic",
        };
        f.write_str(label)
    }
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
///
/// Implementations handle the specifics of fetching data from a particular source.
/// Returned bars are sorted ascending by date with no duplicate dates.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, FetchError>;
}
