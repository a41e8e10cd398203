//! Serializable pair-test configuration, loaded from TOML.
//!
//! ```toml
//! ticker_a = "KO"
//! ticker_b = "PEP"
//! start_date = "2020-01-01"
//! end_date = "2024-12-31"
//! threshold = 0.30
//!
//! [adf]
//! autolag = "aic"
//! max_lag = 12
//!
//! [pp]
//! lags = 15
//! ```
//!
//! Every field may be omitted from the file so the command line can fill it
//! in; [`PairTestConfig::validate`] rejects whatever is still missing.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pairlab_core::stationarity::{AdfConfig, EvaluatorConfig, PpConfig, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("threshold must lie in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairTestConfig {
    pub ticker_a: String,
    pub ticker_b: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// p-value below which a test calls the spread stationary.
    pub threshold: f64,
    pub adf: AdfConfig,
    pub pp: PpConfig,
}

impl Default for PairTestConfig {
    fn default() -> Self {
        Self {
            ticker_a: String::new(),
            ticker_b: String::new(),
            start_date: None,
            end_date: None,
            threshold: DEFAULT_THRESHOLD,
            adf: AdfConfig::default(),
            pp: PpConfig::default(),
        }
    }
}

impl PairTestConfig {
    pub fn new(
        ticker_a: impl Into<String>,
        ticker_b: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            ticker_a: ticker_a.into(),
            ticker_b: ticker_b.into(),
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// The date range, once both ends are present and ordered.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        let start = self.start_date.ok_or(ConfigError::MissingField("start_date"))?;
        let end = self.end_date.ok_or(ConfigError::MissingField("end_date"))?;
        if start > end {
            return Err(ConfigError::InvalidDateRange { start, end });
        }
        Ok((start, end))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticker_a.trim().is_empty() {
            return Err(ConfigError::MissingField("ticker_a"));
        }
        if self.ticker_b.trim().is_empty() {
            return Err(ConfigError::MissingField("ticker_b"));
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        self.date_range()?;

        if self.ticker_a == self.ticker_b {
            warn!(
                ticker = %self.ticker_a,
                "both legs are the same ticker; the spread will be identically zero"
            );
        }
        Ok(())
    }

    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            threshold: self.threshold,
            adf: self.adf,
            pp: self.pp,
        }
    }
}
