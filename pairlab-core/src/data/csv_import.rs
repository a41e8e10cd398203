//! CSV import provider.
//!
//! Reads `<dir>/<SYMBOL>.csv` with a header row of
//! `date,open,high,low,close,volume[,adj_close]`. Rows are sorted by date on load,
//! so exports in either order work. Used as the offline fallback when Yahoo is
//! unreachable.

use super::provider::{DataProvider, DataSource, FetchError, FetchResult};
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Volume")]
    volume: Option<u64>,
    #[serde(default, alias = "Adj Close")]
    adj_close: Option<f64>,
}

/// Provider backed by a directory of per-symbol CSV files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn read_file(path: &Path) -> Result<Vec<Bar>, FetchError> {
        let path_str = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|source| FetchError::Io {
            path: path_str.clone(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(file);

        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| FetchError::Parse {
                path: path_str.clone(),
                reason: format!("row {}: {e}", line + 1),
            })?;
            let close = row.close.unwrap_or(f64::NAN);
            bars.push(Bar {
                date: row.date,
                open: row.open.unwrap_or(f64::NAN),
                high: row.high.unwrap_or(f64::NAN),
                low: row.low.unwrap_or(f64::NAN),
                close,
                volume: row.volume.unwrap_or(0),
                adj_close: row.adj_close.unwrap_or(close),
            });
        }

        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.dedup_by_key(|b| b.date);
        if bars.len() != before {
            debug!(
                path = %path_str,
                dropped = before - bars.len(),
                "dropped duplicate CSV dates"
            );
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, FetchError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let bars: Vec<Bar> = Self::read_file(&path)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        if bars.is_empty() {
            return Err(FetchError::EmptyRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        info!(symbol, bars = bars.len(), path = %path.display(), "loaded bars from CSV");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}
