//! PriceSeries: a strictly date-ordered sequence of prices for one ticker.

use super::bar::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One observation of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Errors raised when a series violates its ordering or value invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series '{name}' is not sorted: {next} follows {prev}")]
    Unsorted {
        name: String,
        prev: NaiveDate,
        next: NaiveDate,
    },

    #[error("series '{name}' has a duplicate date: {date}")]
    DuplicateDate { name: String, date: NaiveDate },

    #[error("series '{name}' has a non-finite value on {date}")]
    NonFinite { name: String, date: NaiveDate },
}

/// An ordered sequence of (date, price) pairs.
///
/// Invariants, checked on construction:
/// - dates strictly ascending (so no duplicates)
/// - every value finite
///
/// The series is immutable once built. Deserialization goes through
/// [`PriceSeries::new`], so the invariants hold for decoded series too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct PriceSeries {
    name: String,
    points: Vec<PricePoint>,
}

#[derive(Deserialize)]
struct RawSeries {
    name: String,
    points: Vec<PricePoint>,
}

impl TryFrom<RawSeries> for PriceSeries {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.points)
    }
}

impl PriceSeries {
    /// Build a series from points that are already in date order.
    pub fn new(name: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let name = name.into();

        for point in &points {
            if !point.value.is_finite() {
                return Err(SeriesError::NonFinite {
                    name,
                    date: point.date,
                });
            }
        }

        for pair in points.windows(2) {
            let (prev, next) = (pair[0].date, pair[1].date);
            if next == prev {
                return Err(SeriesError::DuplicateDate { name, date: next });
            }
            if next < prev {
                return Err(SeriesError::Unsorted { name, prev, next });
            }
        }

        Ok(Self { name, points })
    }

    /// Extract the closing-price column from provider bars.
    ///
    /// Bars with a missing (NaN) close are skipped: a missing close is not a
    /// valid observation and must not survive into the spread.
    pub fn from_closes(name: impl Into<String>, bars: &[Bar]) -> Result<Self, SeriesError> {
        let points = bars
            .iter()
            .filter(|bar| bar.close.is_finite())
            .map(|bar| PricePoint {
                date: bar.date,
                value: bar.close,
            })
            .collect();
        Self::new(name, points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// The numeric column, in date order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
