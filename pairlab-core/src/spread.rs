//! Spread construction: the date-aligned difference of two price series.

use crate::data::align::align_inner;
use crate::domain::{PricePoint, PriceSeries, SeriesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpreadError {
    #[error("series '{name}' is empty")]
    EmptyInput { name: String },

    #[error("series '{left}' and '{right}' share no common dates")]
    EmptyIntersection { left: String, right: String },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// `left - right` on every date both series observe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    series: PriceSeries,
    /// Dates of the left series dropped by alignment.
    pub dropped_left: usize,
    /// Dates of the right series dropped by alignment.
    pub dropped_right: usize,
}

impl Spread {
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn values(&self) -> Vec<f64> {
        self.series.values()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Build the spread `a - b` over the common dates of `a` and `b`.
///
/// Fails with [`SpreadError::EmptyIntersection`] when the two calendars do not
/// overlap at all. Order is ascending by date.
pub fn build_spread(a: &PriceSeries, b: &PriceSeries) -> Result<Spread, SpreadError> {
    for s in [a, b] {
        if s.is_empty() {
            return Err(SpreadError::EmptyInput {
                name: s.name().to_string(),
            });
        }
    }

    let aligned = align_inner(a, b);
    if aligned.is_empty() {
        return Err(SpreadError::EmptyIntersection {
            left: a.name().to_string(),
            right: b.name().to_string(),
        });
    }

    if aligned.dropped_left > 0 || aligned.dropped_right > 0 {
        warn!(
            left = a.name(),
            right = b.name(),
            dropped_left = aligned.dropped_left,
            dropped_right = aligned.dropped_right,
            "calendars differ; unmatched dates dropped from the spread"
        );
    }

    let points = aligned
        .dates
        .iter()
        .zip(aligned.left.iter().zip(&aligned.right))
        .map(|(&date, (l, r))| PricePoint {
            date,
            value: l - r,
        })
        .collect();

    let series = PriceSeries::new(format!("{}-{}", a.name(), b.name()), points)?;

    debug!(name = series.name(), len = series.len(), "built spread");
    Ok(Spread {
        series,
        dropped_left: aligned.dropped_left,
        dropped_right: aligned.dropped_right,
    })
}
