//! Two-series time alignment.
//!
//! Given two price series, keep only the dates both series observe (inner join).
//! Dates present in only one series are dropped, never filled: a forward-filled
//! price would fabricate a spread observation.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Two series restricted to their common dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    /// The common date axis (sorted ascending).
    pub dates: Vec<NaiveDate>,
    /// Values of the left series on `dates`.
    pub left: Vec<f64>,
    /// Values of the right series on `dates`.
    pub right: Vec<f64>,
    /// Number of left-series dates with no counterpart on the right.
    pub dropped_left: usize,
    /// Number of right-series dates with no counterpart on the left.
    pub dropped_right: usize,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Inner-join two series on date.
///
/// The output follows the left series' date order, which is ascending by the
/// `PriceSeries` invariant.
pub fn align_inner(left: &PriceSeries, right: &PriceSeries) -> AlignedPair {
    let right_by_date: HashMap<NaiveDate, f64> =
        right.points().iter().map(|p| (p.date, p.value)).collect();

    let mut dates = Vec::with_capacity(left.len().min(right.len()));
    let mut left_values = Vec::with_capacity(dates.capacity());
    let mut right_values = Vec::with_capacity(dates.capacity());

    for point in left.points() {
        if let Some(&r) = right_by_date.get(&point.date) {
            dates.push(point.date);
            left_values.push(point.value);
            right_values.push(r);
        }
    }

    let dropped_left = left.len() - dates.len();
    let dropped_right = right.len() - dates.len();
    debug!(
        left = left.name(),
        right = right.name(),
        common = dates.len(),
        dropped_left,
        dropped_right,
        "aligned series on common dates"
    );

    AlignedPair {
        dates,
        left: left_values,
        right: right_values,
        dropped_left,
        dropped_right,
    }
}
