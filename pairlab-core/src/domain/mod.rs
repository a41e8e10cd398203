//! Domain types for PairLab

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{PricePoint, PriceSeries, SeriesError};

/// Ticker symbol type alias
pub type Symbol = String;
