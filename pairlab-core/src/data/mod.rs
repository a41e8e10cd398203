//! Market data: provider trait, concrete providers, and series alignment.

pub mod align;
pub mod csv_import;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use align::{align_inner, AlignedPair};
pub use csv_import::CsvProvider;
pub use provider::{DataProvider, DataSource, FetchError, FetchResult};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
