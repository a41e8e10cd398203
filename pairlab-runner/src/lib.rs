//! PairLab Runner: pair-test orchestration on top of `pairlab-core`.
//!
//! This crate provides:
//! - TOML configuration with validation
//! - The fetch, spread, evaluate pipeline
//! - Text and JSON reports with verdict sentences
//! - CSV export of enriched single-ticker data

pub mod config;
pub mod export;
pub mod pipeline;
pub mod report;

pub use config::{ConfigError, PairTestConfig};
pub use export::{enriched_csv, export_enriched_csv};
pub use pipeline::{run_pair_test, PairTestError, PairTestResult, TestOutcome, SCHEMA_VERSION};
pub use report::{render_json, render_text, verdict_line};
