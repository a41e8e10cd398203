//! PairLab Core: data, spread construction and unit-root testing for pairs.
//!
//! This crate contains everything the pair test needs below the pipeline:
//! - Domain types (bars, validated price series)
//! - Data providers (Yahoo Finance, CSV directory, deterministic synthetic)
//! - Date alignment and spread construction
//! - ADF and Phillips-Perron stationarity tests with MacKinnon p-values
//! - Descriptive statistics and technical indicators for enrichment

pub mod data;
pub mod describe;
pub mod domain;
pub mod indicators;
pub mod spread;
pub mod stationarity;
