//! Integration tests for the pair-test pipeline.
//!
//! Uses the synthetic provider for the happy path and a scripted in-memory
//! provider for calendar mismatches and fetch failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate};
use pairlab_core::data::{DataProvider, DataSource, FetchError, FetchResult, SyntheticProvider};
use pairlab_core::domain::Bar;
use pairlab_core::spread::SpreadError;
use pairlab_runner::{
    export_enriched_csv, render_json, render_text, run_pair_test, ConfigError, PairTestConfig,
    PairTestError, PairTestResult, TestOutcome,
};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn year_2023(a: &str, b: &str) -> PairTestConfig {
    PairTestConfig::new(a, b, d("2023-01-01"), d("2023-12-31"))
}

// ── Scripted provider ────────────────────────────────────────────────

/// Serves fixed bars per symbol; unknown symbols are not found.
struct ScriptedProvider {
    bars: HashMap<String, Vec<Bar>>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            bars: HashMap::new(),
        }
    }

    fn with(mut self, symbol: &str, first: &str, closes: &[f64]) -> Self {
        let first = d(first);
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: first + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0,
                adj_close: close,
            })
            .collect();
        self.bars.insert(symbol.to_string(), bars);
        self
    }
}

impl DataProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, FetchError> {
        let bars: Vec<Bar> = self
            .bars
            .get(symbol)
            .ok_or_else(|| FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();
        if bars.is_empty() {
            return Err(FetchError::EmptyRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}

fn wave(n: usize, phase: f64) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.9 + phase).sin() * 3.0 + (i as f64 * 0.23).cos())
        .collect()
}

// ── Happy path ───────────────────────────────────────────────────────

#[test]
fn synthetic_pair_end_to_end() {
    let provider = SyntheticProvider::new(42);
    let result = run_pair_test(&year_2023("KO", "PEP"), &provider).unwrap();

    assert_eq!(result.ticker_a, "KO");
    assert_eq!(result.source, DataSource::Synthetic);
    assert_eq!(result.observations, 260);
    assert_eq!(result.summary.unwrap().count, 260);
    assert!(result.adf.is_stationary());

    let text = render_text(&result);
    assert!(text.contains("KO and PEP may be cointegrated (ADF Test)."));
    assert!(text.contains("(Phillips-Perron Test)."));
}

#[test]
fn pipeline_is_deterministic() {
    let provider = SyntheticProvider::new(8);
    let first = run_pair_test(&year_2023("GLD", "SLV"), &provider).unwrap();
    let second = run_pair_test(&year_2023("GLD", "SLV"), &provider).unwrap();
    assert_eq!(first, second);
}

#[test]
fn json_result_round_trips() {
    let provider = SyntheticProvider::new(4);
    let result = run_pair_test(&year_2023("XOM", "CVX"), &provider).unwrap();
    let json = render_json(&result).unwrap();
    let back: PairTestResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.ticker_a, result.ticker_a);
    assert_eq!(back.observations, result.observations);
    assert_eq!(back.adf.is_stationary(), result.adf.is_stationary());
    let (a, b) = (back.adf.verdict().unwrap(), result.adf.verdict().unwrap());
    assert_eq!(a.lags, b.lags);
    assert!((a.statistic - b.statistic).abs() < 1e-12);
}

#[test]
fn evaluator_settings_flow_through() {
    let provider = SyntheticProvider::new(4);
    let mut config = year_2023("XOM", "CVX");
    config.adf.autolag = pairlab_core::stationarity::LagSelection::Fixed;
    config.adf.max_lag = Some(3);
    config.pp.lags = Some(5);
    config.threshold = 0.01;

    let result = run_pair_test(&config, &provider).unwrap();
    let adf = result.adf.verdict().unwrap();
    let pp = result.phillips_perron.verdict().unwrap();
    assert_eq!(adf.lags, 3);
    assert_eq!(pp.lags, 5);
    assert_eq!(adf.threshold, 0.01);
    assert_eq!(result.threshold, 0.01);
}

// ── Calendars ────────────────────────────────────────────────────────

#[test]
fn mismatched_calendars_are_inner_joined() {
    let provider = ScriptedProvider::new()
        .with("A", "2024-01-01", &wave(100, 0.0))
        .with("B", "2024-01-11", &wave(100, 1.0));
    let config = PairTestConfig::new("A", "B", d("2024-01-01"), d("2024-12-31"));
    let result = run_pair_test(&config, &provider).unwrap();

    assert_eq!(result.observations, 90);
    assert_eq!(result.dropped_a, 10);
    assert_eq!(result.dropped_b, 10);
}

#[test]
fn disjoint_calendars_fail() {
    let provider = ScriptedProvider::new()
        .with("A", "2024-01-01", &wave(30, 0.0))
        .with("B", "2024-03-01", &wave(30, 0.0));
    let config = PairTestConfig::new("A", "B", d("2024-01-01"), d("2024-12-31"));
    let err = run_pair_test(&config, &provider).unwrap_err();
    assert!(matches!(
        err,
        PairTestError::Spread(SpreadError::EmptyIntersection { .. })
    ));
}

#[test]
fn constant_spread_reports_both_tests_as_failed() {
    // Whole-number prices keep the difference exactly constant.
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
    let shifted: Vec<f64> = closes.iter().map(|c| c - 5.0).collect();
    let provider = ScriptedProvider::new()
        .with("A", "2024-01-01", &closes)
        .with("B", "2024-01-01", &shifted);
    let config = PairTestConfig::new("A", "B", d("2024-01-01"), d("2024-12-31"));
    let result = run_pair_test(&config, &provider).unwrap();

    for (_, outcome) in result.outcomes() {
        assert!(matches!(outcome, TestOutcome::Failed { .. }));
    }
    let text = render_text(&result);
    assert!(text.contains("ADF Test could not be computed"));
    assert!(text.contains("Phillips-Perron Test could not be computed"));
}

#[test]
fn short_spread_warns_once() {
    let logs = Arc::new(Mutex::new(Vec::<u8>::new()));
    let sink = Arc::clone(&logs);
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || LogSink(Arc::clone(&sink)))
        .finish();

    let provider = ScriptedProvider::new()
        .with("A", "2024-01-01", &wave(15, 0.0))
        .with("B", "2024-01-01", &wave(15, 1.0));
    let config = PairTestConfig::new("A", "B", d("2024-01-01"), d("2024-12-31"));
    tracing::subscriber::with_default(subscriber, || {
        run_pair_test(&config, &provider).unwrap();
    });

    let text = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
    assert_eq!(text.matches("too few observations").count(), 1, "{text}");
}

struct LogSink(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ── Failures ─────────────────────────────────────────────────────────

#[test]
fn unknown_ticker_is_a_fetch_error() {
    let provider = ScriptedProvider::new().with("A", "2024-01-01", &wave(30, 0.0));
    let config = PairTestConfig::new("A", "ZZZZ", d("2024-01-01"), d("2024-12-31"));
    let err = run_pair_test(&config, &provider).unwrap_err();
    assert!(matches!(
        err,
        PairTestError::Fetch(FetchError::SymbolNotFound { ref symbol }) if symbol == "ZZZZ"
    ));
}

#[test]
fn empty_range_is_a_fetch_error() {
    let provider = ScriptedProvider::new()
        .with("A", "2024-01-01", &wave(30, 0.0))
        .with("B", "2024-01-01", &wave(30, 0.0));
    let config = PairTestConfig::new("A", "B", d("2025-01-01"), d("2025-02-01"));
    let err = run_pair_test(&config, &provider).unwrap_err();
    assert!(matches!(err, PairTestError::Fetch(FetchError::EmptyRange { .. })));
}

#[test]
fn invalid_config_stops_before_fetching() {
    let mut config = year_2023("A", "B");
    config.threshold = 0.0;
    let err = run_pair_test(&config, &ScriptedProvider::new()).unwrap_err();
    assert!(matches!(
        err,
        PairTestError::Config(ConfigError::InvalidThreshold(_))
    ));
}

// ── Export ───────────────────────────────────────────────────────────

#[test]
fn exported_csv_reads_back_through_csv_provider() {
    use pairlab_core::data::CsvProvider;
    use pairlab_core::indicators::IndicatorEnricher;

    let dir = tempfile::tempdir().unwrap();
    let bars = SyntheticProvider::new(6)
        .fetch("IBM", d("2024-01-01"), d("2024-03-31"))
        .unwrap()
        .bars;
    let frame = IndicatorEnricher::standard().enrich(&bars);
    export_enriched_csv(&frame, &dir.path().join("IBM.csv")).unwrap();

    let reread = CsvProvider::new(dir.path())
        .fetch("IBM", d("2024-01-01"), d("2024-03-31"))
        .unwrap();
    assert_eq!(reread.bars, bars);
}
