//! PairLab CLI: pair cointegration test and enriched data export.
//!
//! Commands:
//! - `test`: fetch two tickers, build the spread, run ADF and Phillips-Perron
//! - `fetch`: fetch one ticker, compute indicators, write an enriched CSV

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pairlab_core::data::{CsvProvider, DataProvider, SyntheticProvider, YahooProvider};
use pairlab_core::indicators::IndicatorEnricher;
use pairlab_runner::{export_enriched_csv, render_json, render_text, run_pair_test, PairTestConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pairlab",
    about = "PairLab CLI: pair cointegration testing on daily closes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test whether the spread of two tickers is stationary.
    Test {
        /// First ticker (e.g., KO). May come from --config instead.
        ticker_a: Option<String>,

        /// Second ticker (e.g., PEP). May come from --config instead.
        ticker_b: Option<String>,

        /// Start date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// p-value below which a test calls the spread stationary.
        #[arg(long)]
        threshold: Option<f64>,

        /// Path to a TOML pair config; command-line values override it.
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Print the full result as JSON instead of the text report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fetch one ticker and write its bars with indicator columns as CSV.
    Fetch {
        /// Ticker to fetch.
        ticker: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderKind {
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Market data source.
    #[arg(long, value_enum, default_value = "yahoo")]
    provider: ProviderKind,

    /// Directory of `<TICKER>.csv` files for the csv provider.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Seed for the synthetic provider.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl SourceArgs {
    fn build(&self) -> Result<Box<dyn DataProvider>> {
        Ok(match self.provider {
            ProviderKind::Yahoo => {
                Box::new(YahooProvider::new().context("failed to create Yahoo client")?)
            }
            ProviderKind::Csv => Box::new(CsvProvider::new(&self.data_dir)),
            ProviderKind::Synthetic => Box::new(SyntheticProvider::new(self.seed)),
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Test {
            ticker_a,
            ticker_b,
            start,
            end,
            threshold,
            config,
            source,
            json,
        } => {
            let mut pair = match &config {
                Some(path) => PairTestConfig::from_file(path)?,
                None => PairTestConfig::default(),
            };
            if let Some(a) = ticker_a {
                pair.ticker_a = a;
            }
            if let Some(b) = ticker_b {
                pair.ticker_b = b;
            }
            pair.ticker_a = pair.ticker_a.trim().to_uppercase();
            pair.ticker_b = pair.ticker_b.trim().to_uppercase();
            pair.start_date = start.or(pair.start_date);
            pair.end_date = end.or(pair.end_date);
            if let Some(t) = threshold {
                pair.threshold = t;
            }
            run_test_cmd(&pair, &source, json)
        }
        Commands::Fetch {
            ticker,
            start,
            end,
            output,
            source,
        } => run_fetch_cmd(&ticker.trim().to_uppercase(), start, end, &output, &source),
    }
}

fn run_test_cmd(pair: &PairTestConfig, source: &SourceArgs, json: bool) -> Result<()> {
    let provider = source.build()?;
    let result = run_pair_test(pair, provider.as_ref())?;

    if json {
        println!("{}", render_json(&result)?);
    } else {
        print!("{}", render_text(&result));
    }
    Ok(())
}

fn run_fetch_cmd(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    output: &std::path::Path,
    source: &SourceArgs,
) -> Result<()> {
    let provider = source.build()?;
    let fetched = provider
        .fetch(ticker, start, end)
        .with_context(|| format!("failed to fetch {ticker}"))?;
    info!(ticker, bars = fetched.bars.len(), source = %fetched.source, "fetched bars");

    let frame = IndicatorEnricher::standard().enrich(&fetched.bars);
    export_enriched_csv(&frame, output)?;
    println!(
        "Wrote {} rows for {ticker} to {}",
        frame.len(),
        output.display()
    );
    Ok(())
}
