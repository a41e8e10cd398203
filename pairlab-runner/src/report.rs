//! Human-readable and JSON renderings of a [`PairTestResult`].
//!
//! Verdict sentences are derived from the structured result; nothing here
//! feeds back into it.

use pairlab_core::describe::SeriesSummary;
use pairlab_core::stationarity::{StationarityVerdict, TestKind};

use crate::pipeline::{PairTestResult, TestOutcome};

/// Plain-text report: spread summary, per-test statistics, verdict lines.
pub fn render_text(result: &PairTestResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Pair test: {} - {} ({} to {}, source: {})\n",
        result.ticker_a, result.ticker_b, result.start, result.end, result.source
    ));
    out.push_str(&format!(
        "Observations: {} (dropped {} from {}, {} from {})\n",
        result.observations, result.dropped_a, result.ticker_a, result.dropped_b, result.ticker_b
    ));
    out.push_str(&format!("Threshold: p < {}\n\n", result.threshold));

    out.push_str("Spread Summary\n");
    match &result.summary {
        Some(summary) => out.push_str(&format_summary(summary)),
        None => out.push_str("  (no observations)\n"),
    }

    for (test, outcome) in result.outcomes() {
        out.push('\n');
        out.push_str(&format!("{} Test\n", test));
        if let TestOutcome::Computed(v) = outcome {
            out.push_str(&format_verdict(v));
        }
    }

    out.push('\n');
    for (test, outcome) in result.outcomes() {
        out.push_str(&verdict_line(&result.ticker_a, &result.ticker_b, test, outcome));
        out.push('\n');
    }
    out
}

/// The full result as pretty JSON.
pub fn render_json(result: &PairTestResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// One-sentence conclusion for a single test.
pub fn verdict_line(
    ticker_a: &str,
    ticker_b: &str,
    test: TestKind,
    outcome: &TestOutcome,
) -> String {
    match outcome {
        TestOutcome::Computed(v) if v.is_stationary => {
            format!("{ticker_a} and {ticker_b} may be cointegrated ({test} Test).")
        }
        TestOutcome::Computed(_) => {
            format!("{ticker_a} and {ticker_b} do not show strong cointegration ({test} Test).")
        }
        TestOutcome::Failed { reason } => {
            format!("{test} Test could not be computed: {reason}")
        }
    }
}

fn format_summary(s: &SeriesSummary) -> String {
    let mut out = format!("  {:<6} {}\n", "count", s.count);
    for (label, value) in [
        ("mean", s.mean),
        ("std", s.std),
        ("min", s.min),
        ("25%", s.q25),
        ("50%", s.median),
        ("75%", s.q75),
        ("max", s.max),
    ] {
        out.push_str(&format!("  {label:<6} {value:.6}\n"));
    }
    out
}

fn format_verdict(v: &StationarityVerdict) -> String {
    let lag_label = match v.test {
        TestKind::AugmentedDickeyFuller => "Lags Used",
        TestKind::PhillipsPerron => "Bandwidth",
    };
    let mut out = String::new();
    out.push_str(&format!("  Statistic:      {:.6}\n", v.statistic));
    out.push_str(&format!("  p-value:        {:.6}\n", v.p_value));
    out.push_str(&format!("  {:<16}{}\n", format!("{lag_label}:"), v.lags));
    out.push_str(&format!("  Observations:   {}\n", v.nobs));
    out.push_str("  Critical Values:\n");
    out.push_str(&format!("    1%:  {:.6}\n", v.critical_values.one_pct));
    out.push_str(&format!("    5%:  {:.6}\n", v.critical_values.five_pct));
    out.push_str(&format!("    10%: {:.6}\n", v.critical_values.ten_pct));
    out
}
