//! CSV export of an enriched single-ticker frame.
//!
//! Columns: date, open, high, low, close, volume, adj_close, then every
//! indicator column in frame order. NaN is written as an empty cell, so the
//! file reads back through the CSV provider.

use std::path::Path;

use anyhow::{Context, Result};
use pairlab_core::indicators::IndicatorFrame;
use tracing::info;

const BAR_COLUMNS: [&str; 7] = ["date", "open", "high", "low", "close", "volume", "adj_close"];

/// Render the frame as CSV text.
pub fn enriched_csv(frame: &IndicatorFrame) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let header: Vec<&str> = BAR_COLUMNS
        .iter()
        .copied()
        .chain(frame.column_names())
        .collect();
    wtr.write_record(&header)?;

    for (i, bar) in frame.bars().iter().enumerate() {
        let mut record = vec![
            bar.date.to_string(),
            format_cell(bar.open),
            format_cell(bar.high),
            format_cell(bar.low),
            format_cell(bar.close),
            bar.volume.to_string(),
            format_cell(bar.adj_close),
        ];
        record.extend(frame.columns().iter().map(|(_, values)| format_cell(values[i])));
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Write the frame to `path`, creating parent directories as needed.
pub fn export_enriched_csv(frame: &IndicatorFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let csv = enriched_csv(frame)?;
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = frame.len(), "wrote enriched CSV");
    Ok(())
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pairlab_core::domain::Bar;
    use pairlab_core::indicators::{IndicatorEnricher, Sma};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 100,
                adj_close: close,
            })
            .collect()
    }

    #[test]
    fn header_and_empty_nan_cells() {
        let frame = IndicatorEnricher::empty()
            .with(Sma::new(2))
            .enrich(&bars(&[10.0, 12.0]));
        let csv = enriched_csv(&frame).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,open,high,low,close,volume,adj_close,sma_2");
        assert_eq!(lines[1], "2024-01-02,10,11,9,10,100,10,");
        assert_eq!(lines[2], "2024-01-03,12,13,11,12,100,12,11");
    }

    #[test]
    fn writes_file_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("KO.csv");
        let frame = IndicatorEnricher::standard().enrich(&bars(&[1.0, 2.0, 3.0]));
        export_enriched_csv(&frame, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("date,open,high,low,close,volume,adj_close,rolling_mean_20"));
    }
}
