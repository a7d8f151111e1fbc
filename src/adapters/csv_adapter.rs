//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<symbol>.csv`, with a header row of
//! `date,open,high,low,close,volume`. Extra columns (e.g. `adj_close`) are
//! ignored.

use crate::domain::error::CrosstraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct BarRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: f64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

fn data_error(reason: impl Into<String>) -> CrosstraderError {
    CrosstraderError::Data {
        reason: reason.into(),
    }
}

fn to_bar(row: BarRow, line: usize) -> Result<OhlcvBar, CrosstraderError> {
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
        .map_err(|e| data_error(format!("line {line}: invalid date {:?}: {e}", row.date)))?;
    if !(row.close.is_finite() && row.close > 0.0) {
        return Err(data_error(format!(
            "line {line}: close must be positive, got {}",
            row.close
        )));
    }
    if !(row.volume.is_finite() && row.volume >= 0.0) {
        return Err(data_error(format!(
            "line {line}: volume must be a non-negative number, got {}",
            row.volume
        )));
    }
    Ok(OhlcvBar {
        date,
        open: row.open,
        high: row.high,
        low: row.low,
        close: row.close,
        volume: row.volume.round() as i64,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, CrosstraderError> {
        let path = self.csv_path(symbol);
        let file = File::open(&path)
            .map_err(|e| data_error(format!("failed to read {}: {e}", path.display())))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut bars = Vec::new();
        for (index, result) in reader.deserialize::<BarRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let row = result.map_err(|e| data_error(format!("CSV parse error: {e}")))?;
            let bar = to_bar(row, line)?;
            if bar.date < start_date || bar.date > end_date {
                continue;
            }
            bars.push(bar);
        }

        // Stable sort, then keep the last row seen for a repeated date.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<OhlcvBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        tracing::debug!(symbol, bars = deduped.len(), path = %path.display(), "loaded bars");
        Ok(deduped)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {e}",
                self.base_path.display()
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
