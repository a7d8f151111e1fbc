#![allow(dead_code)]

use chrono::NaiveDate;
use crosstrader::domain::backtest::{BacktestConfig, BacktestResult};
use crosstrader::domain::directional::DirectionalResult;
use crosstrader::domain::error::CrosstraderError;
use crosstrader::domain::indicator_frame::IndicatorRow;
pub use crosstrader::domain::ohlcv::OhlcvBar;
use crosstrader::domain::signal::{Signal, SignalBar};
use crosstrader::ports::data_port::DataPort;
use crosstrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, CrosstraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CrosstraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Records what a pipeline exported.
#[derive(Default)]
pub struct RecordingReportPort {
    pub ledgers: RefCell<Vec<usize>>,
    pub equity_curves: RefCell<Vec<usize>>,
    pub indicator_rows: RefCell<Vec<usize>>,
    pub directional_points: RefCell<Vec<usize>>,
}

impl ReportPort for RecordingReportPort {
    fn write_ledger(&self, result: &BacktestResult) -> Result<(), CrosstraderError> {
        self.ledgers.borrow_mut().push(result.portfolio.trades.len());
        Ok(())
    }

    fn write_equity(&self, result: &BacktestResult) -> Result<(), CrosstraderError> {
        self.equity_curves
            .borrow_mut()
            .push(result.portfolio.equity_curve.len());
        Ok(())
    }

    fn write_indicators(&self, rows: &[IndicatorRow]) -> Result<(), CrosstraderError> {
        self.indicator_rows.borrow_mut().push(rows.len());
        Ok(())
    }

    fn write_directional(&self, result: &DirectionalResult) -> Result<(), CrosstraderError> {
        self.directional_points.borrow_mut().push(result.points.len());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64, volume: i64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close,
        high: close,
        low: close,
        close,
        volume,
    }
}

/// Consecutive daily bars from `start_date` with the given closes.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: *close,
            high: *close,
            low: *close,
            close: *close,
            volume: 1000,
        })
        .collect()
}

/// Oscillating closes around 7.0; short and long averages cross repeatedly.
pub fn wave_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 7.0 + (i as f64 * 0.35).sin() * 0.2)
        .collect()
}

pub fn signal_bars(signals: &[i8], prices: &[f64]) -> Vec<SignalBar> {
    let start = date(2024, 1, 1);
    signals
        .iter()
        .zip(prices)
        .enumerate()
        .map(|(i, (s, p))| SignalBar {
            date: start + chrono::Duration::days(i as i64),
            price: *p,
            signal: Signal::from_value(*s),
        })
        .collect()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 1_000_000.0,
        contract_size: 200_000.0,
        track_equity: true,
    }
}
