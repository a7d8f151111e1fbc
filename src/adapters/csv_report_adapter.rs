//! CSV exports of backtest series.
//!
//! Each output is optional; a write for an unconfigured path is a no-op.
//! Undefined cells (indicator warmup) are written empty.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::directional::{DirectionalResult, Trigger};
use crate::domain::error::CrosstraderError;
use crate::domain::indicator_frame::IndicatorRow;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct LedgerRow {
    date: String,
    action: String,
    price: f64,
    pnl: f64,
}

#[derive(Serialize)]
struct EquityRow {
    date: String,
    equity: f64,
}

#[derive(Serialize)]
struct IndicatorCsvRow {
    date: String,
    price: f64,
    ma_short: Option<f64>,
    ma_long: Option<f64>,
    macd: f64,
    macd_signal: f64,
    macd_hist: f64,
    boll_upper: Option<f64>,
    boll_lower: Option<f64>,
}

#[derive(Serialize)]
struct DirectionalRow {
    date: String,
    close: f64,
    trigger: &'static str,
    position: i8,
    daily_return: f64,
    strategy_return: f64,
    cumulative_market: f64,
    cumulative_strategy: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ReportPaths {
    pub ledger: Option<PathBuf>,
    pub equity: Option<PathBuf>,
    pub indicators: Option<PathBuf>,
    pub series: Option<PathBuf>,
}

pub struct CsvReportAdapter {
    paths: ReportPaths,
}

impl CsvReportAdapter {
    pub fn new(paths: ReportPaths) -> Self {
        Self { paths }
    }
}

fn report_error(path: &Path, reason: impl std::fmt::Display) -> CrosstraderError {
    CrosstraderError::Report {
        reason: format!("{}: {reason}", path.display()),
    }
}

fn write_rows<R, I>(path: Option<&Path>, rows: I) -> Result<(), CrosstraderError>
where
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| report_error(path, e))?;
    let mut count = 0usize;
    for row in rows {
        writer.serialize(row).map_err(|e| report_error(path, e))?;
        count += 1;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = count, "wrote report");
    Ok(())
}

fn trigger_label(trigger: Option<Trigger>) -> &'static str {
    match trigger {
        Some(Trigger::Buy) => "buy",
        Some(Trigger::Sell) => "sell",
        None => "",
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_ledger(&self, result: &BacktestResult) -> Result<(), CrosstraderError> {
        write_rows(
            self.paths.ledger.as_deref(),
            result.portfolio.trades.iter().map(|t| LedgerRow {
                date: t.date.to_string(),
                action: t.label(),
                price: t.price,
                pnl: t.pnl,
            }),
        )
    }

    fn write_equity(&self, result: &BacktestResult) -> Result<(), CrosstraderError> {
        write_rows(
            self.paths.equity.as_deref(),
            result.portfolio.equity_curve.iter().map(|p| EquityRow {
                date: p.date.to_string(),
                equity: p.equity,
            }),
        )
    }

    fn write_indicators(&self, rows: &[IndicatorRow]) -> Result<(), CrosstraderError> {
        write_rows(
            self.paths.indicators.as_deref(),
            rows.iter().map(|r| IndicatorCsvRow {
                date: r.date.to_string(),
                price: r.price,
                ma_short: r.ma_short,
                ma_long: r.ma_long,
                macd: r.macd,
                macd_signal: r.macd_signal,
                macd_hist: r.macd_hist,
                boll_upper: r.boll_upper,
                boll_lower: r.boll_lower,
            }),
        )
    }

    fn write_directional(&self, result: &DirectionalResult) -> Result<(), CrosstraderError> {
        write_rows(
            self.paths.series.as_deref(),
            result.points.iter().map(|p| DirectionalRow {
                date: p.date.to_string(),
                close: p.close,
                trigger: trigger_label(p.trigger),
                position: p.position.direction(),
                daily_return: p.daily_return,
                strategy_return: p.strategy_return,
                cumulative_market: p.cumulative_market,
                cumulative_strategy: p.cumulative_strategy,
            }),
        )
    }
}
