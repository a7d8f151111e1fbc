//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::directional::DirectionalResult;
use crate::domain::error::CrosstraderError;
use crate::domain::indicator_frame::IndicatorRow;

/// Port for exporting backtest series to an external consumer (charting, spreadsheets).
pub trait ReportPort {
    fn write_ledger(&self, result: &BacktestResult) -> Result<(), CrosstraderError>;

    fn write_equity(&self, result: &BacktestResult) -> Result<(), CrosstraderError>;

    fn write_indicators(&self, rows: &[IndicatorRow]) -> Result<(), CrosstraderError>;

    fn write_directional(&self, result: &DirectionalResult) -> Result<(), CrosstraderError>;
}
