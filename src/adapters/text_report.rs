//! Plain-text console reports.
//!
//! Undefined ratios render as `NaN` so the summary block always has the
//! same set of lines.

use std::fmt::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::directional::DirectionalResult;
use crate::domain::metrics::Metrics;
use crate::domain::position::Position;

fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v:.2}{suffix}"),
        None => "NaN".to_string(),
    }
}

/// Ledger lines followed by the summary statistics.
pub fn render_crossover(symbol: &str, result: &BacktestResult, metrics: &Metrics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {symbol}: Signal Crossover Backtest ===");
    let _ = writeln!(out, "Trade Ledger:");
    if result.portfolio.trades.is_empty() {
        let _ = writeln!(out, "  (no trades)");
    }
    for trade in &result.portfolio.trades {
        let _ = writeln!(
            out,
            "{} | {} | Price={:.4} | PnL={:.2}",
            trade.date,
            trade.label(),
            trade.price,
            trade.pnl
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total Profit/Loss:      {:.2}", metrics.total_pnl);
    let _ = writeln!(out, "Final Portfolio Value:  {:.2}", metrics.final_equity);
    let _ = writeln!(out, "Return:                 {:.2}%", metrics.return_pct);
    let _ = writeln!(
        out,
        "Buy-and-Hold Value:     {:.2}",
        metrics.buy_and_hold.final_value
    );
    let _ = writeln!(
        out,
        "Buy-and-Hold Return:    {:.2}%",
        metrics.buy_and_hold.return_pct
    );

    if let Some(curve) = &metrics.curve {
        let _ = writeln!(
            out,
            "Max Drawdown:           {:.2}%",
            curve.max_drawdown * 100.0
        );
        let _ = writeln!(out, "Win Rate:               {}", fmt_opt(curve.win_rate, "%"));
        let _ = writeln!(
            out,
            "Annualized Return:      {:.2}%",
            curve.annualized_return * 100.0
        );
        let _ = writeln!(
            out,
            "Annualized Volatility:  {:.2}%",
            curve.annualized_volatility * 100.0
        );
        let _ = writeln!(out, "Risk/Reward Ratio:      {}", fmt_opt(curve.risk_reward, ""));
    }

    out
}

pub fn render_directional(symbol: &str, result: &DirectionalResult) -> String {
    let mut out = String::new();

    let count = |p: Position| result.points.iter().filter(|pt| pt.position == p).count();

    let _ = writeln!(out, "=== {symbol}: Momentum/OBV Directional Backtest ===");
    let _ = writeln!(out, "Bars:                   {}", result.points.len());
    if let (Some(first), Some(last)) = (result.points.first(), result.points.last()) {
        let _ = writeln!(out, "Period:                 {} to {}", first.date, last.date);
    }
    let _ = writeln!(
        out,
        "Long/Short/Flat Bars:   {}/{}/{}",
        count(Position::Long),
        count(Position::Short),
        count(Position::Flat)
    );
    let _ = writeln!(
        out,
        "Strategy Return:        {:.2}%",
        result.strategy_return() * 100.0
    );
    let _ = writeln!(
        out,
        "Buy-and-Hold Return:    {:.2}%",
        result.market_return() * 100.0
    );

    out
}
