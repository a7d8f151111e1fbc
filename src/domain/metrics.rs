//! Performance metrics for the crossover backtest.
//!
//! Two curve statistics keep the established report definitions: the win
//! rate divides by every ledger entry (opens included) and the annualized
//! volatility is taken over the drawdown series rather than over returns.

use super::backtest::BacktestResult;
use super::portfolio::EquityPoint;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_pnl: f64,
    pub final_equity: f64,
    /// Simple return in percent.
    pub return_pct: f64,
    pub buy_and_hold: BuyAndHold,
    /// Present only when the equity curve was tracked.
    pub curve: Option<CurveMetrics>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuyAndHold {
    pub final_value: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurveMetrics {
    /// Most negative drawdown, as a fraction in [-1, 0].
    pub max_drawdown: f64,
    /// Winning entries over all ledger entries, in percent. `None` on an empty ledger.
    pub win_rate: Option<f64>,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// `None` when volatility is zero.
    pub risk_reward: Option<f64>,
}

impl Metrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let portfolio = &result.portfolio;
        let initial_capital = portfolio.initial_capital;

        let total_pnl = portfolio.total_pnl();
        let final_equity = initial_capital + total_pnl;
        let return_pct = if initial_capital > 0.0 {
            (final_equity - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        let buy_and_hold = buy_and_hold(initial_capital, result.first_price, result.last_price);

        let curve = if portfolio.equity_curve.is_empty() {
            None
        } else {
            let drawdowns = drawdown_series(&portfolio.equity_curve);
            let max_drawdown = drawdowns.iter().copied().fold(0.0_f64, f64::min);

            let wins = portfolio.trades.iter().filter(|t| t.pnl > 0.0).count();
            let win_rate = if portfolio.trades.is_empty() {
                None
            } else {
                Some(wins as f64 / portfolio.trades.len() as f64 * 100.0)
            };

            let annualized_return = annualize(return_pct / 100.0, result.bar_count);
            let annualized_volatility =
                population_stddev(&drawdowns) * TRADING_DAYS_PER_YEAR.sqrt();
            let risk_reward = if annualized_volatility != 0.0 {
                Some(annualized_return / annualized_volatility)
            } else {
                None
            };

            Some(CurveMetrics {
                max_drawdown,
                win_rate,
                annualized_return,
                annualized_volatility,
                risk_reward,
            })
        };

        Metrics {
            total_pnl,
            final_equity,
            return_pct,
            buy_and_hold,
            curve,
        }
    }
}

/// equity[t] / running_max(equity[0..=t]) - 1 for every point.
///
/// Equity at or below zero is ruin: the drawdown is floored at -1.
pub fn drawdown_series(equity_curve: &[EquityPoint]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity_curve
        .iter()
        .map(|point| {
            peak = peak.max(point.equity);
            if point.equity <= 0.0 || peak <= 0.0 {
                -1.0
            } else {
                point.equity / peak - 1.0
            }
        })
        .collect()
}

/// (1 + total_return)^(252 / bars) - 1
pub fn annualize(total_return: f64, bars: usize) -> f64 {
    if bars == 0 {
        return 0.0;
    }
    (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / bars as f64) - 1.0
}

fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn buy_and_hold(initial_capital: f64, first_price: f64, last_price: f64) -> BuyAndHold {
    let final_value = if first_price > 0.0 {
        initial_capital / first_price * last_price
    } else {
        initial_capital
    };
    let return_pct = if initial_capital > 0.0 {
        (final_value - initial_capital) / initial_capital * 100.0
    } else {
        0.0
    };
    BuyAndHold {
        final_value,
        return_pct,
    }
}
