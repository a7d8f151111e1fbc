//! Crossover backtest engine.
//!
//! A single pass over [`SignalBar`]s driving a three-state position machine.
//! A crossover bar (signal differs from the previous bar) flips the position
//! toward the new signal: an opposite open position is closed first, then the
//! new side is opened unless already held. A neutral crossover leaves the
//! position alone. Whatever is still open after the last bar is closed at the
//! last price and tagged final.
//!
//! With [`BacktestConfig::track_equity`] set, a mark-to-market equity point is
//! recorded for every bar; otherwise only the ledger is produced.

use chrono::NaiveDate;

use super::error::CrosstraderError;
use super::portfolio::Portfolio;
use super::position::{OpenPosition, Position, Side, Trade, TradeAction};
use super::signal::{Signal, SignalBar};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1_000_000.0;
pub const DEFAULT_CONTRACT_SIZE: f64 = 200_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Fixed notional per trade; P&L is price difference times this.
    pub contract_size: f64,
    pub track_equity: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            contract_size: DEFAULT_CONTRACT_SIZE,
            track_equity: true,
        }
    }
}

/// Everything one backtest pass mutates.
#[derive(Debug, Clone)]
pub struct BacktestState {
    pub open: Option<OpenPosition>,
    pub portfolio: Portfolio,
    prev_signal: Option<Signal>,
}

impl BacktestState {
    pub fn new(initial_capital: f64) -> Self {
        BacktestState {
            open: None,
            portfolio: Portfolio::new(initial_capital),
            prev_signal: None,
        }
    }

    pub fn position(&self) -> Position {
        self.open
            .as_ref()
            .map(OpenPosition::position)
            .unwrap_or(Position::Flat)
    }

    /// Initial capital + realized P&L + unrealized P&L at `price`.
    pub fn mark_to_market(&self, price: f64) -> f64 {
        let unrealized = self
            .open
            .as_ref()
            .map(|p| p.unrealized_pnl(price))
            .unwrap_or(0.0);
        self.portfolio.realized_equity() + unrealized
    }

    /// Process one bar. Returns true when the bar was a crossover.
    pub fn step(&mut self, bar: &SignalBar, config: &BacktestConfig) -> bool {
        let crossover = matches!(self.prev_signal, Some(prev) if prev != bar.signal);
        self.prev_signal = Some(bar.signal);

        if crossover {
            match bar.signal {
                Signal::Long => self.flip_to(Side::Long, bar, config),
                Signal::Short => self.flip_to(Side::Short, bar, config),
                Signal::Neutral => {}
            }
        }

        if config.track_equity {
            let equity = self.mark_to_market(bar.price);
            self.portfolio.record_equity(bar.date, equity);
        }

        crossover
    }

    /// Close any open position at `price`, tagged final.
    pub fn finish(&mut self, date: NaiveDate, price: f64) {
        if let Some(open) = self.open.take() {
            self.close(open, date, price, true);
        }
    }

    fn flip_to(&mut self, side: Side, bar: &SignalBar, config: &BacktestConfig) {
        match self.open.take() {
            Some(open) if open.side == side => {
                self.open = Some(open);
                return;
            }
            Some(open) => self.close(open, bar.date, bar.price, false),
            None => {}
        }

        self.open = Some(OpenPosition {
            side,
            entry_price: bar.price,
            entry_date: bar.date,
            size: config.contract_size,
        });
        self.append(Trade {
            date: bar.date,
            action: TradeAction::open(side),
            price: bar.price,
            pnl: 0.0,
            is_final: false,
        });
    }

    fn close(&mut self, open: OpenPosition, date: NaiveDate, price: f64, is_final: bool) {
        tracing::debug!(
            entry_date = %open.entry_date,
            entry_price = open.entry_price,
            exit_date = %date,
            held_days = (date - open.entry_date).num_days(),
            "closing position"
        );
        self.append(Trade {
            date,
            action: TradeAction::close(open.side),
            price,
            pnl: open.unrealized_pnl(price),
            is_final,
        });
    }

    fn append(&mut self, trade: Trade) {
        tracing::debug!(
            date = %trade.date,
            action = %trade.label(),
            price = trade.price,
            pnl = trade.pnl,
            "ledger entry"
        );
        self.portfolio.record_trade(trade);
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub portfolio: Portfolio,
    pub bar_count: usize,
    pub first_price: f64,
    pub last_price: f64,
}

impl BacktestResult {
    pub fn final_equity(&self) -> f64 {
        self.portfolio.initial_capital + self.portfolio.total_pnl()
    }
}

/// Run the crossover backtest over `bars`.
///
/// Fails with [`CrosstraderError::InsufficientData`] on an empty sequence.
pub fn run_backtest(
    bars: &[SignalBar],
    config: &BacktestConfig,
) -> Result<BacktestResult, CrosstraderError> {
    let (first, last) = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(CrosstraderError::InsufficientData {
                bars: 0,
                minimum: 1,
            })
        }
    };

    let mut state = BacktestState::new(config.initial_capital);
    for bar in bars {
        state.step(bar, config);
    }
    state.finish(last.date, last.price);

    Ok(BacktestResult {
        portfolio: state.portfolio,
        bar_count: bars.len(),
        first_price: first.price,
        last_price: last.price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(signals: &[i8], prices: &[f64]) -> Vec<SignalBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        signals
            .iter()
            .zip(prices)
            .enumerate()
            .map(|(i, (&s, &p))| SignalBar {
                date: start + chrono::Duration::days(i as i64),
                price: p,
                signal: Signal::from_value(s),
            })
            .collect()
    }

    fn config(track_equity: bool) -> BacktestConfig {
        BacktestConfig {
            initial_capital: 1_000_000.0,
            contract_size: 200_000.0,
            track_equity,
        }
    }

    fn actions(result: &BacktestResult) -> Vec<String> {
        result.portfolio.trades.iter().map(Trade::label).collect()
    }

    #[test]
    fn config_defaults() {
        let c = BacktestConfig::default();
        assert_eq!(c.initial_capital, 1_000_000.0);
        assert_eq!(c.contract_size, 200_000.0);
        assert!(c.track_equity);
    }

    #[test]
    fn empty_input_is_insufficient() {
        let err = run_backtest(&[], &config(true)).unwrap_err();
        assert!(matches!(
            err,
            CrosstraderError::InsufficientData { bars: 0, .. }
        ));
    }

    #[test]
    fn first_bar_is_never_a_crossover() {
        let input = bars(&[1, 1, 1], &[10.0, 11.0, 12.0]);
        let result = run_backtest(&input, &config(false)).unwrap();
        assert!(result.portfolio.trades.is_empty());
        assert_eq!(result.final_equity(), 1_000_000.0);
    }

    #[test]
    fn long_then_short_then_final_close() {
        let input = bars(&[0, 1, 1, -1, -1], &[10.0, 11.0, 12.0, 9.0, 8.0]);
        let result = run_backtest(&input, &config(false)).unwrap();

        assert_eq!(
            actions(&result),
            vec![
                "Open Long",
                "Close Long",
                "Open Short",
                "Close Short (Final)"
            ]
        );
        let pnls: Vec<f64> = result.portfolio.trades.iter().map(|t| t.pnl).collect();
        assert_eq!(pnls, vec![0.0, -400_000.0, 0.0, 200_000.0]);
        assert_eq!(result.final_equity(), 800_000.0);
    }

    #[test]
    fn neutral_crossover_keeps_position() {
        let input = bars(&[0, 1, 0, 1, 0], &[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = run_backtest(&input, &config(false)).unwrap();

        assert_eq!(actions(&result), vec!["Open Long", "Close Long (Final)"]);
        assert_eq!(result.portfolio.trades[1].pnl, 3.0 * 200_000.0);
    }

    #[test]
    fn short_from_flat_opens_without_close() {
        let input = bars(&[0, -1, 1], &[10.0, 10.0, 9.0]);
        let result = run_backtest(&input, &config(false)).unwrap();

        assert_eq!(
            actions(&result),
            vec!["Open Short", "Close Short", "Open Long", "Close Long (Final)"]
        );
        assert_eq!(result.portfolio.trades[1].pnl, 200_000.0);
        assert_eq!(result.portfolio.trades[3].pnl, 0.0);
    }

    #[test]
    fn equity_curve_one_point_per_bar() {
        let input = bars(&[0, 1, 1, -1, -1], &[10.0, 11.0, 12.0, 9.0, 8.0]);
        let result = run_backtest(&input, &config(true)).unwrap();

        let equity: Vec<f64> = result
            .portfolio
            .equity_curve
            .iter()
            .map(|p| p.equity)
            .collect();
        assert_eq!(
            equity,
            vec![1_000_000.0, 1_000_000.0, 1_200_000.0, 600_000.0, 800_000.0]
        );
    }

    #[test]
    fn equity_disabled_records_nothing() {
        let input = bars(&[0, 1, -1], &[10.0, 11.0, 12.0]);
        let result = run_backtest(&input, &config(false)).unwrap();
        assert!(result.portfolio.equity_curve.is_empty());
    }

    #[test]
    fn step_reports_crossovers() {
        let input = bars(&[0, 0, 1, 1, -1], &[1.0; 5]);
        let cfg = config(false);
        let mut state = BacktestState::new(cfg.initial_capital);
        let flags: Vec<bool> = input.iter().map(|b| state.step(b, &cfg)).collect();
        assert_eq!(flags, vec![false, false, true, false, true]);
        assert_eq!(state.position(), Position::Short);
    }

    #[test]
    fn mark_to_market_short() {
        let input = bars(&[0, -1], &[10.0, 10.0]);
        let cfg = config(false);
        let mut state = BacktestState::new(cfg.initial_capital);
        for b in &input {
            state.step(b, &cfg);
        }
        assert_eq!(state.mark_to_market(9.5), 1_100_000.0);
    }
}
