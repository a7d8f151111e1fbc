//! Trade ledger and equity tracking.

use chrono::NaiveDate;

use super::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Append-only ledger plus the optional mark-to-market curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub initial_capital: f64,
    pub realized_pnl: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            initial_capital,
            realized_pnl: 0.0,
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.realized_pnl += trade.pnl;
        self.trades.push(trade);
    }

    pub fn record_equity(&mut self, date: NaiveDate, equity: f64) {
        self.equity_curve.push(EquityPoint { date, equity });
    }

    /// Capital plus realized P&L; excludes any open position.
    pub fn realized_equity(&self) -> f64 {
        self.initial_capital + self.realized_pnl
    }

    pub fn total_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.pnl).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::TradeAction;

    fn trade(action: TradeAction, pnl: f64) -> Trade {
        Trade {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            action,
            price: 10.0,
            pnl,
            is_final: false,
        }
    }

    #[test]
    fn new_portfolio() {
        let portfolio = Portfolio::new(1_000_000.0);
        assert_eq!(portfolio.realized_pnl, 0.0);
        assert!(portfolio.trades.is_empty());
        assert!(portfolio.equity_curve.is_empty());
        assert_eq!(portfolio.realized_equity(), 1_000_000.0);
    }

    #[test]
    fn record_trade_accumulates_realized() {
        let mut portfolio = Portfolio::new(1_000_000.0);
        portfolio.record_trade(trade(TradeAction::OpenLong, 0.0));
        portfolio.record_trade(trade(TradeAction::CloseLong, 250.0));
        portfolio.record_trade(trade(TradeAction::OpenShort, 0.0));
        portfolio.record_trade(trade(TradeAction::CloseShort, -100.0));

        assert_eq!(portfolio.trades.len(), 4);
        assert_eq!(portfolio.realized_pnl, 150.0);
        assert_eq!(portfolio.total_pnl(), 150.0);
        assert_eq!(portfolio.realized_equity(), 1_000_150.0);
    }

    #[test]
    fn record_equity() {
        let mut portfolio = Portfolio::new(100_000.0);
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        portfolio.record_equity(date, 105_000.0);
        assert_eq!(portfolio.equity_curve.len(), 1);
        assert_eq!(portfolio.equity_curve[0].date, date);
        assert_eq!(portfolio.equity_curve[0].equity, 105_000.0);
    }
}
