//! Position state and ledger entries.

use chrono::NaiveDate;
use std::fmt;

/// Directional exposure: -1 short, 0 flat, +1 long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Short,
    #[default]
    Flat,
    Long,
}

impl Position {
    pub fn direction(self) -> i8 {
        match self {
            Position::Short => -1,
            Position::Flat => 0,
            Position::Long => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

/// The single position the engine may hold, with its fixed notional.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub side: Side,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub size: f64,
}

impl OpenPosition {
    pub fn position(&self) -> Position {
        match self.side {
            Side::Long => Position::Long,
            Side::Short => Position::Short,
        }
    }

    /// Long: (price - entry) x size. Short: (entry - price) x size.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.side {
            Side::Long => (price - self.entry_price) * self.size,
            Side::Short => (self.entry_price - price) * self.size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    OpenLong,
    OpenShort,
    CloseLong,
    CloseShort,
}

impl TradeAction {
    pub fn is_open(self) -> bool {
        matches!(self, TradeAction::OpenLong | TradeAction::OpenShort)
    }

    pub fn is_close(self) -> bool {
        !self.is_open()
    }

    pub fn open(side: Side) -> Self {
        match side {
            Side::Long => TradeAction::OpenLong,
            Side::Short => TradeAction::OpenShort,
        }
    }

    pub fn close(side: Side) -> Self {
        match side {
            Side::Long => TradeAction::CloseLong,
            Side::Short => TradeAction::CloseShort,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TradeAction::OpenLong => "Open Long",
            TradeAction::OpenShort => "Open Short",
            TradeAction::CloseLong => "Close Long",
            TradeAction::CloseShort => "Close Short",
        };
        f.write_str(label)
    }
}

/// One ledger entry. Opens carry zero P&L; closes carry the realized P&L.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub pnl: f64,
    /// Set on the forced close at the end of the sequence.
    pub is_final: bool,
}

impl Trade {
    /// Action label as printed in reports, e.g. "Close Long (Final)".
    pub fn label(&self) -> String {
        if self.is_final {
            format!("{} (Final)", self.action)
        } else {
            self.action.to_string()
        }
    }
}
