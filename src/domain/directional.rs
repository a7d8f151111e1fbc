//! Continuous directional backtest (momentum + OBV).
//!
//! The position is decided on every bar:
//! - buy when momentum > 0 and OBV rose since the previous bar => long
//! - sell when momentum < 0 => short
//! - otherwise the previous bar's position carries forward
//!
//! Bar 0 is always flat. Returns are attributed with a one-bar lag: the
//! strategy earns `position[i-1] * pct_change[i]`. Both the strategy and a
//! buy-and-hold benchmark are compounded into cumulative indices starting
//! at 1.0. There is no trade ledger.

use chrono::NaiveDate;

use super::error::CrosstraderError;
use super::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumBar {
    pub date: NaiveDate,
    pub close: f64,
    /// `None` until the momentum window is filled.
    pub momentum: Option<f64>,
    pub obv: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub trigger: Option<Trigger>,
    pub position: Position,
    pub daily_return: f64,
    pub strategy_return: f64,
    pub cumulative_market: f64,
    pub cumulative_strategy: f64,
}

#[derive(Debug, Clone)]
pub struct DirectionalResult {
    pub points: Vec<DirectionalPoint>,
}

impl DirectionalResult {
    pub fn strategy_return(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.cumulative_strategy - 1.0)
            .unwrap_or(0.0)
    }

    pub fn market_return(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.cumulative_market - 1.0)
            .unwrap_or(0.0)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.points.iter().map(|p| p.position).collect()
    }
}

/// Buy/sell condition for bar `i` given the previous bar's OBV.
pub fn trigger_at(bar: &MomentumBar, prev_obv: f64) -> Option<Trigger> {
    match bar.momentum {
        Some(m) if m > 0.0 && bar.obv > prev_obv => Some(Trigger::Buy),
        Some(m) if m < 0.0 => Some(Trigger::Sell),
        _ => None,
    }
}

pub fn run_directional(bars: &[MomentumBar]) -> Result<DirectionalResult, CrosstraderError> {
    if bars.is_empty() {
        return Err(CrosstraderError::InsufficientData {
            bars: 0,
            minimum: 1,
        });
    }

    let mut points: Vec<DirectionalPoint> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let point = match points.last() {
            None => DirectionalPoint {
                date: bar.date,
                close: bar.close,
                trigger: None,
                position: Position::Flat,
                daily_return: 0.0,
                strategy_return: 0.0,
                cumulative_market: 1.0,
                cumulative_strategy: 1.0,
            },
            Some(prev) => {
                let trigger = trigger_at(bar, bars[i - 1].obv);
                let position = match trigger {
                    Some(Trigger::Buy) => Position::Long,
                    Some(Trigger::Sell) => Position::Short,
                    None => prev.position,
                };

                let daily_return = (bar.close - prev.close) / prev.close;
                let strategy_return = f64::from(prev.position.direction()) * daily_return;

                DirectionalPoint {
                    date: bar.date,
                    close: bar.close,
                    trigger,
                    position,
                    daily_return,
                    strategy_return,
                    cumulative_market: prev.cumulative_market * (1.0 + daily_return),
                    cumulative_strategy: prev.cumulative_strategy * (1.0 + strategy_return),
                }
            }
        };
        points.push(point);
    }

    Ok(DirectionalResult { points })
}
