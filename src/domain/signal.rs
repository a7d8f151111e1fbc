//! Signal derivation from indicator comparisons.
//!
//! Turns OHLCV history into the per-bar inputs of the two engines:
//! [`SignalBar`] for the crossover backtest and [`MomentumBar`] for the
//! directional backtest.

use chrono::NaiveDate;

use crate::domain::directional::MomentumBar;
use crate::domain::indicator::{calculate_momentum, calculate_obv, calculate_sma};
use crate::domain::ohlcv::OhlcvBar;

/// Directional bias: -1 short, 0 neutral, +1 long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Short,
    #[default]
    Neutral,
    Long,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Neutral => 0,
            Signal::Long => 1,
        }
    }

    /// Maps the sign of `v`; zero maps to neutral.
    pub fn from_value(v: i8) -> Self {
        match v.signum() {
            1 => Signal::Long,
            -1 => Signal::Short,
            _ => Signal::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalBar {
    pub date: NaiveDate,
    pub price: f64,
    pub signal: Signal,
}

/// Compare a fast and a slow simple moving average on every bar.
///
/// Long while SMA(short) > SMA(long), short while below, neutral when equal
/// or while either average is still warming up.
pub fn ma_cross_signals(bars: &[OhlcvBar], short_window: usize, long_window: usize) -> Vec<SignalBar> {
    let fast = calculate_sma(bars, short_window).simple_values();
    let slow = calculate_sma(bars, long_window).simple_values();

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let signal = match (fast.get(i).copied().flatten(), slow.get(i).copied().flatten()) {
                (Some(f), Some(s)) if f > s => Signal::Long,
                (Some(f), Some(s)) if f < s => Signal::Short,
                _ => Signal::Neutral,
            };
            SignalBar {
                date: bar.date,
                price: bar.close,
                signal,
            }
        })
        .collect()
}

/// Indices (>= 1) where the signal differs from the previous bar.
pub fn crossover_indices(bars: &[SignalBar]) -> Vec<usize> {
    bars.windows(2)
        .enumerate()
        .filter(|(_, w)| w[0].signal != w[1].signal)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Close, momentum and OBV per bar for the directional backtest.
pub fn momentum_obv_bars(bars: &[OhlcvBar], momentum_period: usize) -> Vec<MomentumBar> {
    let momentum = calculate_momentum(bars, momentum_period).simple_values();
    let obv = calculate_obv(bars).simple_values();

    bars.iter()
        .enumerate()
        .map(|(i, bar)| MomentumBar {
            date: bar.date,
            close: bar.close,
            momentum: momentum.get(i).copied().flatten(),
            obv: obv.get(i).copied().flatten().unwrap_or(0.0),
        })
        .collect()
}
