//! Strategy parameters and history requirements.

use crate::domain::error::CrosstraderError;
use crate::domain::indicator::{bollinger, macd, momentum};

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub short_window: usize,
    pub long_window: usize,
    pub bollinger_mult: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub momentum_period: usize,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            bollinger_mult: bollinger::DEFAULT_MULT_X100 as f64 / 100.0,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            momentum_period: momentum::DEFAULT_PERIOD,
        }
    }
}

impl Strategy {
    /// Bars needed before the long moving average produces a signal.
    pub fn crossover_min_bars(&self) -> usize {
        self.long_window
    }

    /// Bars needed before momentum is defined on at least one bar.
    pub fn momentum_min_bars(&self) -> usize {
        self.momentum_period + 1
    }
}

/// Reject histories shorter than the indicator warmup.
pub fn ensure_sufficient_history(bars: usize, minimum: usize) -> Result<(), CrosstraderError> {
    if bars == 0 || bars < minimum {
        return Err(CrosstraderError::InsufficientData { bars, minimum });
    }
    Ok(())
}
