//! Per-bar indicator table for the crossover strategy.
//!
//! Collects the moving averages, MACD and Bollinger bands computed over the
//! same history into one row per bar, the shape a charting tool expects.

use chrono::NaiveDate;

use crate::domain::indicator::bollinger::mult_to_x100;
use crate::domain::indicator::{
    calculate_bollinger, calculate_macd, calculate_sma, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub price: f64,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub boll_upper: Option<f64>,
    pub boll_lower: Option<f64>,
}

pub fn build_indicator_frame(bars: &[OhlcvBar], strategy: &Strategy) -> Vec<IndicatorRow> {
    let ma_short = calculate_sma(bars, strategy.short_window).simple_values();
    let ma_long = calculate_sma(bars, strategy.long_window).simple_values();
    let macd = calculate_macd(
        bars,
        strategy.macd_fast,
        strategy.macd_slow,
        strategy.macd_signal,
    );
    // Bands are centred on the short moving average.
    let boll = calculate_bollinger(
        bars,
        strategy.short_window,
        mult_to_x100(strategy.bollinger_mult),
    );

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let (macd_line, macd_signal, macd_hist) = match macd.values.get(i).map(|p| &p.value) {
                Some(IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                }) => (*line, *signal, *histogram),
                _ => (0.0, 0.0, 0.0),
            };
            let (boll_upper, boll_lower) = match boll.values.get(i) {
                Some(p) if p.valid => match p.value {
                    IndicatorValue::Bollinger { upper, lower, .. } => (Some(upper), Some(lower)),
                    _ => (None, None),
                },
                _ => (None, None),
            };

            IndicatorRow {
                date: bar.date,
                price: bar.close,
                ma_short: ma_short.get(i).copied().flatten(),
                ma_long: ma_long.get(i).copied().flatten(),
                macd: macd_line,
                macd_signal,
                macd_hist,
                boll_upper,
                boll_lower,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = 7.0 + 0.01 * i as f64;
                OhlcvBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 0,
                }
            })
            .collect()
    }

    fn small_strategy() -> Strategy {
        Strategy {
            short_window: 3,
            long_window: 5,
            ..Strategy::default()
        }
    }

    #[test]
    fn one_row_per_bar() {
        let rows = build_indicator_frame(&ramp(10), &small_strategy());
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[9].price, 7.0 + 0.01 * 9.0);
    }

    #[test]
    fn warmup_columns_are_empty() {
        let rows = build_indicator_frame(&ramp(10), &small_strategy());
        assert!(rows[1].ma_short.is_none());
        assert!(rows[1].boll_upper.is_none());
        assert!(rows[2].ma_short.is_some());
        assert!(rows[2].boll_upper.is_some());
        assert!(rows[3].ma_long.is_none());
        assert!(rows[4].ma_long.is_some());
    }

    #[test]
    fn bands_straddle_short_average() {
        let rows = build_indicator_frame(&ramp(10), &small_strategy());
        let row = &rows[6];
        let mid = row.ma_short.unwrap();
        assert!(row.boll_upper.unwrap() > mid);
        assert!(row.boll_lower.unwrap() < mid);
    }

    #[test]
    fn macd_positive_on_rising_prices() {
        let rows = build_indicator_frame(&ramp(30), &Strategy::default());
        assert!(rows[29].macd > 0.0);
        assert!((rows[29].macd_hist - (rows[29].macd - rows[29].macd_signal)).abs() < 1e-15);
    }
}
