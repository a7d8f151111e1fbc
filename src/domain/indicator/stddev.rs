//! Rolling standard deviation indicator.
//!
//! Sample standard deviation over n closing prices:
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) bars are invalid. A window of one bar has no spread
//! and is never valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let window_stddev = if period >= 2 && i + 1 >= period {
            Some(sample_stddev(&bars[i + 1 - period..=i]))
        } else {
            None
        };

        values.push(IndicatorPoint {
            date: bars[i].date,
            valid: window_stddev.is_some(),
            value: IndicatorValue::Simple(window_stddev.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

pub(crate) fn sample_stddev(window: &[OhlcvBar]) -> f64 {
    let n = window.len() as f64;
    let mean = window.iter().map(|b| b.close).sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn stddev_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_stddev(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn stddev_uses_sample_denominator() {
        // mean 20, squared deviations 100 + 0 + 100, / (3 - 1) = 100
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 3);
        assert!((series.values[2].simple().unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn stddev_constant_prices_is_zero() {
        let bars = make_bars(&[5.0, 5.0, 5.0, 5.0]);
        let series = calculate_stddev(&bars, 2);
        assert_eq!(series.values[3].simple(), Some(0.0));
    }

    #[test]
    fn stddev_single_bar_window_never_valid() {
        let bars = make_bars(&[5.0, 6.0]);
        let series = calculate_stddev(&bars, 1);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
