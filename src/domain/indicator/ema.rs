//! Exponential Moving Average indicator.
//!
//! alpha = 2/(span+1), EMA[0] = C[0], then EMA[i] = C[i]*alpha + EMA[i-1]*(1-alpha).
//! Seeding with the first close (no SMA warmup) means every bar is valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub fn calculate_ema(bars: &[OhlcvBar], span: usize) -> IndicatorSeries {
    let ema = ema_of(&closes(bars), span);

    let values = bars
        .iter()
        .zip(ema)
        .map(|(bar, v)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(v),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// EMA over an arbitrary series. Returns an empty vector for span 0.
pub(crate) fn ema_of(series: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(series.len());
    let mut ema = 0.0;

    for (i, &x) in series.iter().enumerate() {
        ema = if i == 0 {
            x
        } else {
            x * alpha + ema * (1.0 - alpha)
        };
        out.push(ema);
    }

    out
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
    fn ema_seeded_with_first_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        assert!(series.values.iter().all(|p| p.valid));
        assert_eq!(series.values[0].simple(), Some(10.0));
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_ema(&bars, 3);

        let alpha = 0.5;
        let e1 = 20.0 * alpha + 10.0 * (1.0 - alpha);
        let e2 = 30.0 * alpha + e1 * (1.0 - alpha);
        let e3 = 40.0 * alpha + e2 * (1.0 - alpha);

        assert!((series.values[1].simple().unwrap() - e1).abs() < f64::EPSILON);
        assert!((series.values[2].simple().unwrap() - e2).abs() < f64::EPSILON);
        assert!((series.values[3].simple().unwrap() - e3).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_span_1_tracks_price() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);
        assert_eq!(series.values[2].simple(), Some(30.0));
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0; 6]);
        let series = calculate_ema(&bars, 4);
        for p in &series.values {
            assert!((p.simple().unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_empty_and_zero_span() {
        assert!(calculate_ema(&[], 3).values.is_empty());
        assert!(ema_of(&[1.0, 2.0], 0).is_empty());
    }
}
