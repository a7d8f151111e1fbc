//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Closing prices in bar order.
pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar(close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 50_000,
        }
    }

    #[test]
    fn closes_in_order() {
        let bars = vec![sample_bar(1.0), sample_bar(2.0), sample_bar(3.0)];
        assert_eq!(closes(&bars), vec![1.0, 2.0, 3.0]);
    }
}
