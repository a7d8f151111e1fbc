//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::CrosstraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_data_source(config)?;
    validate_non_empty(config, "data", "symbol")?;
    Ok(())
}

/// Data directory and date range; the symbol may come from the command line.
pub fn validate_data_source(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_non_empty(config, "data", "path")?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_positive(config, "backtest", "initial_capital", 1.0)?;
    validate_positive(config, "backtest", "contract_size", 1.0)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_windows(config)?;
    validate_positive(config, "strategy", "bollinger_mult", 2.0)?;
    validate_macd(config)?;
    validate_period(config, "momentum_period", 14)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> CrosstraderError {
    CrosstraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), CrosstraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(CrosstraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), CrosstraderError> {
    let value = config.get_double(section, key, default);
    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid(section, key, format!("{key} must be positive")));
    }
    Ok(())
}

fn validate_period(
    config: &dyn ConfigPort,
    key: &str,
    default: i64,
) -> Result<i64, CrosstraderError> {
    let value = config.get_int("strategy", key, default);
    if value <= 0 {
        return Err(invalid("strategy", key, format!("{key} must be at least 1")));
    }
    Ok(value)
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let short = validate_period(config, "short_window", 20)?;
    let long = validate_period(config, "long_window", 50)?;
    if short >= long {
        return Err(invalid(
            "strategy",
            "long_window",
            "long_window must be greater than short_window",
        ));
    }
    Ok(())
}

fn validate_macd(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let fast = validate_period(config, "macd_fast", 12)?;
    let slow = validate_period(config, "macd_slow", 26)?;
    validate_period(config, "macd_signal", 9)?;
    if fast >= slow {
        return Err(invalid(
            "strategy",
            "macd_slow",
            "macd_slow must be greater than macd_fast",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let start_str = config.get_string("data", "start_date");
    let end_str = config.get_string("data", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "data",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, CrosstraderError> {
    match value {
        None => Err(CrosstraderError::ConfigMissing {
            section: "data".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "data",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}
