//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod portfolio;
pub mod indicator;
pub mod indicator_frame;
pub mod signal;
pub mod backtest;
pub mod directional;
pub mod metrics;
pub mod strategy;
pub mod config_validation;
pub mod error;
