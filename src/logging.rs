//! Tracing subscriber setup.
//!
//! Logs go to stderr so that stdout carries only the report.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests, embedding binaries).
    let _ = match log_format().as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
}

fn env_filter() -> EnvFilter {
    let level = std::env::var("CROSSTRADER_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| std::env::var("RUST_LOG").ok());

    match level {
        Some(value) => EnvFilter::new(value),
        None => EnvFilter::new("info"),
    }
}

fn log_format() -> String {
    std::env::var("CROSSTRADER_LOG_FORMAT")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "plain".to_string())
}
