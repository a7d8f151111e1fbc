//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::{CsvReportAdapter, ReportPaths};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report;
use crate::domain::backtest::{
    run_backtest, BacktestConfig, DEFAULT_CONTRACT_SIZE, DEFAULT_INITIAL_CAPITAL,
};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_data_config, validate_data_source,
    validate_strategy_config,
};
use crate::domain::directional::run_directional;
use crate::domain::error::CrosstraderError;
use crate::domain::indicator::bollinger::mult_to_x100;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_frame::build_indicator_frame;
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{crossover_indices, ma_cross_signals, momentum_obv_bars};
use crate::domain::strategy::{ensure_sufficient_history, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "crosstrader",
    about = "Indicator-signal backtester for a single instrument"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the moving-average crossover backtest
    Crossover {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Skip the equity curve and its statistics
        #[arg(long)]
        no_equity: bool,
        #[arg(long)]
        ledger_out: Option<PathBuf>,
        #[arg(long)]
        equity_out: Option<PathBuf>,
        #[arg(long)]
        indicators_out: Option<PathBuf>,
    },
    /// Run the momentum/OBV directional backtest
    Momentum {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        series_out: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything a pipeline run needs, resolved from config and CLI overrides.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub backtest: BacktestConfig,
    pub strategy: Strategy,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Crossover {
            config,
            symbol,
            no_equity,
            ledger_out,
            equity_out,
            indicators_out,
        } => run_crossover(
            &config,
            symbol.as_deref(),
            no_equity,
            ReportPaths {
                ledger: ledger_out,
                equity: equity_out,
                indicators: indicators_out,
                series: None,
            },
        ),
        Command::Momentum {
            config,
            symbol,
            series_out,
        } => run_momentum(
            &config,
            symbol.as_deref(),
            ReportPaths {
                series: series_out,
                ..ReportPaths::default()
            },
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CrosstraderError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_backtest_config(config: &dyn ConfigPort, no_equity: bool) -> BacktestConfig {
    BacktestConfig {
        initial_capital: config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        contract_size: config.get_double("backtest", "contract_size", DEFAULT_CONTRACT_SIZE),
        track_equity: !no_equity && config.get_bool("backtest", "track_equity", true),
    }
}

pub fn build_strategy(config: &dyn ConfigPort) -> Strategy {
    let defaults = Strategy::default();
    Strategy {
        short_window: config.get_usize("strategy", "short_window", defaults.short_window),
        long_window: config.get_usize("strategy", "long_window", defaults.long_window),
        bollinger_mult: config.get_double("strategy", "bollinger_mult", defaults.bollinger_mult),
        macd_fast: config.get_usize("strategy", "macd_fast", defaults.macd_fast),
        macd_slow: config.get_usize("strategy", "macd_slow", defaults.macd_slow),
        macd_signal: config.get_usize("strategy", "macd_signal", defaults.macd_signal),
        momentum_period: config.get_usize("strategy", "momentum_period", defaults.momentum_period),
    }
}

pub fn data_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), CrosstraderError> {
    let start = parse_date(config.get_string("data", "start_date").as_deref(), "start_date")?;
    let end = parse_date(config.get_string("data", "end_date").as_deref(), "end_date")?;
    Ok((start, end))
}

pub fn data_path(config: &dyn ConfigPort) -> Result<PathBuf, CrosstraderError> {
    config
        .get_string("data", "path")
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| CrosstraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

/// CLI paths win over `[report]` entries.
pub fn report_paths(config: &dyn ConfigPort, overrides: ReportPaths) -> ReportPaths {
    let from_config = |key: &str| {
        config
            .get_string("report", key)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    };
    ReportPaths {
        ledger: overrides.ledger.or_else(|| from_config("ledger_path")),
        equity: overrides.equity.or_else(|| from_config("equity_path")),
        indicators: overrides.indicators.or_else(|| from_config("indicators_path")),
        series: overrides.series.or_else(|| from_config("series_path")),
    }
}

/// Validate every section and resolve the run parameters.
pub fn load_settings(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
    no_equity: bool,
) -> Result<RunSettings, CrosstraderError> {
    match symbol_override {
        Some(_) => validate_data_source(config)?,
        None => validate_data_config(config)?,
    }
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;

    let symbol = match symbol_override {
        Some(s) => s.to_string(),
        None => config
            .get_string("data", "symbol")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    };
    let (start_date, end_date) = data_range(config)?;

    Ok(RunSettings {
        symbol,
        start_date,
        end_date,
        backtest: build_backtest_config(config, no_equity),
        strategy: build_strategy(config),
    })
}

fn fetch_bars(
    data_port: &dyn DataPort,
    settings: &RunSettings,
    minimum: usize,
) -> Result<Vec<OhlcvBar>, CrosstraderError> {
    let bars = data_port.fetch_ohlcv(&settings.symbol, settings.start_date, settings.end_date)?;
    if bars.is_empty() {
        return Err(CrosstraderError::NoData {
            symbol: settings.symbol.clone(),
        });
    }
    ensure_sufficient_history(bars.len(), minimum)?;
    tracing::info!(
        symbol = %settings.symbol,
        bars = bars.len(),
        start = %settings.start_date,
        end = %settings.end_date,
        "fetched price history"
    );
    Ok(bars)
}

/// Fetch, derive crossover signals, backtest, export, and render the report.
pub fn run_crossover_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    settings: &RunSettings,
) -> Result<String, CrosstraderError> {
    let strategy = &settings.strategy;
    let bars = fetch_bars(data_port, settings, strategy.crossover_min_bars())?;

    let signals = ma_cross_signals(&bars, strategy.short_window, strategy.long_window);
    tracing::info!(
        crossovers = crossover_indices(&signals).len(),
        short_window = strategy.short_window,
        long_window = strategy.long_window,
        "derived signals"
    );

    let result = run_backtest(&signals, &settings.backtest)?;
    let metrics = Metrics::compute(&result);
    tracing::info!(
        trades = result.portfolio.trades.len(),
        final_equity = metrics.final_equity,
        "backtest complete"
    );

    report_port.write_ledger(&result)?;
    if settings.backtest.track_equity {
        report_port.write_equity(&result)?;
    }
    report_port.write_indicators(&build_indicator_frame(&bars, strategy))?;

    Ok(text_report::render_crossover(&settings.symbol, &result, &metrics))
}

/// Fetch, derive momentum/OBV, run the directional backtest, export, and render.
pub fn run_momentum_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    settings: &RunSettings,
) -> Result<String, CrosstraderError> {
    let strategy = &settings.strategy;
    let bars = fetch_bars(data_port, settings, strategy.momentum_min_bars())?;

    let inputs = momentum_obv_bars(&bars, strategy.momentum_period);
    let result = run_directional(&inputs)?;
    tracing::info!(
        bars = result.points.len(),
        strategy_return = result.strategy_return(),
        market_return = result.market_return(),
        "directional backtest complete"
    );

    report_port.write_directional(&result)?;

    Ok(text_report::render_directional(&settings.symbol, &result))
}

fn run_crossover(
    config_path: &Path,
    symbol: Option<&str>,
    no_equity: bool,
    overrides: ReportPaths,
) -> Result<(), CrosstraderError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config, symbol, no_equity)?;
    let paths = report_paths(&config, overrides);
    if !settings.backtest.track_equity && paths.equity.is_some() {
        tracing::warn!("equity tracking disabled; equity output skipped");
    }

    let data_port = CsvAdapter::new(data_path(&config)?);
    let report_port = CsvReportAdapter::new(paths);
    let report = run_crossover_pipeline(&data_port, &report_port, &settings)?;
    print!("{report}");
    Ok(())
}

fn run_momentum(
    config_path: &Path,
    symbol: Option<&str>,
    overrides: ReportPaths,
) -> Result<(), CrosstraderError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config, symbol, true)?;

    let data_port = CsvAdapter::new(data_path(&config)?);
    let report_port = CsvReportAdapter::new(report_paths(&config, overrides));
    let report = run_momentum_pipeline(&data_port, &report_port, &settings)?;
    print!("{report}");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), CrosstraderError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config, None, false)?;
    let strategy = &settings.strategy;

    println!("Configuration valid: {}", config_path.display());
    println!("  Symbol:      {}", settings.symbol);
    println!("  Period:      {} to {}", settings.start_date, settings.end_date);
    println!(
        "  Capital:     {:.2} (contract size {:.0})",
        settings.backtest.initial_capital, settings.backtest.contract_size
    );
    println!(
        "  Crossover:   {} vs {}, needs {} bars",
        IndicatorType::Sma(strategy.short_window),
        IndicatorType::Sma(strategy.long_window),
        strategy.crossover_min_bars()
    );
    println!(
        "  Indicators:  {}, {}",
        IndicatorType::Macd {
            fast: strategy.macd_fast,
            slow: strategy.macd_slow,
            signal: strategy.macd_signal,
        },
        IndicatorType::Bollinger {
            period: strategy.short_window,
            stddev_mult_x100: mult_to_x100(strategy.bollinger_mult),
        }
    );
    println!(
        "  Momentum:    {} + {}, needs {} bars",
        IndicatorType::Momentum(strategy.momentum_period),
        IndicatorType::Obv,
        strategy.momentum_min_bars()
    );
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), CrosstraderError> {
    let config = load_config(config_path)?;
    let adapter = CsvAdapter::new(data_path(&config)?);
    let symbols = adapter.list_symbols()?;
    if symbols.is_empty() {
        tracing::warn!("no CSV files found in data directory");
    }
    for symbol in symbols {
        println!("{symbol}");
    }
    Ok(())
}
