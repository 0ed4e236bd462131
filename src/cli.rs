//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::synthetic_adapter::SyntheticAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{BacktestResult, run_backtest};
use crate::domain::config_validation::{
    DataSourceConfig, build_data_source, build_strategy_config, validate_backtest_config,
    validate_strategy_config,
};
use crate::domain::error::StratlabError;
use crate::domain::position::{SizingParams, calculate_position_size};
use crate::domain::risk::{RiskMetrics, risk_report};
use crate::domain::signals::signal_for_history;
use crate::domain::strategy::{DEFAULT_RISK_FREE_RATE, StrategyConfig};
use crate::domain::sweep::{moving_average_grid, run_sweep};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stratlab", about = "Strategy back-testing and risk analytics")]
pub struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest described by an INI file
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write a report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "json")]
        format: ReportFormat,
        /// Override [backtest] symbol
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Risk statistics for a daily return series (one value per line)
    Risk {
        #[arg(short, long)]
        returns: PathBuf,
        #[arg(short, long)]
        benchmark: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_RISK_FREE_RATE)]
        risk_free_rate: f64,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Position size for an entry/stop pair
    Size {
        #[arg(long)]
        balance: f64,
        #[arg(long)]
        entry: f64,
        #[arg(long)]
        stop: f64,
        #[arg(long, default_value_t = 0.02)]
        risk_fraction: f64,
        #[arg(long, default_value_t = 1.0)]
        confidence: f64,
    },
    /// Indicator consensus on the latest bar of the configured symbol
    Signals {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Moving-average parameter sweep over the configured history
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, value_delimiter = ',', default_values_t = vec![5, 10, 20])]
        short: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = vec![30, 50, 100])]
        long: Vec<usize>,
        /// Write one JSON report per run, numbered from this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            output,
            format,
            symbol,
        } => run_backtest_command(&config, output.as_deref(), format, symbol),
        Command::Validate { config } => run_validate(&config),
        Command::Risk {
            returns,
            benchmark,
            risk_free_rate,
            json,
        } => run_risk(&returns, benchmark.as_deref(), risk_free_rate, json),
        Command::Size {
            balance,
            entry,
            stop,
            risk_fraction,
            confidence,
        } => run_size(
            balance,
            entry,
            stop,
            SizingParams {
                risk_fraction,
                confidence,
            },
        ),
        Command::Signals { config } => run_signals(&config),
        Command::Sweep {
            config,
            short,
            long,
            output,
        } => run_sweep_command(&config, &short, &long, output.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StratlabError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn data_port_for(source: DataSourceConfig) -> Box<dyn DataPort> {
    match source {
        DataSourceConfig::Csv { dir } => Box::new(CsvAdapter::new(dir)),
        DataSourceConfig::Synthetic { seed, start_price } => {
            Box::new(SyntheticAdapter::new(seed, start_price))
        }
    }
}

/// Parse a return series: one number per line, blank lines and `#` comments ignored.
pub fn parse_returns(content: &str) -> Result<Vec<f64>, StratlabError> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(i, line)| {
            line.parse::<f64>().map_err(|e| {
                StratlabError::data(format!("line {}: invalid return {line:?}: {e}", i + 1))
            })
        })
        .collect()
}

fn load_run(
    config_path: &Path,
    symbol: Option<String>,
) -> Result<(StrategyConfig, Box<dyn DataPort>), StratlabError> {
    let adapter = load_config(config_path)?;
    let mut config = build_strategy_config(&adapter)?;
    if let Some(symbol) = symbol {
        config.symbol = symbol;
    }
    let port = data_port_for(build_data_source(&adapter)?);
    Ok((config, port))
}

fn print_summary(result: &BacktestResult) {
    println!(
        "{} {}: final {:.2} ({:+.2}%), benchmark {:+.2}%, max drawdown {:.2}%, sharpe {:.3}, trades {}, win rate {:.1}%",
        result.symbol,
        result.strategy,
        result.final_value,
        result.total_return_pct,
        result.benchmark_return,
        result.max_drawdown,
        result.sharpe_ratio,
        result.total_trades,
        result.win_rate,
    );
}

fn run_backtest_command(
    config_path: &Path,
    output: Option<&Path>,
    format: ReportFormat,
    symbol: Option<String>,
) -> Result<(), StratlabError> {
    let (config, port) = load_run(config_path, symbol)?;
    let bars = port.fetch_bars(&config.symbol, config.start_date, config.end_date)?;
    info!(symbol = %config.symbol, bars = bars.len(), "price history loaded");

    let result = run_backtest(&bars, &config)?;
    print_summary(&result);

    if let Some(path) = output {
        let path = path.to_string_lossy();
        match format {
            ReportFormat::Json => JsonReportAdapter::new().write(&result, &path)?,
            ReportFormat::Text => TextReportAdapter::new().write(&result, &path)?,
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StratlabError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;
    let config = build_strategy_config(&adapter)?;
    build_data_source(&adapter)?;
    println!(
        "Configuration is valid: {} {} from {} to {}",
        config.symbol, config.kind, config.start_date, config.end_date
    );
    Ok(())
}

fn run_risk(
    returns_path: &Path,
    benchmark_path: Option<&Path>,
    risk_free_rate: f64,
    json: bool,
) -> Result<(), StratlabError> {
    let returns = parse_returns(&fs::read_to_string(returns_path)?)?;
    let benchmark = match benchmark_path {
        Some(p) => Some(parse_returns(&fs::read_to_string(p)?)?),
        None => None,
    };
    if let Some(bench) = &benchmark {
        if bench.len() != returns.len() {
            warn!(
                returns = returns.len(),
                benchmark = bench.len(),
                "benchmark length differs, beta/alpha fall back to 1/0"
            );
        }
    }

    let metrics = RiskMetrics::from_returns(&returns, benchmark.as_deref(), risk_free_rate)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{}", risk_report(&metrics));
    }
    Ok(())
}

fn run_size(
    balance: f64,
    entry: f64,
    stop: f64,
    params: SizingParams,
) -> Result<(), StratlabError> {
    let sizing = calculate_position_size(balance, entry, stop, params)?;
    println!("{}", serde_json::to_string_pretty(&sizing)?);
    Ok(())
}

fn run_signals(config_path: &Path) -> Result<(), StratlabError> {
    let (config, port) = load_run(config_path, None)?;
    let bars = port.fetch_bars(&config.symbol, config.start_date, config.end_date)?;
    let signal = signal_for_history(&bars)?;
    println!("{}", serde_json::to_string_pretty(&signal)?);
    Ok(())
}

fn run_sweep_command(
    config_path: &Path,
    short: &[usize],
    long: &[usize],
    output: Option<&Path>,
) -> Result<(), StratlabError> {
    let (base, port) = load_run(config_path, None)?;
    let bars = port.fetch_bars(&base.symbol, base.start_date, base.end_date)?;

    let configs = moving_average_grid(&base, short, long);
    if configs.is_empty() {
        return Err(StratlabError::configuration(
            "sweep grid has no valid short < long window pairs",
        ));
    }

    let mut finished = Vec::new();
    for (config, outcome) in configs.iter().zip(run_sweep(&bars, &configs)) {
        match outcome {
            Ok(result) => {
                print!("{}  ", config.kind);
                print_summary(&result);
                finished.push(result);
            }
            Err(e) => warn!(strategy = %config.kind, error = %e, "sweep run failed"),
        }
    }

    if let Some(path) = output {
        JsonReportAdapter::new().write_many(&finished, &path.to_string_lossy())?;
    }
    Ok(())
}
