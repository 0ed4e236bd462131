//! Configuration validation and typed config construction.
//!
//! Every field is checked before a run starts. Key-level problems name the offending
//! `[section] key`; cross-field constraints come from [`StrategyKind::validate`].

use crate::domain::error::StratlabError;
use crate::domain::strategy::{DEFAULT_RISK_FREE_RATE, StrategyConfig, StrategyKind};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_SYNTHETIC_SEED: u64 = 42;
pub const DEFAULT_SYNTHETIC_START_PRICE: f64 = 100.0;

/// Where price history comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSourceConfig {
    Csv { dir: PathBuf },
    Synthetic { seed: u64, start_price: f64 },
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    validate_symbol(config)?;
    validate_initial_capital(config)?;
    validate_risk_free_rate(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    strategy_kind(config)?.validate()
}

/// Validate everything and assemble the run configuration.
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, StratlabError> {
    validate_backtest_config(config)?;
    let kind = strategy_kind(config)?;
    let (start_date, end_date) = dates(config)?;
    let symbol = config.require_string("backtest", "symbol")?;

    StrategyConfig::new(
        symbol,
        kind,
        start_date,
        end_date,
        config.get_double("backtest", "initial_capital", 0.0),
    )?
    .with_risk_free_rate(config.get_double(
        "backtest",
        "risk_free_rate",
        DEFAULT_RISK_FREE_RATE,
    ))
}

/// `[data]` section: `synthetic = true` (with optional `seed`, `start_price`) or `csv_dir`.
pub fn build_data_source(config: &dyn ConfigPort) -> Result<DataSourceConfig, StratlabError> {
    if config.get_bool("data", "synthetic", false) {
        let seed = config.get_int("data", "seed", DEFAULT_SYNTHETIC_SEED as i64);
        if seed < 0 {
            return Err(invalid("data", "seed", "seed must be non-negative"));
        }
        let start_price = config.get_double("data", "start_price", DEFAULT_SYNTHETIC_START_PRICE);
        if start_price <= 0.0 {
            return Err(invalid("data", "start_price", "start_price must be positive"));
        }
        return Ok(DataSourceConfig::Synthetic {
            seed: seed as u64,
            start_price,
        });
    }

    let dir = config.require_string("data", "csv_dir")?;
    Ok(DataSourceConfig::Csv {
        dir: PathBuf::from(dir),
    })
}

/// Strategy kind with parameters read from `[strategy]`, defaults filled in.
pub fn strategy_kind(config: &dyn ConfigPort) -> Result<StrategyKind, StratlabError> {
    let name = config.require_string("strategy", "kind")?;

    let kind = match StrategyKind::from_name(&name)? {
        StrategyKind::BuyAndHold => StrategyKind::BuyAndHold,
        StrategyKind::MovingAverage {
            short_window,
            long_window,
        } => StrategyKind::MovingAverage {
            short_window: window(config, "short_window", short_window)?,
            long_window: window(config, "long_window", long_window)?,
        },
        StrategyKind::Rsi {
            period,
            oversold,
            overbought,
        } => StrategyKind::Rsi {
            period: window(config, "rsi_period", period)?,
            oversold: level(config, "oversold", oversold)?,
            overbought: level(config, "overbought", overbought)?,
        },
        StrategyKind::Momentum {
            window: w,
            entry_threshold_pct,
            exit_threshold_pct,
        } => StrategyKind::Momentum {
            window: window(config, "momentum_window", w)?,
            entry_threshold_pct: config.get_double(
                "strategy",
                "entry_threshold_pct",
                entry_threshold_pct,
            ),
            exit_threshold_pct: config.get_double(
                "strategy",
                "exit_threshold_pct",
                exit_threshold_pct,
            ),
        },
    };
    Ok(kind)
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StratlabError {
    StratlabError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, StratlabError> {
    let value = config.get_int("strategy", key, default as i64);
    if value < 1 {
        return Err(invalid(
            "strategy",
            key,
            format!("{key} must be at least 1"),
        ));
    }
    Ok(value as usize)
}

fn level(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, StratlabError> {
    let value = config.get_double("strategy", key, default);
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            "strategy",
            key,
            format!("{key} must be between 0 and 100"),
        ));
    }
    Ok(value)
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    config.require_string("backtest", "symbol").map(|_| ())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    let value = config.get_double("backtest", "initial_capital", 0.0);
    if value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    let value = config.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    dates(config).map(|_| ())
}

fn dates(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), StratlabError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok((start_date, end_date))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, StratlabError> {
    match value {
        None => Err(StratlabError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "backtest",
                field,
                format!("invalid {field} format, expected YYYY-MM-DD"),
            )
        }),
    }
}
