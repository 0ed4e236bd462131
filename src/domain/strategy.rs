//! Strategy configuration.
//!
//! A [`StrategyConfig`] is only obtainable through [`StrategyConfig::new`], which rejects
//! every invalid parameter combination. Nothing is silently corrected.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::domain::error::StratlabError;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Decision procedure and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    BuyAndHold,
    MovingAverage {
        short_window: usize,
        long_window: usize,
    },
    Rsi {
        period: usize,
        oversold: f64,
        overbought: f64,
    },
    Momentum {
        window: usize,
        /// Percent change over `window` above which a position is opened.
        entry_threshold_pct: f64,
        /// Percent change over `window` below which the position is closed.
        exit_threshold_pct: f64,
    },
}

impl StrategyKind {
    pub fn moving_average() -> Self {
        StrategyKind::MovingAverage {
            short_window: 10,
            long_window: 30,
        }
    }

    pub fn rsi() -> Self {
        StrategyKind::Rsi {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }

    pub fn momentum() -> Self {
        StrategyKind::Momentum {
            window: 20,
            entry_threshold_pct: 5.0,
            exit_threshold_pct: -3.0,
        }
    }

    /// Default-parameter variant for a configuration name.
    pub fn from_name(name: &str) -> Result<Self, StratlabError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "buy_and_hold" => Ok(StrategyKind::BuyAndHold),
            "moving_average" => Ok(Self::moving_average()),
            "rsi" | "rsi_strategy" => Ok(Self::rsi()),
            "momentum" => Ok(Self::momentum()),
            _ => Err(StratlabError::UnknownStrategy {
                kind: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::BuyAndHold => "buy_and_hold",
            StrategyKind::MovingAverage { .. } => "moving_average",
            StrategyKind::Rsi { .. } => "rsi",
            StrategyKind::Momentum { .. } => "momentum",
        }
    }

    /// Shortest history on which the driving indicator produces at least one value.
    pub fn min_bars(&self) -> usize {
        match *self {
            StrategyKind::BuyAndHold => 1,
            StrategyKind::MovingAverage { long_window, .. } => long_window,
            StrategyKind::Rsi { period, .. } => period + 1,
            StrategyKind::Momentum { window, .. } => window + 1,
        }
    }

    pub fn validate(&self) -> Result<(), StratlabError> {
        match *self {
            StrategyKind::BuyAndHold => Ok(()),
            StrategyKind::MovingAverage {
                short_window,
                long_window,
            } => {
                if short_window == 0 {
                    return Err(StratlabError::configuration(
                        "short_window must be at least 1",
                    ));
                }
                if short_window >= long_window {
                    return Err(StratlabError::configuration(format!(
                        "short_window ({short_window}) must be less than long_window ({long_window})"
                    )));
                }
                Ok(())
            }
            StrategyKind::Rsi {
                period,
                oversold,
                overbought,
            } => {
                if period == 0 {
                    return Err(StratlabError::configuration("rsi_period must be at least 1"));
                }
                for (name, level) in [("oversold", oversold), ("overbought", overbought)] {
                    if !(0.0..=100.0).contains(&level) {
                        return Err(StratlabError::configuration(format!(
                            "{name} level {level} must be within 0..=100"
                        )));
                    }
                }
                if oversold >= overbought {
                    return Err(StratlabError::configuration(format!(
                        "oversold ({oversold}) must be below overbought ({overbought})"
                    )));
                }
                Ok(())
            }
            StrategyKind::Momentum {
                window,
                entry_threshold_pct,
                exit_threshold_pct,
            } => {
                if window == 0 {
                    return Err(StratlabError::configuration(
                        "momentum_window must be at least 1",
                    ));
                }
                if !entry_threshold_pct.is_finite() || !exit_threshold_pct.is_finite() {
                    return Err(StratlabError::configuration(
                        "momentum thresholds must be finite",
                    ));
                }
                if entry_threshold_pct <= exit_threshold_pct {
                    return Err(StratlabError::configuration(format!(
                        "entry threshold ({entry_threshold_pct}%) must exceed exit threshold ({exit_threshold_pct}%)"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::BuyAndHold => write!(f, "buy_and_hold"),
            StrategyKind::MovingAverage {
                short_window,
                long_window,
            } => write!(f, "moving_average({short_window},{long_window})"),
            StrategyKind::Rsi {
                period,
                oversold,
                overbought,
            } => write!(f, "rsi({period},{oversold},{overbought})"),
            StrategyKind::Momentum {
                window,
                entry_threshold_pct,
                exit_threshold_pct,
            } => write!(
                f,
                "momentum({window},{entry_threshold_pct}%,{exit_threshold_pct}%)"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyConfig {
    pub symbol: String,
    pub kind: StrategyKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub risk_free_rate: f64,
}

impl StrategyConfig {
    pub fn new(
        symbol: impl Into<String>,
        kind: StrategyKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        initial_capital: f64,
    ) -> Result<Self, StratlabError> {
        let config = StrategyConfig {
            symbol: symbol.into(),
            kind,
            start_date,
            end_date,
            initial_capital,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_risk_free_rate(mut self, rate: f64) -> Result<Self, StratlabError> {
        self.risk_free_rate = rate;
        self.validate()?;
        Ok(self)
    }

    pub fn with_kind(mut self, kind: StrategyKind) -> Result<Self, StratlabError> {
        self.kind = kind;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), StratlabError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(StratlabError::configuration(
                "initial_capital must be positive",
            ));
        }
        if self.start_date >= self.end_date {
            return Err(StratlabError::configuration(format!(
                "empty date range: {} is not before {}",
                self.start_date, self.end_date
            )));
        }
        if !(0.0..1.0).contains(&self.risk_free_rate) {
            return Err(StratlabError::configuration(
                "risk_free_rate must be between 0 and 1",
            ));
        }
        self.kind.validate()
    }
}
