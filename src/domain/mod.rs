//! Core domain types and logic.

pub mod error;
pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod strategy;
pub mod portfolio;
pub mod decision;
pub mod execution;
pub mod metrics;
pub mod risk;
pub mod position;
pub mod signals;
pub mod backtest;
pub mod sweep;
pub mod config_validation;
