//! Back-test orchestration: one strategy run plus its buy-and-hold benchmark.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::error::StratlabError;
use super::execution::execute_strategy;
use super::metrics::{Metrics, benchmark_returns, strategy_returns};
use super::ohlcv::{PriceBar, validate_history};
use super::portfolio::{EquityPoint, Trade};
use super::risk::RiskMetrics;
use super::strategy::StrategyConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub strategy: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    /// Percent.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    /// Percent.
    pub win_rate: f64,
    pub total_trades: usize,
    pub avg_trade_return: f64,
    pub benchmark_return: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    /// Present when the run spans at least two bars.
    pub risk: Option<RiskMetrics>,
}

pub fn run_backtest(
    bars: &[PriceBar],
    config: &StrategyConfig,
) -> Result<BacktestResult, StratlabError> {
    config.validate()?;
    validate_history(bars)?;
    check_date_range(bars, config)?;

    let execution = execute_strategy(
        &config.symbol,
        bars,
        &config.kind,
        config.initial_capital,
    )?;

    let metrics = Metrics::compute(
        config.initial_capital,
        &execution.equity_curve,
        &execution.trades,
        config.risk_free_rate,
    );

    let benchmark_final = execution
        .equity_curve
        .last()
        .map(|p| p.benchmark_value)
        .unwrap_or(config.initial_capital);
    let benchmark_return = (benchmark_final - config.initial_capital) / config.initial_capital * 100.0;

    let returns = strategy_returns(&execution.equity_curve);
    let risk = if returns.is_empty() {
        None
    } else {
        let bench = benchmark_returns(&execution.equity_curve);
        Some(RiskMetrics::from_returns(
            &returns,
            Some(&bench),
            config.risk_free_rate,
        )?)
    };

    if execution.trades.is_empty() {
        warn!(symbol = %config.symbol, strategy = %config.kind, "no trades were triggered");
    }
    info!(
        symbol = %config.symbol,
        strategy = %config.kind,
        bars = bars.len(),
        trades = execution.trades.len(),
        final_value = metrics.final_value,
        return_pct = metrics.total_return_pct,
        "backtest complete"
    );

    Ok(BacktestResult {
        symbol: config.symbol.clone(),
        strategy: config.kind.name().to_string(),
        start_date: config.start_date,
        end_date: config.end_date,
        initial_capital: config.initial_capital,
        final_value: execution.final_value,
        total_return: metrics.total_return,
        total_return_pct: metrics.total_return_pct,
        max_drawdown: metrics.max_drawdown_pct,
        sharpe_ratio: metrics.sharpe_ratio,
        win_rate: metrics.win_rate_pct,
        total_trades: execution.trades.len(),
        avg_trade_return: metrics.avg_trade_return_pct,
        benchmark_return,
        trades: execution.trades,
        equity_curve: execution.equity_curve,
        risk,
    })
}

/// Rejects bars outside `[start_date, end_date]`. Expects a validated, ordered history.
fn check_date_range(bars: &[PriceBar], config: &StrategyConfig) -> Result<(), StratlabError> {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Ok(());
    };
    if first.date < config.start_date || last.date > config.end_date {
        return Err(StratlabError::data(format!(
            "history {} to {} falls outside the configured range {} to {}",
            first.date, last.date, config.start_date, config.end_date
        )));
    }
    Ok(())
}
