//! Bar-by-bar strategy execution.
//!
//! A run is a fold over the price history: FLAT/LONG state lives in a [`Portfolio`],
//! decisions come from [`crate::domain::decision`], and every bar is marked to its close.

use tracing::debug;

use crate::domain::decision::{Decision, decide, required_indicators};
use crate::domain::error::StratlabError;
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::ohlcv::PriceBar;
use crate::domain::portfolio::{EquityPoint, Portfolio, Trade};
use crate::domain::strategy::StrategyKind;

/// Ledger and valuation produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub cash: f64,
    pub shares: u64,
    pub final_value: f64,
}

/// Benchmark value of `initial_capital` fully invested at the first close.
pub fn benchmark_value(initial_capital: f64, first_close: f64, close: f64) -> f64 {
    initial_capital * (close / first_close)
}

/// Minimum history `kind` needs, or the error describing why `bars` falls short.
pub fn check_history(
    symbol: &str,
    bars: &[PriceBar],
    kind: &StrategyKind,
) -> Result<(), StratlabError> {
    if bars.is_empty() {
        return Err(StratlabError::NoData {
            symbol: symbol.to_string(),
        });
    }
    let minimum = kind.min_bars();
    if bars.len() < minimum {
        return Err(StratlabError::InsufficientData {
            context: format!("{symbol} {kind}"),
            bars: bars.len(),
            minimum,
        });
    }
    Ok(())
}

pub fn execute_strategy(
    symbol: &str,
    bars: &[PriceBar],
    kind: &StrategyKind,
    initial_capital: f64,
) -> Result<Execution, StratlabError> {
    kind.validate()?;
    check_history(symbol, bars, kind)?;

    let series = compute_indicators(bars, &required_indicators(kind));
    let first_close = bars[0].close;
    let mut portfolio = Portfolio::new(initial_capital);

    for (index, bar) in bars.iter().enumerate() {
        match decide(kind, portfolio.state(), index, &series) {
            Decision::Buy { rationale } => {
                match portfolio.buy_all(bar.date, bar.close, rationale) {
                    Some(trade) => debug!(
                        date = %trade.date,
                        price = trade.price,
                        shares = trade.shares,
                        "BUY"
                    ),
                    None => debug!(date = %bar.date, price = bar.close, "buy skipped, cash too low"),
                }
            }
            Decision::Sell { rationale } => {
                if let Some(trade) = portfolio.sell_all(bar.date, bar.close, rationale) {
                    debug!(
                        date = %trade.date,
                        price = trade.price,
                        shares = trade.shares,
                        "SELL"
                    );
                }
            }
            Decision::Hold => {}
        }

        let benchmark = benchmark_value(initial_capital, first_close, bar.close);
        portfolio.record_equity(bar.date, bar.close, benchmark);
    }

    let last_close = bars[bars.len() - 1].close;
    let final_value = portfolio.market_value(last_close);

    Ok(Execution {
        trades: portfolio.trades,
        equity_curve: portfolio.equity_curve,
        cash: portfolio.cash,
        shares: portfolio.shares,
        final_value,
    })
}
