//! Performance metrics over an equity curve and trade ledger.

use chrono::NaiveDate;
use serde::Serialize;

use super::portfolio::{EquityPoint, Trade, TradeSide};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A BUY followed by the SELL that closed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTrip {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub shares: u64,
    pub pnl: f64,
    pub return_pct: f64,
}

impl RoundTrip {
    pub fn is_win(&self) -> bool {
        self.exit_price > self.entry_price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_value: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    /// Percent, 0..=100.
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    /// Percent of round trips that closed above their entry.
    pub win_rate_pct: f64,
    pub avg_trade_return_pct: f64,
    pub round_trips: Vec<RoundTrip>,
}

impl Metrics {
    pub fn compute(
        initial_capital: f64,
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        risk_free_rate: f64,
    ) -> Self {
        let final_value = equity_curve
            .last()
            .map(|p| p.strategy_value)
            .unwrap_or(initial_capital);
        let total_return = final_value - initial_capital;
        let total_return_pct = if initial_capital > 0.0 {
            total_return / initial_capital * 100.0
        } else {
            0.0
        };

        // Drawdown is measured against the starting capital as the first peak.
        let values: Vec<f64> = std::iter::once(initial_capital)
            .chain(equity_curve.iter().map(|p| p.strategy_value))
            .collect();
        let max_drawdown_pct = max_drawdown(&values) * 100.0;

        let returns = strategy_returns(equity_curve);
        let sharpe_ratio = sharpe_ratio(&returns, risk_free_rate);

        let round_trips = round_trips(trades);

        Metrics {
            final_value,
            total_return,
            total_return_pct,
            max_drawdown_pct,
            sharpe_ratio,
            win_rate_pct: win_rate(&round_trips) * 100.0,
            avg_trade_return_pct: average_trade_return_pct(&round_trips),
            round_trips,
        }
    }
}

/// `r_i = (v_i - v_{i-1}) / v_{i-1}`; a non-positive previous value yields 0.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                (w[1] - w[0]) / w[0]
            } else {
                0.0
            }
        })
        .collect()
}

pub fn strategy_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    let values: Vec<f64> = equity_curve.iter().map(|p| p.strategy_value).collect();
    simple_returns(&values)
}

pub fn benchmark_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    let values: Vec<f64> = equity_curve.iter().map(|p| p.benchmark_value).collect();
    simple_returns(&values)
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population standard deviation. Rounding noise around a constant series reads as 0.
pub fn population_stddev(xs: &[f64]) -> f64 {
    let Some(&first) = xs.first() else {
        return 0.0;
    };
    if xs.iter().all(|&x| x == first) {
        return 0.0;
    }
    let m = mean(xs);
    let variance = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    let stddev = variance.sqrt();
    if is_negligible(stddev, m) { 0.0 } else { stddev }
}

/// True when `spread` is indistinguishable from float error at the scale of `level`.
pub fn is_negligible(spread: f64, level: f64) -> bool {
    spread <= f64::EPSILON * level.abs().max(1.0)
}

/// Largest peak-to-trough decline as a fraction of the running peak.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &v in values {
        if v > peak {
            peak = v;
        } else if peak > 0.0 {
            let dd = (peak - v) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized Sharpe ratio of a daily return series; 0 when the series has no variance.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let stddev = population_stddev(returns);
    if returns.is_empty() || is_negligible(stddev, mean(returns)) {
        return 0.0;
    }
    (mean(returns) * TRADING_DAYS_PER_YEAR - risk_free_rate)
        / (stddev * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Annualized deviation of the negative returns only.
pub fn downside_deviation(returns: &[f64]) -> f64 {
    let downside: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    if downside.is_empty() {
        return 0.0;
    }
    let variance = downside.iter().map(|r| r * r).sum::<f64>() / downside.len() as f64;
    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Sortino ratio; 0 when there are no losing periods.
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let dd = downside_deviation(returns);
    if is_negligible(dd, mean(returns)) {
        return 0.0;
    }
    (mean(returns) * TRADING_DAYS_PER_YEAR - risk_free_rate) / dd
}

/// Pair each SELL with the BUY before it. An open BUY at the end is not a round trip.
pub fn round_trips(trades: &[Trade]) -> Vec<RoundTrip> {
    let mut out = Vec::new();
    let mut open: Option<&Trade> = None;
    for trade in trades {
        match trade.side {
            TradeSide::Buy => open = Some(trade),
            TradeSide::Sell => {
                if let Some(entry) = open.take() {
                    let pnl = (trade.price - entry.price) * trade.shares as f64;
                    out.push(RoundTrip {
                        entry_date: entry.date,
                        exit_date: trade.date,
                        entry_price: entry.price,
                        exit_price: trade.price,
                        shares: trade.shares,
                        pnl,
                        return_pct: (trade.price - entry.price) / entry.price * 100.0,
                    });
                }
            }
        }
    }
    out
}

/// Fraction of winning round trips, 0 when there are none.
pub fn win_rate(round_trips: &[RoundTrip]) -> f64 {
    if round_trips.is_empty() {
        return 0.0;
    }
    round_trips.iter().filter(|rt| rt.is_win()).count() as f64 / round_trips.len() as f64
}

pub fn average_trade_return_pct(round_trips: &[RoundTrip]) -> f64 {
    let returns: Vec<f64> = round_trips.iter().map(|rt| rt.return_pct).collect();
    mean(&returns)
}
