//! Portfolio state, trade ledger and equity tracking for a single long-only run.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub shares: u64,
    pub notional_value: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub strategy_value: f64,
    pub benchmark_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

/// Cash plus a single all-in position. Mutated only by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub shares: u64,
    pub initial_capital: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            shares: 0,
            initial_capital,
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn state(&self) -> PositionState {
        if self.shares > 0 {
            PositionState::Long
        } else {
            PositionState::Flat
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    /// Spend all cash on whole shares at `price`.
    ///
    /// Returns `None` (nothing recorded) when already long or when not a single share is
    /// affordable.
    pub fn buy_all(
        &mut self,
        date: NaiveDate,
        price: f64,
        rationale: impl Into<String>,
    ) -> Option<&Trade> {
        if self.state() == PositionState::Long || price <= 0.0 {
            return None;
        }
        let shares = (self.cash / price).floor();
        if shares < 1.0 {
            return None;
        }
        let shares = shares as u64;
        let notional_value = shares as f64 * price;
        self.cash -= notional_value;
        self.shares = shares;
        self.trades.push(Trade {
            date,
            side: TradeSide::Buy,
            price,
            shares,
            notional_value,
            rationale: rationale.into(),
        });
        self.trades.last()
    }

    /// Liquidate the whole position at `price`. `None` when flat.
    pub fn sell_all(
        &mut self,
        date: NaiveDate,
        price: f64,
        rationale: impl Into<String>,
    ) -> Option<&Trade> {
        if self.state() == PositionState::Flat {
            return None;
        }
        let shares = self.shares;
        let notional_value = shares as f64 * price;
        self.cash += notional_value;
        self.shares = 0;
        self.trades.push(Trade {
            date,
            side: TradeSide::Sell,
            price,
            shares,
            notional_value,
            rationale: rationale.into(),
        });
        self.trades.last()
    }

    pub fn record_equity(&mut self, date: NaiveDate, close: f64, benchmark_value: f64) {
        let strategy_value = self.market_value(close);
        self.equity_curve.push(EquityPoint {
            date,
            strategy_value,
            benchmark_value,
        });
    }
}
