#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
pub use stratlab::domain::ohlcv::PriceBar;
use stratlab::domain::error::StratlabError;
use stratlab::domain::strategy::{StrategyConfig, StrategyKind};
use stratlab::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, StratlabError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StratlabError::data(reason.clone()));
        }
        let bars: Vec<PriceBar> = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if bars.is_empty() {
            return Err(StratlabError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratlabError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close,
        high: close + 1.0,
        low: (close - 1.0).max(0.01),
        close,
        volume: 1000,
    }
}

/// One bar per calendar day from 2024-01-01 with the given closes.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn falling_then_rising(top: f64, depth: usize, rise: usize) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..=depth).map(|i| top - i as f64).collect();
    let trough = top - depth as f64;
    closes.extend((1..=rise).map(|i| trough + i as f64));
    closes
}

pub fn config(kind: StrategyKind, initial_capital: f64) -> StrategyConfig {
    StrategyConfig::new(
        "TEST",
        kind,
        date(2024, 1, 1),
        date(2024, 12, 31),
        initial_capital,
    )
    .unwrap()
}

/// `date,open,high,low,close,volume` CSV body for `bars`.
pub fn to_csv(bars: &[PriceBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}
