//! Seeded random-walk price history for demos and tests.
//!
//! Each weekday gets a daily return drawn uniformly from `±VOLATILITY` plus a small
//! positive drift. Open, high and low are fixed offsets from the close. The same seed and
//! symbol always produce the same history.

use crate::domain::error::StratlabError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const VOLATILITY: f64 = 0.02;
const DRIFT: f64 = 0.0003;
const MIN_VOLUME: u64 = 1_000_000;
const VOLUME_SPAN: u64 = 5_000_000;

#[derive(Debug)]
pub struct SyntheticAdapter {
    seed: u64,
    start_price: f64,
}

impl SyntheticAdapter {
    pub fn new(seed: u64, start_price: f64) -> Self {
        Self { seed, start_price }
    }

    /// Per-symbol stream so two symbols from one adapter differ.
    fn symbol_seed(&self, symbol: &str) -> u64 {
        symbol
            .bytes()
            .fold(self.seed, |h, b| h.wrapping_mul(31).wrapping_add(b as u64))
    }
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl DataPort for SyntheticAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, StratlabError> {
        if self.start_price <= 0.0 {
            return Err(StratlabError::configuration(
                "synthetic start_price must be positive",
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut price = self.start_price;
        let mut bars = Vec::new();

        let mut date = start_date;
        while date <= end_date {
            if !is_weekend(date) {
                let change = (rng.r#gen::<f64>() - 0.5) * 2.0 * VOLATILITY + DRIFT;
                price *= 1.0 + change;
                let close = round_cents(price).max(0.01);
                bars.push(PriceBar {
                    date,
                    open: round_cents(close * 0.999).max(0.01),
                    high: round_cents(close * 1.01),
                    low: round_cents(close * 0.99).max(0.01),
                    close,
                    volume: MIN_VOLUME + rng.gen_range(0..VOLUME_SPAN),
                });
            }
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }

        if bars.is_empty() {
            return Err(StratlabError::NoData {
                symbol: symbol.to_string(),
            });
        }

        debug!(symbol, bars = bars.len(), seed = self.seed, "generated synthetic history");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratlabError> {
        Ok(Vec::new())
    }
}
