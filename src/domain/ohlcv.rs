//! Daily price bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::StratlabError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Closing prices of a bar slice, in order.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Checks the inbound contract of a price history: strictly increasing dates
/// and strictly positive prices and volumes.
pub fn validate_history(bars: &[PriceBar]) -> Result<(), StratlabError> {
    for (i, bar) in bars.iter().enumerate() {
        if !(bar.open > 0.0 && bar.high > 0.0 && bar.low > 0.0 && bar.close > 0.0) {
            return Err(StratlabError::data(format!(
                "non-positive price on {}",
                bar.date
            )));
        }
        if bar.volume == 0 {
            return Err(StratlabError::data(format!("zero volume on {}", bar.date)));
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(StratlabError::data(format!(
                "dates not strictly increasing at {} (previous {})",
                bar.date,
                bars[i - 1].date
            )));
        }
    }
    Ok(())
}
