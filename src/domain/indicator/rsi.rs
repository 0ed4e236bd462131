//! RSI (Relative Strength Index).
//!
//! Simple (unsmoothed) averages over the trailing n price changes:
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)), and exactly 100 when avg_loss == 0.
//!
//! Warmup: first n bars are invalid (n price changes are needed).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

/// Value reported by callers that explicitly accept a neutral fallback.
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        let values = bars.iter().map(|b| IndicatorPoint::warmup(b.date)).collect();
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    let mut gains: Vec<f64> = Vec::with_capacity(bars.len());
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len());
    for w in bars.windows(2) {
        let change = w[1].close - w[0].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i < period {
            values.push(IndicatorPoint::warmup(bar.date));
            continue;
        }
        // Changes i-period+1 ..= i live at gain indices i-period ..= i-1.
        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        values.push(IndicatorPoint::simple(bar.date, rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
