//! Average True Range.
//!
//! True range needs a previous close, so it is defined from the second bar onward.
//! ATR(n)[i] = mean of the n true ranges ending at bar i. Warmup: first n bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::Atr(period));
    }

    let tr = true_ranges(bars);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i < period {
                IndicatorPoint::warmup(bar.date)
            } else {
                // tr[j] belongs to bar j + 1
                let sum: f64 = tr[i - period..i].iter().sum();
                IndicatorPoint::simple(bar.date, sum / period as f64)
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}

/// True range of every bar after the first.
pub(crate) fn true_ranges(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2).map(|w| w[1].true_range(w[0].close)).collect()
}
