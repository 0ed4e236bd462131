//! Rate of Change (price momentum).
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! If C[i-n] == 0: ROC = 0
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_roc(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::Roc(period));
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i < period {
                return IndicatorPoint::warmup(bar.date);
            }
            let prev_close = bars[i - period].close;
            let roc = if prev_close == 0.0 {
                0.0
            } else {
                (bar.close - prev_close) / prev_close * 100.0
            };
            IndicatorPoint::simple(bar.date, roc)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(period),
        values,
    }
}
