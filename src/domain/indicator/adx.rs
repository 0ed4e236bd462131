//! Simplified Average Directional Index.
//!
//! +DM = up move when it exceeds the down move and is positive, else 0 (−DM mirrored).
//! Trailing n-bar means of TR, +DM and −DM give +DI = 100·avg(+DM)/avg(TR) and
//! −DI = 100·avg(−DM)/avg(TR). ADX = |+DI − −DI| / (+DI + −DI) · 100.
//! This is a single DX reading, not Wilder's smoothed ADX. Warmup: first n bars invalid.

use crate::domain::indicator::atr::true_ranges;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_adx(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::Adx(period));
    }

    let tr = true_ranges(bars);
    let (plus_dm, minus_dm): (Vec<f64>, Vec<f64>) = bars
        .windows(2)
        .map(|w| {
            let up = w[1].high - w[0].high;
            let down = w[0].low - w[1].low;
            let plus = if up > down && up > 0.0 { up } else { 0.0 };
            let minus = if down > up && down > 0.0 { down } else { 0.0 };
            (plus, minus)
        })
        .unzip();

    let mean = |xs: &[f64]| xs.iter().sum::<f64>() / period as f64;

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i < period {
                return IndicatorPoint::warmup(bar.date);
            }
            let window = i - period..i;
            let avg_tr = mean(&tr[window.clone()]);
            let (plus_di, minus_di) = if avg_tr > 0.0 {
                (
                    mean(&plus_dm[window.clone()]) / avg_tr * 100.0,
                    mean(&minus_dm[window]) / avg_tr * 100.0,
                )
            } else {
                (0.0, 0.0)
            };
            let di_sum = plus_di + minus_di;
            let adx = if di_sum > 0.0 {
                (plus_di - minus_di).abs() / di_sum * 100.0
            } else {
                0.0
            };
            IndicatorPoint::simple(bar.date, adx)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Adx(period),
        values,
    }
}
