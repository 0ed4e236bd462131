//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n values, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = ema_values(&closes, period)
        .into_iter()
        .zip(bars)
        .map(|(ema, bar)| match ema {
            Some(v) => IndicatorPoint::simple(bar.date, v),
            None => IndicatorPoint::warmup(bar.date),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// EMA over an arbitrary numeric sequence, `None` during warm-up.
///
/// Shared with MACD, whose signal line is the EMA of the MACD line itself.
pub fn ema_values(input: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(input.len());
    if period == 0 {
        out.resize(input.len(), None);
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &price) in input.iter().enumerate() {
        if i < period - 1 {
            sum += price;
            out.push(None);
        } else if i == period - 1 {
            sum += price;
            ema = sum / period as f64;
            out.push(Some(ema));
        } else {
            ema = price * k + ema * (1.0 - k);
            out.push(Some(ema));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    #[test]
    fn ema_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn ema_period_1_tracks_price() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);

        assert_eq!(series.simple_at(0), Some(10.0));
        assert_eq!(series.simple_at(1), Some(20.0));
        assert_eq!(series.simple_at(2), Some(30.0));
    }

    #[test]
    fn ema_seed_is_sma() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);
        let v = series.simple_at(2).unwrap();
        assert!((v - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert!((series.simple_at(3).unwrap() - ema_3).abs() < f64::EPSILON);
        assert!((series.simple_at(4).unwrap() - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0; 5]);
        let series = calculate_ema(&bars, 3);
        for i in 2..5 {
            assert!((series.simple_at(i).unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_empty_bars_and_zero_period() {
        assert!(calculate_ema(&[], 3).values.is_empty());
        assert!(calculate_ema(&make_bars(&[1.0]), 0).values.is_empty());
    }

    #[test]
    fn ema_values_on_raw_sequence() {
        let out = ema_values(&[1.0, 2.0, 3.0], 2);
        assert_eq!(out[0], None);
        assert_eq!(out[1], Some(1.5));
        // 3 * 2/3 + 1.5 * 1/3 = 2.5
        assert!((out[2].unwrap() - 2.5).abs() < 1e-12);
    }
}
