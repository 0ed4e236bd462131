//! Stochastic oscillator.
//!
//! %K = (C - lowest low) / (highest high - lowest low) * 100 over the trailing k_period bars.
//! A flat range (highest high == lowest low) yields %K = 50.
//! %D = SMA of the last d_period %K values.
//!
//! Warmup: first (k_period + d_period - 2) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

pub fn calculate_stochastic(bars: &[PriceBar], k_period: usize, d_period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Stochastic { k_period, d_period };
    if k_period == 0 || d_period == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let k_values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| {
            if i + 1 < k_period {
                return None;
            }
            let window = &bars[i + 1 - k_period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let range = highest - lowest;
            Some(if range > 0.0 {
                (bars[i].close - lowest) / range * 100.0
            } else {
                50.0
            })
        })
        .collect();

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let d = if i + 1 >= k_period + d_period - 1 {
            let recent = &k_values[i + 1 - d_period..=i];
            let sum: Option<f64> = recent.iter().copied().sum();
            sum.map(|s| s / d_period as f64)
        } else {
            None
        };

        match (k_values[i], d) {
            (Some(k), Some(d)) => values.push(IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Stochastic { k, d },
            }),
            (k, _) => values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Stochastic {
                    k: k.unwrap_or(f64::NAN),
                    d: f64::NAN,
                },
            }),
        }
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
