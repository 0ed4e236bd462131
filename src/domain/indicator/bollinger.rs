//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation of the same window.
//! Default parameters: period=20, multiplier=2.0. Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::stddev::window_mean_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    bars: &[PriceBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100,
    };
    if period == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let mult = stddev_mult_x100 as f64 / 100.0;
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = i + 1 >= period;

        let (upper, middle, lower) = if valid {
            let (middle, stddev) = window_mean_stddev(&bars[i + 1 - period..=i]);
            (middle + mult * stddev, middle, middle - mult * stddev)
        } else {
            (f64::NAN, f64::NAN, f64::NAN)
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            },
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    fn bands(series: &IndicatorSeries, i: usize) -> (f64, f64, f64) {
        match series.values[i].value {
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => (upper, middle, lower),
            _ => panic!("expected Bollinger value"),
        }
    }

    #[test]
    fn bollinger_warmup() {
        let series = calculate_bollinger(&make_bars(&[1.0, 2.0, 3.0, 4.0]), 3, 200);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
    }

    #[test]
    fn bollinger_constant_prices_collapse() {
        let series = calculate_bollinger(&make_bars(&[10.0; 5]), 3, 200);
        let (upper, middle, lower) = bands(&series, 4);
        assert_eq!(upper, 10.0);
        assert_eq!(middle, 10.0);
        assert_eq!(lower, 10.0);
    }

    #[test]
    fn bollinger_known_values() {
        // window 2,4,4,4,5,5,7,9: mean 5, stddev 2
        let prices = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let series = calculate_bollinger(&make_bars(&prices), 8, 200);
        let (upper, middle, lower) = bands(&series, 7);
        assert!((middle - 5.0).abs() < 1e-12);
        assert!((upper - 9.0).abs() < 1e-12);
        assert!((lower - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bollinger_bands_are_symmetric() {
        let prices = [10.0, 12.0, 9.0, 14.0, 11.0, 13.0];
        let series = calculate_bollinger(&make_bars(&prices), 4, 150);
        for i in 3..prices.len() {
            let (upper, middle, lower) = bands(&series, i);
            assert!(((upper - middle) - (middle - lower)).abs() < 1e-9);
        }
    }
}
