//! Shared helpers over the indicator library: batch computation and latest-value access.

use std::collections::HashMap;

use crate::domain::error::StratlabError;
use crate::domain::indicator::{
    IndicatorSeries, IndicatorType, IndicatorValue, adx, atr, bollinger, calculate_adx,
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_roc,
    calculate_rsi, calculate_sma, calculate_stddev, calculate_stochastic, macd, rsi, stochastic,
};
use crate::domain::ohlcv::PriceBar;

/// Compute one series per requested indicator. Duplicates are computed once.
pub fn compute_indicators(
    bars: &[PriceBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for t in types {
        if out.contains_key(t) {
            continue;
        }
        out.insert(t.clone(), compute_indicator(bars, t));
    }
    out
}

pub fn compute_indicator(bars: &[PriceBar], indicator: &IndicatorType) -> IndicatorSeries {
    match *indicator {
        IndicatorType::Sma(n) => calculate_sma(bars, n),
        IndicatorType::Ema(n) => calculate_ema(bars, n),
        IndicatorType::Rsi(n) => calculate_rsi(bars, n),
        IndicatorType::Roc(n) => calculate_roc(bars, n),
        IndicatorType::Atr(n) => calculate_atr(bars, n),
        IndicatorType::Adx(n) => calculate_adx(bars, n),
        IndicatorType::Stddev(n) => calculate_stddev(bars, n),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
        IndicatorType::Stochastic { k_period, d_period } => {
            calculate_stochastic(bars, k_period, d_period)
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => calculate_bollinger(bars, period, stddev_mult_x100),
    }
}

/// Latest valid value of `indicator` over `bars`, or `InsufficientData`.
pub fn latest_value(
    bars: &[PriceBar],
    indicator: &IndicatorType,
) -> Result<IndicatorValue, StratlabError> {
    let minimum = indicator.min_bars();
    if bars.len() < minimum {
        return Err(StratlabError::InsufficientData {
            context: indicator.to_string(),
            bars: bars.len(),
            minimum,
        });
    }
    compute_indicator(bars, indicator)
        .latest()
        .map(|p| p.value.clone())
        .ok_or_else(|| StratlabError::InsufficientData {
            context: indicator.to_string(),
            bars: bars.len(),
            minimum,
        })
}

pub fn latest_simple(bars: &[PriceBar], indicator: &IndicatorType) -> Result<f64, StratlabError> {
    match latest_value(bars, indicator)? {
        IndicatorValue::Simple(v) => Ok(v),
        other => Err(StratlabError::configuration(format!(
            "{indicator} is not single-valued: {other:?}"
        ))),
    }
}

pub fn latest_rsi(bars: &[PriceBar], period: usize) -> Result<f64, StratlabError> {
    latest_simple(bars, &IndicatorType::Rsi(period))
}

/// RSI of the latest bar, or the neutral 50 when the history is too short.
///
/// Only for callers that explicitly accept a masked data shortfall; the back-test engine
/// never uses it.
pub fn latest_rsi_or_neutral(bars: &[PriceBar], period: usize) -> f64 {
    latest_rsi(bars, period).unwrap_or(rsi::NEUTRAL_RSI)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandReading {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticReading {
    pub k: f64,
    pub d: f64,
}

/// Latest reading of every indicator the signal consensus looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalSnapshot {
    pub sma: f64,
    pub ema: f64,
    pub rsi: f64,
    pub macd: MacdReading,
    pub bollinger: BandReading,
    pub stochastic: StochasticReading,
    pub atr: f64,
    pub adx: f64,
}

impl TechnicalSnapshot {
    pub const SMA_PERIOD: usize = 20;
    pub const EMA_PERIOD: usize = 12;

    /// Indicators needed for a snapshot with default parameters.
    pub fn indicator_types() -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(Self::SMA_PERIOD),
            IndicatorType::Ema(Self::EMA_PERIOD),
            IndicatorType::Rsi(rsi::DEFAULT_PERIOD),
            IndicatorType::Macd {
                fast: macd::DEFAULT_FAST,
                slow: macd::DEFAULT_SLOW,
                signal: macd::DEFAULT_SIGNAL,
            },
            IndicatorType::Bollinger {
                period: bollinger::DEFAULT_PERIOD,
                stddev_mult_x100: bollinger::DEFAULT_MULT_X100,
            },
            IndicatorType::Stochastic {
                k_period: stochastic::DEFAULT_K_PERIOD,
                d_period: stochastic::DEFAULT_D_PERIOD,
            },
            IndicatorType::Atr(atr::DEFAULT_PERIOD),
            IndicatorType::Adx(adx::DEFAULT_PERIOD),
        ]
    }

    /// Bars needed before every snapshot indicator is valid.
    pub fn min_bars() -> usize {
        Self::indicator_types()
            .iter()
            .map(IndicatorType::min_bars)
            .max()
            .unwrap_or(0)
    }

    pub fn compute(bars: &[PriceBar]) -> Result<Self, StratlabError> {
        let minimum = Self::min_bars();
        if bars.len() < minimum {
            return Err(StratlabError::InsufficientData {
                context: "technical snapshot".to_string(),
                bars: bars.len(),
                minimum,
            });
        }

        let types = Self::indicator_types();
        let series = compute_indicators(bars, &types);
        let latest = |t: &IndicatorType| -> Result<IndicatorValue, StratlabError> {
            series
                .get(t)
                .and_then(IndicatorSeries::latest)
                .map(|p| p.value.clone())
                .ok_or_else(|| StratlabError::InsufficientData {
                    context: t.to_string(),
                    bars: bars.len(),
                    minimum: t.min_bars(),
                })
        };
        let simple = |t: &IndicatorType| -> Result<f64, StratlabError> {
            match latest(t)? {
                IndicatorValue::Simple(v) => Ok(v),
                _ => Err(StratlabError::configuration(format!("{t} is not single-valued"))),
            }
        };

        let macd = match latest(&types[3])? {
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => MacdReading {
                line,
                signal,
                histogram,
            },
            _ => return Err(StratlabError::configuration("unexpected MACD payload")),
        };
        let bollinger = match latest(&types[4])? {
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => BandReading {
                upper,
                middle,
                lower,
            },
            _ => return Err(StratlabError::configuration("unexpected Bollinger payload")),
        };
        let stochastic = match latest(&types[5])? {
            IndicatorValue::Stochastic { k, d } => StochasticReading { k, d },
            _ => return Err(StratlabError::configuration("unexpected Stochastic payload")),
        };

        Ok(TechnicalSnapshot {
            sma: simple(&types[0])?,
            ema: simple(&types[1])?,
            rsi: simple(&types[2])?,
            macd,
            bollinger,
            stochastic,
            atr: simple(&types[6])?,
            adx: simple(&types[7])?,
        })
    }
}
