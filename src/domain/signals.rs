//! Rule-based BUY/SELL/HOLD consensus over the latest technical readings.
//!
//! Each of RSI, MACD, Bollinger and Stochastic casts at most one bullish or bearish vote.
//! ADX only annotates trend strength. The call is made when one side leads and
//! `strength = |bull - bear| / (bull + bear)` exceeds 0.3.

use serde::Serialize;

use super::error::StratlabError;
use super::indicator_helpers::TechnicalSnapshot;
use super::ohlcv::PriceBar;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;
const STRONG_TREND_ADX: f64 = 25.0;
const MIN_STRENGTH: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingSignal {
    pub action: SignalAction,
    pub strength: f64,
    pub bullish: usize,
    pub bearish: usize,
    pub reasons: Vec<String>,
}

pub fn consensus(snapshot: &TechnicalSnapshot, price: f64) -> TradingSignal {
    let mut bullish: usize = 0;
    let mut bearish: usize = 0;
    let mut reasons = Vec::new();

    let mut vote = |bull: bool, bear: bool, bull_reason: &str, bear_reason: &str| {
        if bull {
            bullish += 1;
            reasons.push(bull_reason.to_string());
        } else if bear {
            bearish += 1;
            reasons.push(bear_reason.to_string());
        }
    };

    vote(
        snapshot.rsi < RSI_OVERSOLD,
        snapshot.rsi > RSI_OVERBOUGHT,
        "RSI oversold (< 30)",
        "RSI overbought (> 70)",
    );

    let macd = &snapshot.macd;
    vote(
        macd.line > macd.signal && macd.histogram > 0.0,
        macd.line < macd.signal && macd.histogram < 0.0,
        "MACD bullish crossover",
        "MACD bearish crossover",
    );

    vote(
        price < snapshot.bollinger.lower,
        price > snapshot.bollinger.upper,
        "Price below lower Bollinger Band",
        "Price above upper Bollinger Band",
    );

    let stoch = &snapshot.stochastic;
    vote(
        stoch.k < STOCH_OVERSOLD && stoch.d < STOCH_OVERSOLD,
        stoch.k > STOCH_OVERBOUGHT && stoch.d > STOCH_OVERBOUGHT,
        "Stochastic oversold",
        "Stochastic overbought",
    );

    if snapshot.adx > STRONG_TREND_ADX {
        reasons.push(format!("Strong trend (ADX: {:.1})", snapshot.adx));
    }

    let total = bullish + bearish;
    let strength = if total > 0 {
        bullish.abs_diff(bearish) as f64 / total as f64
    } else {
        0.0
    };

    let action = if bullish > bearish && strength > MIN_STRENGTH {
        SignalAction::Buy
    } else if bearish > bullish && strength > MIN_STRENGTH {
        SignalAction::Sell
    } else {
        SignalAction::Hold
    };

    TradingSignal {
        action,
        strength,
        bullish,
        bearish,
        reasons,
    }
}

/// Snapshot the latest bar of `bars` and score it at its close.
pub fn signal_for_history(bars: &[PriceBar]) -> Result<TradingSignal, StratlabError> {
    let snapshot = TechnicalSnapshot::compute(bars)?;
    let price = bars
        .last()
        .map(|b| b.close)
        .ok_or_else(|| StratlabError::data("empty price history"))?;
    Ok(consensus(&snapshot, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;
    use crate::domain::indicator_helpers::{BandReading, MacdReading, StochasticReading};

    fn neutral() -> TechnicalSnapshot {
        TechnicalSnapshot {
            sma: 100.0,
            ema: 100.0,
            rsi: 50.0,
            macd: MacdReading {
                line: 0.0,
                signal: 0.0,
                histogram: 0.0,
            },
            bollinger: BandReading {
                upper: 110.0,
                middle: 100.0,
                lower: 90.0,
            },
            stochastic: StochasticReading { k: 50.0, d: 50.0 },
            atr: 1.0,
            adx: 10.0,
        }
    }

    #[test]
    fn neutral_snapshot_holds() {
        let s = consensus(&neutral(), 100.0);
        assert_eq!(s.action, SignalAction::Hold);
        assert_eq!(s.strength, 0.0);
        assert!(s.reasons.is_empty());
    }

    #[test]
    fn oversold_everything_buys() {
        let mut snap = neutral();
        snap.rsi = 20.0;
        snap.macd = MacdReading {
            line: 1.0,
            signal: 0.5,
            histogram: 0.5,
        };
        snap.stochastic = StochasticReading { k: 10.0, d: 15.0 };
        let s = consensus(&snap, 85.0);
        assert_eq!(s.action, SignalAction::Buy);
        assert_eq!(s.bullish, 4);
        assert_eq!(s.strength, 1.0);
    }

    #[test]
    fn split_vote_holds() {
        let mut snap = neutral();
        snap.rsi = 75.0;
        let s = consensus(&snap, 85.0);
        // one bearish (RSI), one bullish (below lower band)
        assert_eq!(s.action, SignalAction::Hold);
        assert_eq!(s.strength, 0.0);
    }

    #[test]
    fn two_to_one_is_decisive() {
        let mut snap = neutral();
        snap.rsi = 75.0;
        snap.stochastic = StochasticReading { k: 90.0, d: 85.0 };
        let s = consensus(&snap, 85.0);
        assert_eq!(s.action, SignalAction::Sell);
        assert!((s.strength - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn adx_only_adds_reason() {
        let mut snap = neutral();
        snap.adx = 40.0;
        let s = consensus(&snap, 100.0);
        assert_eq!(s.action, SignalAction::Hold);
        assert_eq!(s.reasons, vec!["Strong trend (ADX: 40.0)".to_string()]);
    }

    #[test]
    fn signal_needs_enough_history() {
        let bars = make_bars(&[100.0; 10]);
        assert!(matches!(
            signal_for_history(&bars),
            Err(StratlabError::InsufficientData { .. })
        ));
    }

    #[test]
    fn falling_market_is_not_a_sell() {
        let prices: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let s = signal_for_history(&make_bars(&prices)).unwrap();
        assert_ne!(s.action, SignalAction::Sell);
        assert!(s.reasons.iter().any(|r| r == "RSI oversold (< 30)"));
    }
}
