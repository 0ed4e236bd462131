//! Per-strategy decision rules.
//!
//! Each rule looks at indicator values computed up to and including the current bar plus
//! the current position state, and answers BUY, SELL or HOLD. A bar whose driving
//! indicator is still warming up is always HOLD.

use std::collections::HashMap;

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::portfolio::PositionState;
use crate::domain::strategy::StrategyKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Buy { rationale: String },
    Sell { rationale: String },
    Hold,
}

/// Indicator series a strategy reads, precomputed once per run.
pub fn required_indicators(kind: &StrategyKind) -> Vec<IndicatorType> {
    match *kind {
        StrategyKind::BuyAndHold => Vec::new(),
        StrategyKind::MovingAverage {
            short_window,
            long_window,
        } => vec![
            IndicatorType::Sma(short_window),
            IndicatorType::Sma(long_window),
        ],
        StrategyKind::Rsi { period, .. } => vec![IndicatorType::Rsi(period)],
        StrategyKind::Momentum { window, .. } => vec![IndicatorType::Roc(window)],
    }
}

/// Decide for bar `index`.
pub fn decide(
    kind: &StrategyKind,
    state: PositionState,
    index: usize,
    series: &HashMap<IndicatorType, IndicatorSeries>,
) -> Decision {
    let value = |t: IndicatorType| series.get(&t).and_then(|s| s.simple_at(index));

    match *kind {
        StrategyKind::BuyAndHold => buy_and_hold(state, index),
        StrategyKind::MovingAverage {
            short_window,
            long_window,
        } => match (
            value(IndicatorType::Sma(short_window)),
            value(IndicatorType::Sma(long_window)),
        ) {
            (Some(short), Some(long)) => moving_average(state, short, long),
            _ => Decision::Hold,
        },
        StrategyKind::Rsi {
            period,
            oversold,
            overbought,
        } => match value(IndicatorType::Rsi(period)) {
            Some(rsi) => rsi_levels(state, rsi, oversold, overbought),
            None => Decision::Hold,
        },
        StrategyKind::Momentum {
            window,
            entry_threshold_pct,
            exit_threshold_pct,
        } => match value(IndicatorType::Roc(window)) {
            Some(change_pct) => momentum(
                state,
                change_pct,
                window,
                entry_threshold_pct,
                exit_threshold_pct,
            ),
            None => Decision::Hold,
        },
    }
}

pub fn buy_and_hold(state: PositionState, index: usize) -> Decision {
    if index == 0 && state == PositionState::Flat {
        Decision::Buy {
            rationale: "Buy and hold: initial purchase".to_string(),
        }
    } else {
        Decision::Hold
    }
}

pub fn moving_average(state: PositionState, short: f64, long: f64) -> Decision {
    match state {
        PositionState::Flat if short > long => Decision::Buy {
            rationale: format!("Short MA ({short:.2}) > Long MA ({long:.2})"),
        },
        PositionState::Long if short < long => Decision::Sell {
            rationale: format!("Short MA ({short:.2}) < Long MA ({long:.2})"),
        },
        _ => Decision::Hold,
    }
}

pub fn rsi_levels(state: PositionState, rsi: f64, oversold: f64, overbought: f64) -> Decision {
    match state {
        PositionState::Flat if rsi < oversold => Decision::Buy {
            rationale: format!("RSI oversold: {rsi:.2} < {oversold}"),
        },
        PositionState::Long if rsi > overbought => Decision::Sell {
            rationale: format!("RSI overbought: {rsi:.2} > {overbought}"),
        },
        _ => Decision::Hold,
    }
}

pub fn momentum(
    state: PositionState,
    change_pct: f64,
    window: usize,
    entry_threshold_pct: f64,
    exit_threshold_pct: f64,
) -> Decision {
    match state {
        PositionState::Flat if change_pct > entry_threshold_pct => Decision::Buy {
            rationale: format!("Positive momentum: {change_pct:.2}% over {window} days"),
        },
        PositionState::Long if change_pct < exit_threshold_pct => Decision::Sell {
            rationale: format!("Negative momentum: {change_pct:.2}% over {window} days"),
        },
        _ => Decision::Hold,
    }
}
