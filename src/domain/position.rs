//! Fixed-fractional position sizing with a 2:1 reward-to-risk take-profit.

use serde::Serialize;

use super::error::StratlabError;

pub const DEFAULT_RISK_FRACTION: f64 = 0.02;
pub const DEFAULT_CONFIDENCE: f64 = 1.0;
pub const REWARD_TO_RISK: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingParams {
    /// Share of the account balance put at risk between entry and stop.
    pub risk_fraction: f64,
    /// Multiplier in (0, 1] applied to the raw size.
    pub confidence: f64,
}

impl Default for SizingParams {
    fn default() -> Self {
        SizingParams {
            risk_fraction: DEFAULT_RISK_FRACTION,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSizing {
    pub recommended_size: u64,
    pub max_risk: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward_ratio: f64,
}

pub fn calculate_position_size(
    account_balance: f64,
    entry_price: f64,
    stop_loss: f64,
    params: SizingParams,
) -> Result<PositionSizing, StratlabError> {
    if !(account_balance.is_finite() && account_balance > 0.0) {
        return Err(StratlabError::configuration(
            "account balance must be positive",
        ));
    }
    if !(entry_price > 0.0 && stop_loss > 0.0) {
        return Err(StratlabError::configuration(
            "entry and stop-loss prices must be positive",
        ));
    }
    if !(params.risk_fraction > 0.0 && params.risk_fraction <= 1.0) {
        return Err(StratlabError::configuration(
            "risk fraction must be within (0, 1]",
        ));
    }
    if !(params.confidence > 0.0 && params.confidence <= 1.0) {
        return Err(StratlabError::configuration(
            "confidence must be within (0, 1]",
        ));
    }

    let price_risk = (entry_price - stop_loss).abs();
    if price_risk == 0.0 {
        return Err(StratlabError::configuration(
            "stop-loss must differ from the entry price",
        ));
    }

    let max_risk = account_balance * params.risk_fraction;
    let raw_size = (max_risk / price_risk).floor();
    let recommended_size = (raw_size * params.confidence).floor() as u64;

    // Long when the stop sits below entry, short otherwise.
    let direction = if entry_price > stop_loss { 1.0 } else { -1.0 };
    let take_profit = entry_price + direction * REWARD_TO_RISK * price_risk;

    Ok(PositionSizing {
        recommended_size,
        max_risk,
        stop_loss,
        take_profit,
        risk_reward_ratio: (take_profit - entry_price).abs() / price_risk,
    })
}
