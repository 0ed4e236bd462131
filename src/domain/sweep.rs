//! Parameter sweeps: many independent back-tests over one shared price history.

use rayon::prelude::*;
use tracing::{debug, info};

use super::backtest::{BacktestResult, run_backtest};
use super::error::StratlabError;
use super::ohlcv::PriceBar;
use super::strategy::{StrategyConfig, StrategyKind};

/// Run every config against `bars` on the rayon pool.
///
/// One result per config, in input order. A failing config only fails its own slot.
pub fn run_sweep(
    bars: &[PriceBar],
    configs: &[StrategyConfig],
) -> Vec<Result<BacktestResult, StratlabError>> {
    info!(runs = configs.len(), "starting sweep");

    configs
        .par_iter()
        .map(|config| {
            debug!(strategy = %config.kind, "sweep run");
            run_backtest(bars, config)
        })
        .collect()
}

/// Every valid moving-average pair drawn from `short_windows` x `long_windows`.
pub fn moving_average_grid(
    base: &StrategyConfig,
    short_windows: &[usize],
    long_windows: &[usize],
) -> Vec<StrategyConfig> {
    let mut out = Vec::new();
    for &short_window in short_windows {
        for &long_window in long_windows {
            let kind = StrategyKind::MovingAverage {
                short_window,
                long_window,
            };
            if let Ok(config) = base.clone().with_kind(kind) {
                out.push(config);
            }
        }
    }
    out
}
