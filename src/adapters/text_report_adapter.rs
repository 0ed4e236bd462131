//! Plain-text report: summary, monthly returns, trade ledger and risk verdicts.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;

use chrono::Datelike;
use tracing::info;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StratlabError;
use crate::domain::portfolio::EquityPoint;
use crate::domain::risk::risk_report;
use crate::ports::report_port::ReportPort;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

struct MonthlyReturnRow {
    year: i32,
    months: Vec<Option<f64>>,
}

/// Compounded strategy return per calendar month, in percent.
fn compute_monthly_returns(equity_curve: &[EquityPoint]) -> Vec<MonthlyReturnRow> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }

    let mut growth: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for window in equity_curve.windows(2) {
        let (prev, curr) = (&window[0], &window[1]);
        if prev.strategy_value <= 0.0 {
            continue;
        }
        let factor = curr.strategy_value / prev.strategy_value;
        *growth
            .entry((curr.date.year(), curr.date.month()))
            .or_insert(1.0) *= factor;
    }

    let (Some(min_year), Some(max_year)) = (
        growth.keys().map(|k| k.0).min(),
        growth.keys().map(|k| k.0).max(),
    ) else {
        return Vec::new();
    };

    (min_year..=max_year)
        .map(|year| MonthlyReturnRow {
            year,
            months: (1..=12u32)
                .map(|month| growth.get(&(year, month)).map(|g| (g - 1.0) * 100.0))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(result: &BacktestResult) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Backtest: {} / {} ({} to {})",
            result.symbol, result.strategy, result.start_date, result.end_date
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Initial capital:   {:>14.2}", result.initial_capital);
        let _ = writeln!(out, "Final value:       {:>14.2}", result.final_value);
        let _ = writeln!(
            out,
            "Total return:      {:>14.2} ({:.2}%)",
            result.total_return, result.total_return_pct
        );
        let _ = writeln!(out, "Benchmark return:  {:>13.2}%", result.benchmark_return);
        let _ = writeln!(out, "Max drawdown:      {:>13.2}%", result.max_drawdown);
        let _ = writeln!(out, "Sharpe ratio:      {:>14.3}", result.sharpe_ratio);
        let _ = writeln!(out, "Win rate:          {:>13.1}%", result.win_rate);
        let _ = writeln!(out, "Trades:            {:>14}", result.total_trades);
        let _ = writeln!(out, "Avg trade return:  {:>13.2}%", result.avg_trade_return);

        let monthly = compute_monthly_returns(&result.equity_curve);
        if !monthly.is_empty() {
            let _ = writeln!(out);
            let _ = write!(out, "Year ");
            for m in MONTHS {
                let _ = write!(out, "{m:>8}");
            }
            let _ = writeln!(out);
            for row in &monthly {
                let _ = write!(out, "{:<5}", row.year);
                for cell in &row.months {
                    match cell {
                        Some(r) => {
                            let _ = write!(out, "{r:>8.2}");
                        }
                        None => {
                            let _ = write!(out, "{:>8}", "-");
                        }
                    }
                }
                let _ = writeln!(out);
            }
        }

        if !result.trades.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Trades:");
            for t in &result.trades {
                let _ = writeln!(
                    out,
                    "  {} {:<4} {:>8} @ {:>10.2}  {}",
                    t.date, t.side, t.shares, t.price, t.rationale
                );
            }
        }

        if let Some(risk) = &result.risk {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", risk_report(risk));
        }
        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), StratlabError> {
        fs::write(output_path, Self::render(result))?;
        info!(path = output_path, "wrote text report");
        Ok(())
    }
}
