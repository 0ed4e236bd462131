//! JSON report adapter: the whole `BacktestResult` as pretty-printed JSON.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StratlabError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(result: &BacktestResult) -> Result<String, StratlabError> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), StratlabError> {
        let json = Self::render(result)?;
        if let Some(parent) = Path::new(output_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, json)?;
        info!(path = output_path, "wrote JSON report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::run_backtest;
    use crate::domain::indicator::test_support::make_bars;
    use crate::domain::strategy::{StrategyConfig, StrategyKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_result() -> BacktestResult {
        let config = StrategyConfig::new(
            "JSON",
            StrategyKind::BuyAndHold,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            1_000.0,
        )
        .unwrap();
        run_backtest(&make_bars(&[10.0, 11.0, 12.0]), &config).unwrap()
    }

    #[test]
    fn writes_parseable_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("result.json");
        let path_str = path.to_str().unwrap();

        JsonReportAdapter::new().write(&sample_result(), path_str).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["symbol"], "JSON");
        assert_eq!(value["total_trades"], 1);
        assert_eq!(value["trades"][0]["side"], "BUY");
        assert_eq!(value["equity_curve"].as_array().unwrap().len(), 3);
        assert_eq!(value["start_date"], "2024-01-01");
    }

    #[test]
    fn write_many_numbers_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sweep.json");
        let results = vec![sample_result(), sample_result()];

        JsonReportAdapter::new()
            .write_many(&results, path.to_str().unwrap())
            .unwrap();

        assert!(dir.path().join("sweep_0.json").exists());
        assert!(dir.path().join("sweep_1.json").exists());
    }
}
