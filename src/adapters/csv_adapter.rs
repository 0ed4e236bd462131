//! CSV price history: one `<SYMBOL>.csv` per symbol with header
//! `date,open,high,low,close,volume`.

use crate::domain::error::StratlabError;
use crate::domain::ohlcv::{PriceBar, validate_history};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug)]
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, StratlabError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            StratlabError::data(format!("failed to read {}: {e}", path.display()))
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut bars = Vec::new();
        for (line, record) in rdr.deserialize::<PriceBar>().enumerate() {
            let bar = record.map_err(|e| {
                StratlabError::data(format!("{}: row {}: {e}", path.display(), line + 1))
            })?;
            if bar.date >= start_date && bar.date <= end_date {
                bars.push(bar);
            }
        }

        if bars.is_empty() {
            return Err(StratlabError::NoData {
                symbol: symbol.to_string(),
            });
        }
        validate_history(&bars)?;

        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded CSV history");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratlabError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("MSFT.csv"), csv_content).unwrap();
        fs::write(path.join("EMPTY.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,1,1,1,10\n",
        )
        .unwrap();
        fs::write(
            path.join("UNSORTED.csv"),
            "date,open,high,low,close,volume\n\
            2024-01-16,1,1,1,1,10\n\
            2024-01-15,1,1,1,1,10\n",
        )
        .unwrap();
        fs::write(
            path.join("NOVOL.csv"),
            "date,open,high,low,close,volume\n\
            2024-01-15,1,1,1,1,10\n\
            2024-01-16,1,1,1,1,0\n",
        )
        .unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_returns_correct_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter
            .fetch_bars("MSFT", d(2024, 1, 15), d(2024, 1, 17))
            .unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(
            bars[0],
            PriceBar {
                date: d(2024, 1, 15),
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 105.0,
                volume: 50000,
            }
        );
    }

    #[test]
    fn fetch_bars_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter
            .fetch_bars("MSFT", d(2024, 1, 16), d(2024, 1, 16))
            .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, d(2024, 1, 16));
    }

    #[test]
    fn fetch_bars_out_of_range_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter
            .fetch_bars("MSFT", d(2023, 1, 1), d(2023, 12, 31))
            .unwrap_err();
        assert!(matches!(err, StratlabError::NoData { .. }));
        let err = adapter
            .fetch_bars("EMPTY", d(2024, 1, 1), d(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, StratlabError::NoData { .. }));
    }

    #[test]
    fn fetch_bars_missing_file_fails() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter
            .fetch_bars("XYZ", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, StratlabError::Data { .. }));
    }

    #[test]
    fn malformed_rows_are_data_errors() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter
            .fetch_bars("BAD", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, StratlabError::Data { .. }));
    }

    #[test]
    fn unordered_dates_are_rejected() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter
            .fetch_bars("UNSORTED", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, StratlabError::Data { .. }));
    }

    #[test]
    fn zero_volume_row_is_rejected() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter
            .fetch_bars("NOVOL", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, StratlabError::Data { .. }));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(
            adapter.list_symbols().unwrap(),
            vec!["BAD", "EMPTY", "MSFT", "NOVOL", "UNSORTED"]
        );
    }
}
