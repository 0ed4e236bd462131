//! Outbound result writer.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StratlabError;

/// Port for persisting or rendering a finished back-test.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), StratlabError>;

    /// Default implementation: one file per result, `<stem>_<n>.<ext>` beside `output_path`.
    fn write_many(
        &self,
        results: &[BacktestResult],
        output_path: &str,
    ) -> Result<(), StratlabError> {
        let path = Path::new(output_path);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        for (i, result) in results.iter().enumerate() {
            let numbered = path.with_file_name(format!("{stem}_{i}{ext}"));
            self.write(result, &numbered.to_string_lossy())?;
        }
        Ok(())
    }
}
