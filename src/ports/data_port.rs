//! Price history provider contract.

use crate::domain::error::StratlabError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` with `start_date <= date <= end_date`, oldest first.
    ///
    /// Implementations return `NoData` when nothing falls inside the range and `Data`
    /// when the stored history violates ordering or positivity.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, StratlabError>;

    fn list_symbols(&self) -> Result<Vec<String>, StratlabError>;
}
