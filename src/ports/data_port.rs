//! Price data access port trait.

use crate::domain::error::GrowthallocError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` within `[start_date, end_date]`, ascending by date.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, GrowthallocError>;

    fn list_symbols(&self) -> Result<Vec<String>, GrowthallocError>;

    /// `(first date, last date, bar count)`, or `None` when the symbol has no bars.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GrowthallocError>;
}
