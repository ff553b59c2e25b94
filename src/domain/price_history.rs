//! Per-symbol bar history handed to the allocation rule on every bar.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    series: HashMap<String, Vec<OhlcvBar>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the series for `symbol`. Bars are kept sorted by date.
    pub fn insert(&mut self, symbol: impl Into<String>, mut bars: Vec<OhlcvBar>) {
        bars.sort_by_key(|b| b.date);
        self.series.insert(symbol.into(), bars);
    }

    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    pub fn series(&self, symbol: &str) -> Option<&[OhlcvBar]> {
        self.series.get(symbol).map(Vec::as_slice)
    }

    pub fn bar_count(&self, symbol: &str) -> usize {
        self.series(symbol).map_or(0, <[OhlcvBar]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(Vec::is_empty)
    }

    /// History as it looked at the close of `as_of`: every bar dated later is dropped.
    pub fn as_of(&self, as_of: NaiveDate) -> PriceHistory {
        let series = self
            .series
            .iter()
            .map(|(symbol, bars)| {
                let end = bars.partition_point(|b| b.date <= as_of);
                (symbol.clone(), bars[..end].to_vec())
            })
            .collect();
        PriceHistory { series }
    }

    /// Sorted union of all bar dates across symbols.
    pub fn timeline(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self
            .series
            .values()
            .flat_map(|bars| bars.iter().map(|b| b.date))
            .collect();
        dates.into_iter().collect()
    }
}
