#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use growthalloc::domain::error::{GrowthallocError, IndicatorError};
use growthalloc::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
pub use growthalloc::domain::ohlcv::OhlcvBar;
use growthalloc::domain::price_history::PriceHistory;
use growthalloc::domain::signal::IndicatorSnapshot;
use growthalloc::ports::data_port::DataPort;
use growthalloc::ports::indicator_port::IndicatorPort;
use growthalloc::ports::log_port::LogPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, GrowthallocError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(GrowthallocError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, GrowthallocError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GrowthallocError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Indicator provider returning fixed latest values per symbol. Symbols with a
/// registered failure, or with no snapshot, return an error.
pub struct MockIndicators {
    pub snapshots: HashMap<String, IndicatorSnapshot>,
    pub failures: HashMap<String, String>,
}

impl MockIndicators {
    pub fn new() -> Self {
        Self {
            snapshots: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    pub fn with(mut self, symbol: &str, snapshot: IndicatorSnapshot) -> Self {
        self.snapshots.insert(symbol.to_string(), snapshot);
        self
    }

    pub fn failing(mut self, symbol: &str, reason: &str) -> Self {
        self.failures.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn lookup(&self, symbol: &str) -> Result<IndicatorSnapshot, IndicatorError> {
        if let Some(reason) = self.failures.get(symbol) {
            return Err(IndicatorError::Provider {
                reason: reason.clone(),
            });
        }
        self.snapshots
            .get(symbol)
            .copied()
            .ok_or_else(|| IndicatorError::NoData {
                symbol: symbol.to_string(),
            })
    }

    fn series(
        indicator_type: IndicatorType,
        bars: &[OhlcvBar],
        value: IndicatorValue,
    ) -> IndicatorSeries {
        let date = bars
            .last()
            .map(|b| b.date)
            .unwrap_or_else(|| date(2024, 1, 1));
        IndicatorSeries {
            indicator_type,
            values: vec![IndicatorPoint {
                date,
                valid: true,
                value,
            }],
        }
    }
}

impl IndicatorPort for MockIndicators {
    fn ema(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        length: usize,
    ) -> Result<IndicatorSeries, IndicatorError> {
        let s = self.lookup(symbol)?;
        // default periods: 12 short, 26 long
        let value = if length <= 12 { s.short_ema } else { s.long_ema };
        Ok(Self::series(IndicatorType::Ema(length), bars, IndicatorValue::Simple(value)))
    }

    fn rsi(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        length: usize,
    ) -> Result<IndicatorSeries, IndicatorError> {
        let s = self.lookup(symbol)?;
        Ok(Self::series(IndicatorType::Rsi(length), bars, IndicatorValue::Simple(s.rsi)))
    }

    fn macd(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        fast: usize,
        slow: usize,
        signal: usize,
    ) -> Result<IndicatorSeries, IndicatorError> {
        let s = self.lookup(symbol)?;
        Ok(Self::series(
            IndicatorType::Macd { fast, slow, signal },
            bars,
            IndicatorValue::Macd {
                line: s.macd_line,
                signal: s.macd_signal,
                histogram: s.macd_line - s.macd_signal,
            },
        ))
    }
}

#[derive(Default)]
pub struct RecordingLog {
    pub messages: RefCell<Vec<String>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl LogPort for RecordingLog {
    fn log(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

pub fn snapshot(
    short_ema: f64,
    long_ema: f64,
    rsi: f64,
    macd_line: f64,
    macd_signal: f64,
) -> IndicatorSnapshot {
    IndicatorSnapshot {
        short_ema,
        long_ema,
        rsi,
        macd_line,
        macd_signal,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bars from `start` with closes produced by `close(i)`.
pub fn generate_bars(
    symbol: &str,
    start: NaiveDate,
    count: usize,
    close: impl Fn(usize) -> f64,
) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let c = close(i);
            OhlcvBar {
                symbol: symbol.to_string(),
                date: start + Duration::days(i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 1000,
            }
        })
        .collect()
}

/// Accelerating uptrend: EMA(12) > EMA(26), RSI 100, MACD line above signal.
pub fn rising_bars(symbol: &str, count: usize) -> Vec<OhlcvBar> {
    generate_bars(symbol, date(2024, 1, 1), count, |i| 100.0 + 0.05 * (i * i) as f64)
}

/// Steady downtrend: EMA(12) < EMA(26), RSI 0.
pub fn falling_bars(symbol: &str, count: usize) -> Vec<OhlcvBar> {
    generate_bars(symbol, date(2024, 1, 1), count, |i| 300.0 - i as f64)
}

/// One bar per symbol; enough for the mock provider.
pub fn stub_history(symbols: &[&str]) -> PriceHistory {
    symbols.iter().fold(PriceHistory::new(), |h, s| {
        h.with_series(*s, generate_bars(s, date(2024, 1, 1), 1, |_| 100.0))
    })
}

pub fn write_csv(dir: &Path, bars: &[OhlcvBar]) {
    let symbol = &bars[0].symbol;
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
