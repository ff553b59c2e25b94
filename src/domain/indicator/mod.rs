//! Technical indicator series and the native EMA / RSI / MACD math.
//!
//! - `IndicatorPoint`: a single dated point, flagged invalid during warmup
//! - `IndicatorValue`: output shape of one point
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a full series; the rule only reads its latest point

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;

use crate::domain::error::IndicatorError;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    pub fn warmup(date: NaiveDate) -> Self {
        Self {
            date,
            valid: false,
            value: IndicatorValue::Simple(0.0),
        }
    }

    pub fn simple(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            valid: true,
            value: IndicatorValue::Simple(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl IndicatorType {
    /// Bars needed before the first valid point.
    pub fn min_bars(&self) -> usize {
        match *self {
            IndicatorType::Ema(period) => period,
            IndicatorType::Rsi(period) => period + 1,
            IndicatorType::Macd { fast, slow, signal } => fast.max(slow) + signal - 1,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// The most recent point, which must be past warmup.
    pub fn latest(&self) -> Result<&IndicatorPoint, IndicatorError> {
        match self.values.last() {
            Some(point) if point.valid => Ok(point),
            _ => Err(IndicatorError::InsufficientHistory {
                indicator: self.indicator_type.clone(),
                bars: self.values.len(),
                required: self.indicator_type.min_bars(),
            }),
        }
    }

    pub fn latest_simple(&self) -> Result<f64, IndicatorError> {
        match self.latest()?.value {
            IndicatorValue::Simple(v) => self.finite(v),
            IndicatorValue::Macd { .. } => Err(IndicatorError::Provider {
                reason: format!("{} returned a MACD value", self.indicator_type),
            }),
        }
    }

    /// Latest `(line, signal)` pair of a MACD series.
    pub fn latest_macd(&self) -> Result<(f64, f64), IndicatorError> {
        match self.latest()?.value {
            IndicatorValue::Macd { line, signal, .. } => {
                Ok((self.finite(line)?, self.finite(signal)?))
            }
            IndicatorValue::Simple(_) => Err(IndicatorError::Provider {
                reason: format!("{} returned a simple value", self.indicator_type),
            }),
        }
    }

    fn finite(&self, value: f64) -> Result<f64, IndicatorError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(IndicatorError::NonFinite {
                indicator: self.indicator_type.clone(),
            })
        }
    }
}
