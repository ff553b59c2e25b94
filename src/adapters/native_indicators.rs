//! Built-in indicator provider backed by the domain indicator math.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{
    calculate_ema, calculate_macd, calculate_rsi, IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::indicator_port::IndicatorPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeIndicators;

impl NativeIndicators {
    pub fn new() -> Self {
        Self
    }

    fn require(
        indicator: IndicatorType,
        bars: &[OhlcvBar],
        periods: &[usize],
    ) -> Result<(), IndicatorError> {
        if periods.contains(&0) {
            return Err(IndicatorError::Provider {
                reason: format!("{} needs positive periods", indicator),
            });
        }
        let required = indicator.min_bars();
        if bars.len() < required {
            return Err(IndicatorError::InsufficientHistory {
                indicator,
                bars: bars.len(),
                required,
            });
        }
        Ok(())
    }
}

impl IndicatorPort for NativeIndicators {
    fn ema(
        &self,
        _symbol: &str,
        bars: &[OhlcvBar],
        length: usize,
    ) -> Result<IndicatorSeries, IndicatorError> {
        Self::require(IndicatorType::Ema(length), bars, &[length])?;
        Ok(calculate_ema(bars, length))
    }

    fn rsi(
        &self,
        _symbol: &str,
        bars: &[OhlcvBar],
        length: usize,
    ) -> Result<IndicatorSeries, IndicatorError> {
        Self::require(IndicatorType::Rsi(length), bars, &[length])?;
        Ok(calculate_rsi(bars, length))
    }

    fn macd(
        &self,
        _symbol: &str,
        bars: &[OhlcvBar],
        fast: usize,
        slow: usize,
        signal: usize,
    ) -> Result<IndicatorSeries, IndicatorError> {
        Self::require(IndicatorType::Macd { fast, slow, signal }, bars, &[fast, slow, signal])?;
        Ok(calculate_macd(bars, fast, slow, signal))
    }
}
