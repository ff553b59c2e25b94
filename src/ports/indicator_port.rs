//! Indicator provider port trait.
//!
//! The allocation rule never does indicator math itself; a host can plug in its
//! own provider, and [`NativeIndicators`](crate::adapters::native_indicators::NativeIndicators)
//! is the built-in one.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::OhlcvBar;

pub trait IndicatorPort {
    fn ema(&self, symbol: &str, bars: &[OhlcvBar], length: usize)
        -> Result<IndicatorSeries, IndicatorError>;

    fn rsi(&self, symbol: &str, bars: &[OhlcvBar], length: usize)
        -> Result<IndicatorSeries, IndicatorError>;

    /// Series of `IndicatorValue::Macd` points carrying line and signal.
    fn macd(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        fast: usize,
        slow: usize,
        signal: usize,
    ) -> Result<IndicatorSeries, IndicatorError>;
}
