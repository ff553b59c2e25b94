//! Indicator snapshot and trend/momentum classification.

use std::fmt;

/// Latest values of the indicators the rule reads for one symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub short_ema: f64,
    pub long_ema: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
}

/// RSI levels that gate the bullish and bearish branches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiThresholds {
    /// RSI must be strictly above this to be bullish.
    pub bullish: f64,
    /// RSI strictly below this is bearish.
    pub bearish: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            bullish: 50.0,
            bearish: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outlook {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outlook::Bullish => write!(f, "bullish"),
            Outlook::Bearish => write!(f, "bearish"),
            Outlook::Neutral => write!(f, "neutral"),
        }
    }
}

impl IndicatorSnapshot {
    /// First match wins: bullish needs all three confirmations, bearish needs
    /// a downtrend or oversold RSI, anything else is neutral.
    pub fn classify(&self, thresholds: &RsiThresholds) -> Outlook {
        let uptrend = self.short_ema > self.long_ema;
        let momentum = self.rsi > thresholds.bullish;
        let macd_confirms = self.macd_line > self.macd_signal;

        if uptrend && momentum && macd_confirms {
            Outlook::Bullish
        } else if self.short_ema < self.long_ema || self.rsi < thresholds.bearish {
            Outlook::Bearish
        } else {
            Outlook::Neutral
        }
    }
}
