//! Configuration validation.
//!
//! Validates every `[strategy]` and `[data]` field before a run so that the
//! builders in [`cli`](crate::cli) can read values with plain defaults.

use crate::domain::error::GrowthallocError;
use crate::domain::strategy::{HoldPolicy, Interval};
use crate::domain::watchlist::Watchlist;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const STRATEGY: &str = "strategy";
pub const DATA: &str = "data";

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), GrowthallocError> {
    validate_interval(config)?;
    validate_assets(config)?;
    validate_periods(config)?;
    validate_thresholds(config)?;
    validate_hold_policy(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), GrowthallocError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(DATA, "start_date", "start_date must not be after end_date"));
        }
    }
    Ok(())
}

/// Optional `YYYY-MM-DD` date from the `[data]` section.
pub fn parse_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, GrowthallocError> {
    config
        .get_string(DATA, key)
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| invalid(DATA, key, "invalid date format (expected YYYY-MM-DD)"))
        })
        .transpose()
}

fn invalid(section: &str, key: &str, reason: &str) -> GrowthallocError {
    GrowthallocError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), GrowthallocError> {
    if let Some(raw) = config.get_string(STRATEGY, "interval") {
        raw.parse::<Interval>()
            .map_err(|e| invalid(STRATEGY, "interval", &e.to_string()))?;
    }
    Ok(())
}

fn validate_assets(config: &dyn ConfigPort) -> Result<(), GrowthallocError> {
    if let Some(raw) = config.get_string(STRATEGY, "assets") {
        raw.parse::<Watchlist>()
            .map_err(|e| invalid(STRATEGY, "assets", &e.to_string()))?;
    }
    Ok(())
}

fn period(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, GrowthallocError> {
    let value = match config.get_string(STRATEGY, key) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(STRATEGY, key, "must be an integer"))?,
        None => default,
    };
    if value <= 0 {
        return Err(invalid(STRATEGY, key, &format!("{} must be positive", key)));
    }
    Ok(value)
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), GrowthallocError> {
    let short_ema = period(config, "short_ema", 12)?;
    let long_ema = period(config, "long_ema", 26)?;
    period(config, "rsi_length", 14)?;
    let macd_fast = period(config, "macd_fast", 12)?;
    let macd_slow = period(config, "macd_slow", 26)?;
    period(config, "macd_signal", 9)?;

    if short_ema >= long_ema {
        return Err(invalid(STRATEGY, "short_ema", "short_ema must be less than long_ema"));
    }
    if macd_fast >= macd_slow {
        return Err(invalid(STRATEGY, "macd_fast", "macd_fast must be less than macd_slow"));
    }
    Ok(())
}

fn threshold(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, GrowthallocError> {
    let value = match config.get_string(STRATEGY, key) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(STRATEGY, key, "must be a number"))?,
        None => default,
    };
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(STRATEGY, key, &format!("{} must be between 0 and 100", key)));
    }
    Ok(value)
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), GrowthallocError> {
    let bullish = threshold(config, "rsi_bullish", 50.0)?;
    let bearish = threshold(config, "rsi_bearish", 40.0)?;
    if bearish > bullish {
        return Err(invalid(
            STRATEGY,
            "rsi_bearish",
            "rsi_bearish must not exceed rsi_bullish",
        ));
    }
    Ok(())
}

fn validate_hold_policy(config: &dyn ConfigPort) -> Result<(), GrowthallocError> {
    if let Some(raw) = config.get_string(STRATEGY, "hold_policy") {
        raw.parse::<HoldPolicy>()
            .map_err(|e| invalid(STRATEGY, "hold_policy", &e.to_string()))?;
    }
    Ok(())
}
