//! Strategy configuration and the allocation rule.
//!
//! For every watchlist symbol the rule reads the latest short/long EMA, RSI and
//! MACD/signal values, classifies the symbol (see [`IndicatorSnapshot::classify`])
//! and maps the outlook to a weight:
//!
//! | outlook | weight |
//! |---|---|
//! | bullish | `1 / N` |
//! | bearish | `0` |
//! | neutral | hold weight, else `1 / N` |
//! | indicator error | hold weight, else `0` |
//!
//! The hold weight is the symbol's weight from the previous call and only
//! exists under [`HoldPolicy::CarryForward`].

use crate::domain::allocation::TargetAllocation;
use crate::domain::error::IndicatorError;
use crate::domain::price_history::PriceHistory;
use crate::domain::signal::{IndicatorSnapshot, Outlook, RsiThresholds};
use crate::domain::watchlist::Watchlist;
use crate::ports::indicator_port::IndicatorPort;
use crate::ports::log_port::LogPort;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Bar interval the rule is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Daily,
}

impl FromStr for Interval {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1day" => Ok(Interval::Daily),
            _ => Err(UnknownVariant {
                kind: "interval",
                value: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Daily => write!(f, "1day"),
        }
    }
}

/// What a neutral or failing symbol falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldPolicy {
    /// No memory between calls: neutral is `1/N`, failure is `0`.
    #[default]
    EqualWeight,
    /// Keep the weight from the previous call when there is one.
    CarryForward,
}

impl FromStr for HoldPolicy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal_weight" => Ok(HoldPolicy::EqualWeight),
            "carry_forward" => Ok(HoldPolicy::CarryForward),
            _ => Err(UnknownVariant {
                kind: "hold policy",
                value: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for HoldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldPolicy::EqualWeight => write!(f, "equal_weight"),
            HoldPolicy::CarryForward => write!(f, "carry_forward"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub short_ema: usize,
    pub long_ema: usize,
    pub rsi_length: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            short_ema: 12,
            long_ema: 26,
            rsi_length: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub name: String,
    pub interval: Interval,
    pub assets: Watchlist,
    pub params: IndicatorParams,
    pub thresholds: RsiThresholds,
    pub hold_policy: HoldPolicy,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "High Growth Trend".into(),
            interval: Interval::Daily,
            assets: Watchlist::default(),
            params: IndicatorParams::default(),
            thresholds: RsiThresholds::default(),
            hold_policy: HoldPolicy::EqualWeight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub snapshot: IndicatorSnapshot,
    pub outlook: Outlook,
}

/// Weight chosen for one symbol, with how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub symbol: String,
    pub weight: f64,
    pub outcome: Result<Assessment, IndicatorError>,
}

#[derive(Debug, Clone)]
pub struct AllocationRule {
    config: StrategyConfig,
    previous: Option<TargetAllocation>,
}

impl AllocationRule {
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            config,
            previous: None,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn interval(&self) -> Interval {
        self.config.interval
    }

    pub fn assets(&self) -> &Watchlist {
        &self.config.assets
    }

    /// Allocation remembered for the next call, if the policy keeps one.
    pub fn previous(&self) -> Option<&TargetAllocation> {
        self.previous.as_ref()
    }

    /// Forget the allocation carried between calls.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Run the rule for one bar. Under `CarryForward` the result becomes the
    /// hold source for the next call.
    pub fn compute(
        &mut self,
        history: &PriceHistory,
        indicators: &dyn IndicatorPort,
        log: &dyn LogPort,
    ) -> TargetAllocation {
        allocation_of(&self.decide(history, indicators, log))
    }

    /// Same as [`compute`](Self::compute) but keeps the per-symbol outcome.
    pub fn decide(
        &mut self,
        history: &PriceHistory,
        indicators: &dyn IndicatorPort,
        log: &dyn LogPort,
    ) -> Vec<Decision> {
        let previous = match self.config.hold_policy {
            HoldPolicy::EqualWeight => None,
            HoldPolicy::CarryForward => self.previous.as_ref(),
        };
        let decisions = self.evaluate(history, previous, indicators, log);
        if self.config.hold_policy == HoldPolicy::CarryForward {
            self.previous = Some(allocation_of(&decisions));
        }
        decisions
    }

    /// One pass over the watchlist with an explicit hold source. Never fails:
    /// every symbol gets exactly one decision.
    pub fn evaluate(
        &self,
        history: &PriceHistory,
        previous: Option<&TargetAllocation>,
        indicators: &dyn IndicatorPort,
        log: &dyn LogPort,
    ) -> Vec<Decision> {
        let equal = self.config.assets.equal_weight();

        self.config
            .assets
            .symbols()
            .iter()
            .map(|symbol| {
                let held = previous.and_then(|p| p.weight(symbol));
                let outcome = self.assess(symbol, history, indicators);
                let weight = match &outcome {
                    Ok(a) => match a.outlook {
                        Outlook::Bullish => equal,
                        Outlook::Bearish => 0.0,
                        Outlook::Neutral => held.unwrap_or(equal),
                    },
                    Err(e) => {
                        log.log(&format!("Error processing {}: {}", symbol, e));
                        held.unwrap_or(0.0)
                    }
                };
                tracing::debug!(
                    symbol = %symbol,
                    weight,
                    ok = outcome.is_ok(),
                    "allocation decision"
                );
                Decision {
                    symbol: symbol.clone(),
                    weight,
                    outcome,
                }
            })
            .collect()
    }

    /// Read the latest indicator values for `symbol` and classify them.
    pub fn assess(
        &self,
        symbol: &str,
        history: &PriceHistory,
        indicators: &dyn IndicatorPort,
    ) -> Result<Assessment, IndicatorError> {
        let bars = history
            .series(symbol)
            .filter(|bars| !bars.is_empty())
            .ok_or_else(|| IndicatorError::NoData {
                symbol: symbol.to_string(),
            })?;
        let p = &self.config.params;

        let short_ema = indicators.ema(symbol, bars, p.short_ema)?.latest_simple()?;
        let long_ema = indicators.ema(symbol, bars, p.long_ema)?.latest_simple()?;
        let rsi = indicators.rsi(symbol, bars, p.rsi_length)?.latest_simple()?;
        let (macd_line, macd_signal) = indicators
            .macd(symbol, bars, p.macd_fast, p.macd_slow, p.macd_signal)?
            .latest_macd()?;

        let snapshot = IndicatorSnapshot {
            short_ema,
            long_ema,
            rsi,
            macd_line,
            macd_signal,
        };
        Ok(Assessment {
            snapshot,
            outlook: snapshot.classify(&self.config.thresholds),
        })
    }
}

pub fn allocation_of(decisions: &[Decision]) -> TargetAllocation {
    decisions
        .iter()
        .map(|d| (d.symbol.clone(), d.weight))
        .collect()
}
