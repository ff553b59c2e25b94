//! Core domain types and the allocation rule.

pub mod ohlcv;
pub mod price_history;
pub mod indicator;
pub mod signal;
pub mod allocation;
pub mod watchlist;
pub mod strategy;
pub mod config_validation;
pub mod error;
