//! Domain error types.

use crate::domain::indicator::IndicatorType;
use crate::domain::watchlist::WatchlistError;

/// Why the indicators for one symbol could not be evaluated.
///
/// Recovered inside [`AllocationRule::compute`](crate::domain::strategy::AllocationRule::compute):
/// the symbol falls back to its hold weight and the error is logged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient history for {indicator}: have {bars} bars, need {required}")]
    InsufficientHistory {
        indicator: IndicatorType,
        bars: usize,
        required: usize,
    },

    #[error("{indicator} produced a non-finite value")]
    NonFinite { indicator: IndicatorType },

    #[error("indicator provider failed: {reason}")]
    Provider { reason: String },
}

/// Top-level error type for growthalloc.
#[derive(Debug, thiserror::Error)]
pub enum GrowthallocError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Watchlist(#[from] WatchlistError),

    #[error("no data for any of {symbols} symbols")]
    NoData { symbols: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GrowthallocError> for std::process::ExitCode {
    fn from(err: &GrowthallocError) -> Self {
        let code: u8 = match err {
            GrowthallocError::Io(_) => 1,
            GrowthallocError::ConfigParse { .. }
            | GrowthallocError::ConfigMissing { .. }
            | GrowthallocError::ConfigInvalid { .. }
            | GrowthallocError::Watchlist(_) => 2,
            GrowthallocError::DataSource { .. } => 3,
            GrowthallocError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
