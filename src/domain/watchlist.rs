//! Fixed, ordered set of ticker symbols the rule allocates across.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ASSETS: [&str; 7] = ["AAPL", "MSFT", "TSLA", "NVDA", "BIIB", "CRSP", "ENPH"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchlistError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),

    #[error("watchlist is empty")]
    Empty,
}

impl Watchlist {
    pub fn new<I, S>(symbols: I) -> Result<Self, WatchlistError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for symbol in symbols {
            let trimmed = symbol.as_ref().trim();
            if trimmed.is_empty() {
                return Err(WatchlistError::EmptyToken);
            }
            let code = trimmed.to_uppercase();
            if !seen.insert(code.clone()) {
                return Err(WatchlistError::DuplicateCode(code));
            }
            out.push(code);
        }
        if out.is_empty() {
            return Err(WatchlistError::Empty);
        }
        Ok(Self { symbols: out })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Weight of one slot under equal-weight allocation.
    pub fn equal_weight(&self) -> f64 {
        1.0 / self.symbols.len() as f64
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Comma separated list, e.g. `AAPL, msft,TSLA`.
impl FromStr for Watchlist {
    type Err = WatchlistError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Watchlist::new(input.split(','))
    }
}

impl fmt::Display for Watchlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbols.join(","))
    }
}
