//! Target allocation handed back to the host for rebalancing.

/// Desired portfolio weight per symbol, in watchlist order.
///
/// Weights are not renormalized; the host decides what to do with any
/// unallocated remainder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetAllocation {
    weights: Vec<(String, f64)>,
}

impl TargetAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight for `symbol`, replacing any previous entry in place.
    pub fn set(&mut self, symbol: impl Into<String>, weight: f64) {
        let symbol = symbol.into();
        match self.weights.iter_mut().find(|(s, _)| *s == symbol) {
            Some(entry) => entry.1 = weight,
            None => self.weights.push((symbol, weight)),
        }
    }

    pub fn weight(&self, symbol: &str) -> Option<f64> {
        self.weights.iter().find(|(s, _)| s == symbol).map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(s, w)| (s.as_str(), *w))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.weights.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TargetAllocation {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut allocation = TargetAllocation::new();
        for (symbol, weight) in iter {
            allocation.set(symbol, weight);
        }
        allocation
    }
}
