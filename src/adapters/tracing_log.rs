//! `LogPort` adapters that forward rule messages to `tracing`.

use crate::ports::log_port::LogPort;
use std::cell::Cell;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogPort for TracingLog {
    fn log(&self, message: &str) {
        tracing::warn!(target: "growthalloc::rule", "{}", message);
    }
}

/// Counts messages and emits them at debug level. Used when the rule runs
/// over many bars and warmup failures are expected.
#[derive(Debug, Default)]
pub struct CountingLog {
    count: Cell<usize>,
}

impl CountingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl LogPort for CountingLog {
    fn log(&self, message: &str) {
        self.count.set(self.count.get() + 1);
        tracing::debug!(target: "growthalloc::rule", "{}", message);
    }
}
