//! In-memory sink that keeps every write, for assertions in tests and for capturing output.

use super::Sink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Records every `write_str` call as a separate entry.
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<String>>,
    color: bool,
    closed: AtomicBool,
}

impl MemorySink {
    /// Colorless by default, like a file, so tests see plain text unless they opt in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers with color enabled, like a terminal would.
    #[must_use]
    pub const fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Everything written so far, concatenated.
    #[must_use]
    pub fn contents(&self) -> String {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .concat()
    }

    /// Every write so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Each dispatch is one write, so this counts messages that reached the sink.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Lets one sink be reused across phases of a test.
    pub fn clear(&self) {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Marks the sink closed so registration refuses it.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }
}

impl Sink for MemorySink {
    fn write_str(&self, text: &str) -> Result<(), crate::Error> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Relaxed)
    }

    fn supports_color(&self) -> bool {
        self.color
    }
}
