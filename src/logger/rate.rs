//! Per-second call budget and repeated-message bookkeeping.

use crate::level::Level;
use crate::registry::Id;

/// Counts admitted calls inside the current one-second window.
#[derive(Debug, Clone, Default)]
pub(super) struct RateLimiter {
    limit: u32,
    window: i64,
    used: u32,
}

impl RateLimiter {
    pub(super) const fn limit(&self) -> u32 {
        self.limit
    }

    /// Zero lifts the limit. Changing the limit starts a fresh window.
    pub(super) const fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
        self.used = 0;
    }

    /// Takes one unit of budget for the second `now`; false once it is spent.
    pub(super) const fn admit(&mut self, now: i64) -> bool {
        if self.limit == 0 {
            return true;
        }
        if now != self.window {
            self.window = now;
            self.used = 0;
        }
        if self.used < self.limit {
            self.used += 1;
            true
        } else {
            false
        }
    }
}

/// The last line-terminated message written, and how often it was held back since.
#[derive(Debug, Clone)]
pub(super) struct LastMessage {
    pub(super) id: Id,
    pub(super) level: Level,
    pub(super) text: String,
    pub(super) repeats: u32,
}

impl LastMessage {
    pub(super) fn new(id: Id, level: Level, text: &str) -> Self {
        Self {
            id,
            level,
            text: text.to_string(),
            repeats: 0,
        }
    }

    pub(super) fn matches(&self, id: Id, level: Level, text: &str) -> bool {
        self.id == id && self.level == level && self.text == text
    }

    /// Summary line for the held-back copies, if any.
    pub(super) fn summary(&self) -> Option<String> {
        match self.repeats {
            0 => None,
            1 => Some("last message repeated 1 time\n".to_string()),
            n => Some(format!("last message repeated {n} times\n")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_admits_everything() {
        let mut rate = RateLimiter::default();
        assert!((0..1000).all(|_| rate.admit(5)));
    }

    #[test]
    fn budget_resets_each_second() {
        let mut rate = RateLimiter::default();
        rate.set_limit(2);
        assert!(rate.admit(10));
        assert!(rate.admit(10));
        assert!(!rate.admit(10));
        assert!(rate.admit(11));
    }

    #[test]
    fn summary_wording() {
        let mut last = LastMessage::new(Id::from_raw(0), Level::Info, "x\n");
        assert_eq!(last.summary(), None);
        last.repeats = 1;
        assert_eq!(last.summary().as_deref(), Some("last message repeated 1 time\n"));
        last.repeats = 3;
        assert_eq!(last.summary().as_deref(), Some("last message repeated 3 times\n"));
    }
}
