//! Stepwise construction of a [`Logger`]: capacities, global switches, clock and initial outputs.

use super::rate::RateLimiter;
use super::{Logger, State, default_prefix_colors};
use crate::Error;
use crate::clock::{Clock, SystemClock};
use crate::fmt::Prefix;
use crate::internal;
use crate::level::Threshold;
use crate::output::SinkHandle;
use crate::registry::{
    DEFAULT_MAX_ID_OUTPUTS, DEFAULT_MAX_IDS, DEFAULT_MAX_OUTPUTS, IdTable, OutputTable,
};
use std::sync::{Arc, Mutex};

/// Collects settings for a [`Logger`]; nothing is allocated until [`LoggerBuilder::build`].
pub struct LoggerBuilder {
    max_ids: usize,
    max_outputs: usize,
    max_id_outputs: usize,
    enabled: bool,
    prefix: Prefix,
    rate_limit: u32,
    suppress_repeats: bool,
    clock: Arc<dyn Clock>,
    outputs: Vec<(SinkHandle, Threshold)>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Default capacities, logging on, wall clock, no outputs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_ids: DEFAULT_MAX_IDS,
            max_outputs: DEFAULT_MAX_OUTPUTS,
            max_id_outputs: DEFAULT_MAX_ID_OUTPUTS,
            enabled: true,
            prefix: Prefix::DEFAULT,
            rate_limit: 0,
            suppress_repeats: false,
            clock: Arc::new(SystemClock),
            outputs: Vec::new(),
        }
    }

    /// Number of channel ids.
    #[must_use]
    pub const fn max_ids(mut self, n: usize) -> Self {
        self.max_ids = n;
        self
    }

    /// Number of distinct global outputs.
    #[must_use]
    pub const fn max_outputs(mut self, n: usize) -> Self {
        self.max_outputs = n;
        self
    }

    /// Number of distinct private outputs per channel.
    #[must_use]
    pub const fn max_id_outputs(mut self, n: usize) -> Self {
        self.max_id_outputs = n;
        self
    }

    /// Building disabled lets setup finish before anything is written.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Global prefix; [`Prefix::UNSET`] means the default.
    #[must_use]
    pub const fn prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = if prefix.is_unset() {
            Prefix::DEFAULT
        } else {
            prefix
        };
        self
    }

    /// Calls written per second; 0 for no limit.
    #[must_use]
    pub const fn rate_limit(mut self, per_second: u32) -> Self {
        self.rate_limit = per_second;
        self
    }

    /// See [`Logger::set_suppress_repeats`].
    #[must_use]
    pub const fn suppress_repeats(mut self, enabled: bool) -> Self {
        self.suppress_repeats = enabled;
        self
    }

    /// Time source for date prefixes and rate windows.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Shares a clock the caller keeps a handle to, e.g. a `ManualClock` in tests.
    #[must_use]
    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Registers a global output at build time.
    #[must_use]
    pub fn output(mut self, handle: SinkHandle, threshold: impl Into<Threshold>) -> Self {
        self.outputs.push((handle, threshold.into()));
        self
    }

    /// Builds the logger. Outputs that cannot be registered are reported on the internal
    /// logger and skipped; use [`LoggerBuilder::try_build`] to fail instead.
    #[must_use]
    pub fn build(self) -> Logger {
        let (logger, outputs) = self.build_bare();
        for (handle, threshold) in outputs {
            if let Err(e) = register(&logger, &handle, threshold) {
                internal::warn("BUILDER", &format!("Skipping output {handle:?}: {e}"));
            }
        }
        logger
    }

    /// Builds the logger, failing on the first output that cannot be registered.
    ///
    /// # Errors
    /// Registration or threshold errors of the configured outputs.
    pub fn try_build(self) -> Result<Logger, Error> {
        let (logger, outputs) = self.build_bare();
        for (handle, threshold) in outputs {
            register(&logger, &handle, threshold)?;
        }
        Ok(logger)
    }

    fn build_bare(self) -> (Logger, Vec<(SinkHandle, Threshold)>) {
        let mut rate = RateLimiter::default();
        rate.set_limit(self.rate_limit);

        let state = State {
            enabled: self.enabled,
            outputs: OutputTable::with_capacity(self.max_outputs),
            ids: IdTable::new(self.max_ids, self.max_id_outputs),
            prefix: self.prefix,
            color_prefix: false,
            color_message: false,
            prefix_colors: default_prefix_colors(),
            rate,
            suppress_repeats: self.suppress_repeats,
            last: None,
        };

        let logger = Logger {
            state: Mutex::new(state),
            clock: self.clock,
        };
        (logger, self.outputs)
    }
}

fn register(logger: &Logger, handle: &SinkHandle, threshold: Threshold) -> Result<(), Error> {
    logger.register_output(handle)?;
    if threshold != Threshold::Unset {
        logger.set_output_threshold(handle, threshold)?;
    }
    Ok(())
}
