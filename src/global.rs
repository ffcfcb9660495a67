//! Process-wide logger, created on first use.

use crate::logger::{Logger, LoggerBuilder};
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Returns the process-wide logger, creating it with defaults on the first call.
pub fn init() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// Returns the process-wide logger, building it from `builder` if it does not exist yet.
/// When it already exists `builder` is dropped unused.
pub fn init_with(builder: LoggerBuilder) -> &'static Logger {
    GLOBAL.get_or_init(|| builder.build())
}

/// Libraries can check this before deciding whether to install their own defaults.
#[must_use]
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// The process-wide logger, if [`init`] or [`init_with`] has run.
#[must_use]
pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}
