//! Chanlog's own diagnostic logger: a private [`Logger`] with one channel writing to stderr.
//!
//! Until `init` runs every call is dropped. A diagnostic raised while one is already being
//! written on the same thread is dropped too, so a failing stderr cannot recurse.

use crate::config::Config;
use crate::fmt::Location;
use crate::level::Level;
use crate::logger::Logger;
use crate::output::SinkHandle;
use crate::registry::Id;
use std::cell::Cell;
use std::sync::OnceLock;

struct Internal {
    logger: Logger,
    id: Id,
}

static INTERNAL_LOGGER: OnceLock<Internal> = OnceLock::new();

thread_local! {
    static WRITING: Cell<bool> = const { Cell::new(false) };
}

/// Starts diagnostics at `level` and above. Only the first call takes effect.
pub fn init(level: Level) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| build_internal_logger(level));
    if !was_init {
        debug("INTERNAL", "Internal logger ready");
    }
}

/// Like [`init`], with the level taken from `general.internal_level`.
pub fn init_with_config(config: &Config) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    let level = config.parse_internal_level();
    INTERNAL_LOGGER.get_or_init(|| build_internal_logger(level));
    if !was_init {
        debug("INTERNAL", &format!("Log level: {level}"));
        debug("INTERNAL", "Internal logger ready");
    }
}

/// Whether diagnostics have been started.
#[must_use]
pub fn is_initialized() -> bool {
    INTERNAL_LOGGER.get().is_some()
}

fn build_internal_logger(level: Level) -> Internal {
    let logger = Logger::builder()
        .max_ids(1)
        .max_outputs(1)
        .max_id_outputs(0)
        .output(SinkHandle::stderr(), Level::Debug)
        .build();
    let id = logger.request_id(Some("chanlog")).unwrap_or(Id::UNKNOWN);
    let _ = logger.set_id_threshold(id, level);
    let _ = logger.enable_id(id);
    Internal { logger, id }
}

fn log(level: Level, scope: &str, msg: &str) {
    let Some(internal) = INTERNAL_LOGGER.get() else {
        return;
    };
    WRITING.with(|writing| {
        if writing.replace(true) {
            return;
        }
        let _ = internal.logger.emit(
            internal.id,
            level,
            Location::default(),
            &format!("[{scope}] {msg}\n"),
        );
        writing.set(false);
    });
}

/// Startup and teardown detail.
pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

/// Operational milestones such as a loaded config.
pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Anomalies the caller can live with.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warning, scope, msg);
}

/// Failures that were also returned to the caller.
pub fn error(scope: &str, msg: &str) {
    log(Level::Err, scope, msg);
}
