//! Tests for the process-wide logger and crate metadata.

use chanlog::{Level, Logger};

#[test]
fn init_is_idempotent() {
    let first = chanlog::init();
    assert!(chanlog::is_initialized());
    let second = chanlog::init_with(Logger::builder().enabled(false));
    assert!(std::ptr::eq(first, second));
    assert!(second.is_enabled());
    assert!(std::ptr::eq(chanlog::global().unwrap(), first));
}

#[test]
fn global_logger_is_usable() {
    let logger = chanlog::init();
    let id = logger.request_id(Some("global-test")).unwrap();
    logger.set_id_threshold(id, Level::Info).unwrap();
    logger.enable_id(id).unwrap();
    assert!(logger.id_generates_output(id, Level::Info));
    assert!(logger.release_id(id).is_ok());
}

#[test]
fn version_matches_package() {
    assert_eq!(chanlog::version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(chanlog::version().split('.').count(), 3);
}

#[test]
fn internal_logger_starts_once() {
    chanlog::internal::init(Level::Emerg);
    chanlog::internal::init(Level::Debug);
    assert!(chanlog::internal::is_initialized());
    chanlog::internal::warn("TEST", "below the configured level");
}
