//! Tests for channel id allocation and per-channel state.

use chanlog::{Error, Id, Level, LevelMask, Logger, Prefix, Threshold};

#[test]
fn new_id_is_disabled_and_unset() {
    let logger = Logger::new();
    let id = logger.request_id(Some("net")).unwrap();

    assert!(!logger.is_id_enabled(id));
    assert_eq!(logger.id_threshold(id).unwrap(), Threshold::Unset);
    assert_eq!(logger.id_prefix(id).unwrap(), Prefix::UNSET);
    assert_eq!(logger.id_color(id).unwrap(), None);
    assert_eq!(logger.id_name(id).as_deref(), Some("net"));
}

#[test]
fn anonymous_ids_are_distinct() {
    let logger = Logger::new();
    let a = logger.request_id(None).unwrap();
    let b = logger.request_id(None).unwrap();
    assert_ne!(a, b);
    assert_eq!(logger.id_name(a), None);
}

#[test]
fn same_name_returns_same_id() {
    let logger = Logger::new();
    let first = logger.request_id(Some("db")).unwrap();
    let second = logger.request_id(Some("db")).unwrap();
    assert_eq!(first, second);

    assert_eq!(logger.release_id(first).unwrap(), 1);
    assert_eq!(logger.id_name(first).as_deref(), Some("db"));
    assert_eq!(logger.release_id(first).unwrap(), 0);
    assert_eq!(logger.id_name(first), None);
    assert!(matches!(logger.release_id(first), Err(Error::IdNotFound)));
}

#[test]
fn capacity_is_enforced() {
    let logger = Logger::builder().max_ids(2).build();
    let a = logger.request_id(None).unwrap();
    logger.request_id(None).unwrap();
    assert!(matches!(logger.request_id(None), Err(Error::IdsFull)));

    logger.release_id(a).unwrap();
    assert_eq!(logger.request_id(None).unwrap(), a);
}

#[test]
fn release_resets_slot() {
    let logger = Logger::new();
    let id = logger.request_id(Some("tmp")).unwrap();
    logger.enable_id(id).unwrap();
    logger.set_id_threshold(id, Level::Err).unwrap();
    logger.set_id_prefix(id, Prefix::LEVEL).unwrap();
    logger.release_id(id).unwrap();

    let again = logger.request_id(None).unwrap();
    assert_eq!(again, id);
    assert!(!logger.is_id_enabled(again));
    assert_eq!(logger.id_threshold(again).unwrap(), Threshold::Unset);
    assert_eq!(logger.id_prefix(again).unwrap(), Prefix::UNSET);
}

#[test]
fn out_of_range_ids_are_unknown() {
    let logger = Logger::builder().max_ids(4).build();
    let bogus = Id::from_raw(4);

    assert!(matches!(logger.release_id(bogus), Err(Error::IdUnknown)));
    assert!(matches!(logger.enable_id(bogus), Err(Error::IdUnknown)));
    assert!(matches!(logger.disable_id(bogus), Err(Error::IdUnknown)));
    assert!(matches!(
        logger.set_id_threshold(bogus, Level::Info),
        Err(Error::IdUnknown)
    ));
    assert!(matches!(logger.id_threshold(Id::UNKNOWN), Err(Error::IdUnknown)));
    assert!(!logger.is_id_enabled(bogus));
    assert!(!logger.id_generates_output(bogus, Level::Emerg));
}

#[test]
fn enable_is_idempotent() {
    let logger = Logger::new();
    let id = logger.request_id(None).unwrap();
    logger.enable_id(id).unwrap();
    logger.enable_id(id).unwrap();
    assert!(logger.is_id_enabled(id));
    logger.disable_id(id).unwrap();
    assert!(!logger.is_id_enabled(id));
}

#[test]
fn empty_mask_is_rejected() {
    let logger = Logger::new();
    let id = logger.request_id(None).unwrap();
    assert!(matches!(
        logger.set_id_threshold(id, LevelMask::empty()),
        Err(Error::LevelUnknown)
    ));
    assert_eq!(logger.id_threshold(id).unwrap(), Threshold::Unset);
}

#[test]
fn generates_output_follows_enable_and_threshold() {
    let logger = Logger::new();
    let id = logger.request_id(None).unwrap();

    logger.set_id_threshold(id, Level::Warning).unwrap();
    assert!(!logger.id_generates_output(id, Level::Emerg));

    logger.enable_id(id).unwrap();
    for level in Level::ALL {
        assert_eq!(logger.id_generates_output(id, level), level >= Level::Warning);
    }

    logger.set_id_threshold(id, LevelMask::DEBUG | LevelMask::ALERT).unwrap();
    assert!(logger.id_generates_output(id, Level::Debug));
    assert!(!logger.id_generates_output(id, Level::Warning));
    assert!(logger.id_generates_output(id, Level::Alert));
}

#[test]
fn prefix_save_and_restore() {
    let logger = Logger::new();
    let id = logger.request_id(None).unwrap();

    let saved = logger.id_prefix(id).unwrap();
    logger
        .set_id_prefix(id, Prefix::FUNCTION | Prefix::LINE)
        .unwrap();
    assert_eq!(logger.id_prefix(id).unwrap(), Prefix::FUNCTION | Prefix::LINE);
    logger.set_id_prefix(id, saved).unwrap();
    assert_eq!(logger.id_prefix(id).unwrap(), saved);
}
