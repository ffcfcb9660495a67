//! Tests for prefix composition.

use chanlog::fmt::{PrefixFields, render};
use chanlog::{Id, Level, Location, Logger, ManualClock, MemorySink, Prefix, SinkHandle};
use chrono::{Local, TimeZone};
use std::sync::Arc;

fn noon() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).single().unwrap()
}

fn setup(prefix: Prefix) -> (Logger, Arc<MemorySink>, Id) {
    let logger = Logger::builder()
        .prefix(prefix)
        .shared_clock(Arc::new(ManualClock::new(noon())))
        .build();
    let sink = Arc::new(MemorySink::new());
    logger.register_output(&SinkHandle::from(sink.clone())).unwrap();
    let id = logger.request_id(Some("storage")).unwrap();
    logger.set_id_threshold(id, Level::Debug).unwrap();
    logger.enable_id(id).unwrap();
    (logger, sink, id)
}

#[test]
fn render_every_field() {
    let location = Location::new("src/db.rs", "commit", 7);
    let fields = PrefixFields {
        time: noon(),
        name: Some("storage"),
        level: Level::Err,
        location: &location,
    };
    let all = Prefix::DATE | Prefix::NAME | Prefix::LEVEL | Prefix::FILE | Prefix::FUNCTION | Prefix::LINE;
    assert_eq!(
        render(all, &fields),
        "2024-05-01 12:30:00:        storage:    ERR:src/db.rs:commit():    7: "
    );
    assert_eq!(render(Prefix::EMPTY, &fields), "");
}

#[test]
fn fresh_logger_writes_verbatim() {
    let logger = Logger::new();
    assert_eq!(logger.prefix(), Prefix::DEFAULT);
    assert_eq!(Prefix::DEFAULT, Prefix::EMPTY);
}

#[test]
fn global_prefix_applies_to_channels() {
    let (logger, sink, id) = setup(Prefix::NAME_LEVEL);
    logger.info(id, "ready\n").unwrap();
    assert_eq!(sink.contents(), "        storage:   INFO: ready\n");
}

#[test]
fn unset_restores_default() {
    let (logger, _, _) = setup(Prefix::LEVEL);
    let saved = logger.prefix();
    logger.set_prefix(Prefix::DATE | Prefix::FILE | Prefix::LINE);
    assert_eq!(logger.prefix(), Prefix::DATE | Prefix::FILE | Prefix::LINE);
    logger.set_prefix(Prefix::UNSET);
    assert_eq!(logger.prefix(), Prefix::DEFAULT);
    logger.set_prefix(saved);
    assert_eq!(logger.prefix(), saved);
}

#[test]
fn channel_prefix_overrides_global() {
    let (logger, sink, id) = setup(Prefix::LEVEL);
    logger.set_id_prefix(id, Prefix::DATE).unwrap();
    logger.info(id, "a\n").unwrap();

    logger.set_id_prefix(id, Prefix::EMPTY).unwrap();
    logger.info(id, "b\n").unwrap();

    logger.set_id_prefix(id, Prefix::UNSET).unwrap();
    logger.info(id, "c\n").unwrap();

    assert_eq!(
        sink.writes(),
        ["2024-05-01 12:30:00: a\n", "b\n", "   INFO: c\n"]
    );
}

#[test]
fn date_follows_clock() {
    let clock = Arc::new(ManualClock::new(noon()));
    let logger = Logger::builder()
        .prefix(Prefix::DATE)
        .shared_clock(clock.clone())
        .build();
    let sink = Arc::new(MemorySink::new());
    logger.register_output(&SinkHandle::from(sink.clone())).unwrap();
    let id = logger.request_id(None).unwrap();
    logger.set_id_threshold(id, Level::Debug).unwrap();
    logger.enable_id(id).unwrap();

    logger.info(id, "x\n").unwrap();
    clock.advance(chrono::TimeDelta::seconds(61));
    logger.info(id, "y\n").unwrap();

    assert_eq!(
        sink.writes(),
        ["2024-05-01 12:30:00: x\n", "2024-05-01 12:31:01: y\n"]
    );
}

#[test]
fn anonymous_channel_renders_blank_name() {
    let logger = Logger::builder().prefix(Prefix::NAME).build();
    let sink = Arc::new(MemorySink::new());
    logger.register_output(&SinkHandle::from(sink.clone())).unwrap();
    let id = logger.request_id(None).unwrap();
    logger.set_id_threshold(id, Level::Debug).unwrap();
    logger.enable_id(id).unwrap();

    logger.info(id, "x\n").unwrap();
    assert_eq!(sink.contents(), format!("{}: x\n", " ".repeat(15)));
}

#[test]
fn field_names_parse() {
    assert_eq!("date".parse::<Prefix>().unwrap(), Prefix::DATE);
    assert_eq!("FUNC".parse::<Prefix>().unwrap(), Prefix::FUNCTION);
    assert!("colour".parse::<Prefix>().is_err());
}
