//! Tests for the per-second call budget.

use chanlog::{Emission, Error, Id, Level, Logger, ManualClock, MemorySink, SinkHandle};
use chrono::{Local, TimeDelta, TimeZone};
use std::sync::Arc;

fn setup(limit: u32) -> (Logger, Arc<ManualClock>, Arc<MemorySink>, Id) {
    let start = Local.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let logger = Logger::builder()
        .rate_limit(limit)
        .shared_clock(clock.clone())
        .build();
    let sink = Arc::new(MemorySink::new());
    logger.register_output(&SinkHandle::from(sink.clone())).unwrap();
    let id = logger.request_id(None).unwrap();
    logger.set_id_threshold(id, Level::Info).unwrap();
    logger.enable_id(id).unwrap();
    (logger, clock, sink, id)
}

#[test]
fn eleventh_call_in_a_second_is_rejected() {
    let (logger, clock, sink, id) = setup(10);
    assert_eq!(logger.rate_limit(), 10);

    for i in 0..10 {
        assert!(logger.info(id, &format!("{i}\n")).unwrap().wrote());
    }
    assert!(matches!(logger.info(id, "11\n"), Err(Error::RateLimited)));
    assert_eq!(sink.write_count(), 10);

    clock.advance(TimeDelta::seconds(1));
    assert!(logger.info(id, "again\n").unwrap().wrote());
    assert_eq!(sink.write_count(), 11);
}

#[test]
fn zero_means_unlimited() {
    let (logger, _, sink, id) = setup(0);
    for _ in 0..500 {
        logger.info(id, "x\n").unwrap();
    }
    assert_eq!(sink.write_count(), 500);
}

#[test]
fn filtered_calls_do_not_count() {
    let (logger, _, sink, id) = setup(2);
    for _ in 0..5 {
        assert_eq!(logger.debug(id, "dropped\n").unwrap(), Emission::Filtered);
    }
    logger.info(id, "a\n").unwrap();
    logger.info(id, "b\n").unwrap();
    assert_eq!(sink.contents(), "a\nb\n");
}

#[test]
fn changing_limit_starts_fresh_window() {
    let (logger, _, _, id) = setup(1);
    logger.info(id, "a\n").unwrap();
    assert!(logger.info(id, "b\n").is_err());

    logger.set_rate_limit(3);
    assert!(logger.info(id, "c\n").is_ok());
    logger.set_rate_limit(0);
    assert!((0..10).all(|_| logger.info(id, "d\n").is_ok()));
}
