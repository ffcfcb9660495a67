//! Tests for the file sink.

use chanlog::{Error, FileSink, Level, Logger, Sink, SinkHandle};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn creates_parent_directories() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("a").join("b").join("out.log");
    let sink = FileSink::create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(sink.path(), path.as_path());
}

#[test]
fn create_truncates_and_append_keeps() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("out.log");
    fs::write(&path, "old\n").unwrap();

    let sink = FileSink::append(&path).unwrap();
    sink.write_str("new\n").unwrap();
    sink.flush().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");

    let sink = FileSink::create(&path).unwrap();
    sink.write_str("fresh\n").unwrap();
    sink.flush().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
}

#[test]
fn closed_sink_refuses_writes_and_registration() {
    let tmp = TempDir::new().unwrap();
    let sink = Arc::new(FileSink::create(tmp.path().join("out.log")).unwrap());
    assert!(sink.is_open());
    sink.close().unwrap();
    assert!(!sink.is_open());
    assert!(matches!(sink.write_str("late\n"), Err(Error::Io(_))));

    let logger = Logger::new();
    assert!(matches!(
        logger.register_output(&SinkHandle::from(sink)),
        Err(Error::OutputInvalid)
    ));
}

#[test]
fn logger_writes_to_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let handle = SinkHandle::new(FileSink::create(&path).unwrap());

    let logger = Logger::builder().output(handle, Level::Notice).build();
    let id = logger.request_id(Some("app")).unwrap();
    logger.set_id_threshold(id, Level::Debug).unwrap();
    logger.enable_id(id).unwrap();

    logger.info(id, "skipped\n").unwrap();
    logger.notice(id, "kept\n").unwrap();
    logger.flush().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "kept\n");
}

#[test]
fn file_sink_has_no_color() {
    let tmp = TempDir::new().unwrap();
    let handle = SinkHandle::new(FileSink::create(tmp.path().join("c.log")).unwrap());
    let logger = Logger::new();
    logger.register_output(&handle).unwrap();
    assert!(!logger.is_output_color_enabled(&handle));
}

#[test]
fn try_build_reports_bad_output() {
    let tmp = TempDir::new().unwrap();
    let sink = FileSink::create(tmp.path().join("x.log")).unwrap();
    sink.close().unwrap();
    let result = Logger::builder()
        .output(SinkHandle::new(sink), Level::Debug)
        .try_build();
    assert!(matches!(result, Err(Error::OutputInvalid)));
}
