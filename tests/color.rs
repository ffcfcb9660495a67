//! Tests for color sequences and the color decision.

use chanlog::fmt::{ColorGates, ColorScope, default_prefix_color, should_color};
use chanlog::{
    Bg, ColorSpec, ConsoleColor, Fg, Id, Level, Logger, MemorySink, Prefix, SinkHandle, TextAttr,
};
use std::sync::Arc;

fn colored_logger(prefix: Prefix) -> (Logger, Arc<MemorySink>, Id) {
    let logger = Logger::builder().prefix(prefix).build();
    let sink = Arc::new(MemorySink::new().with_color(true));
    logger.register_output(&SinkHandle::from(sink.clone())).unwrap();
    let id = logger.request_id(Some("ui")).unwrap();
    logger.set_id_threshold(id, Level::Debug).unwrap();
    logger.enable_id(id).unwrap();
    (logger, sink, id)
}

#[test]
fn console_sequences() {
    let green = ConsoleColor::new(Fg::Green, Bg::Unchanged, TextAttr::empty());
    assert_eq!(green.open(), "\x1b[0;32m");

    let loud = ConsoleColor::new(Fg::Red, Bg::Blue, TextAttr::BRIGHT);
    assert_eq!(loud.open(), "\x1b[0;1;31;44m");

    assert_eq!(ConsoleColor::default().open(), "\x1b[0m");
    assert_eq!(ConsoleColor::RESET, "\x1b[0m");
}

#[test]
fn string_colors_wrap() {
    let spec = ColorSpec::Strings {
        open: "<b>".to_string(),
        close: "</b>".to_string(),
    };
    assert_eq!(spec.wrap("x"), "<b>x</b>");
}

#[test]
fn color_names_parse() {
    assert_eq!("cyan".parse::<Fg>().unwrap(), Fg::Cyan);
    assert_eq!("default".parse::<Bg>().unwrap(), Bg::Unchanged);
    assert_eq!("bold".parse::<TextAttr>().unwrap(), TextAttr::BRIGHT);
    assert!("mauve".parse::<Fg>().is_err());
}

#[test]
fn nothing_colors_without_output_switch() {
    let gates = ColorGates {
        global_prefix: true,
        global_message: true,
        channel_colored: true,
        output_colored: false,
        continuation: false,
        ends_line: true,
    };
    assert!(!should_color(ColorScope::Prefix, &gates));
    assert!(!should_color(ColorScope::MessageOpen, &gates));
    assert!(!should_color(ColorScope::MessageClose, &gates));
}

#[test]
fn message_color_needs_global_and_channel() {
    let base = ColorGates {
        global_message: true,
        channel_colored: true,
        output_colored: true,
        ends_line: true,
        ..ColorGates::default()
    };
    assert!(should_color(ColorScope::MessageOpen, &base));
    assert!(should_color(ColorScope::MessageClose, &base));

    let no_global = ColorGates {
        global_message: false,
        ..base
    };
    assert!(!should_color(ColorScope::MessageOpen, &no_global));

    let no_channel = ColorGates {
        channel_colored: false,
        ..base
    };
    assert!(!should_color(ColorScope::MessageOpen, &no_channel));
}

#[test]
fn continuation_skips_open_and_unterminated_skips_close() {
    let gates = ColorGates {
        global_prefix: true,
        global_message: true,
        channel_colored: true,
        output_colored: true,
        continuation: true,
        ends_line: false,
    };
    assert!(!should_color(ColorScope::Prefix, &gates));
    assert!(!should_color(ColorScope::MessageOpen, &gates));
    assert!(!should_color(ColorScope::MessageClose, &gates));
}

#[test]
fn switches_start_off() {
    let logger = Logger::new();
    assert!(!logger.is_prefix_color_enabled());
    assert!(!logger.is_message_color_enabled());

    logger.enable_prefix_color();
    logger.enable_message_color();
    assert!(logger.is_prefix_color_enabled());
    assert!(logger.is_message_color_enabled());

    logger.disable_prefix_color();
    assert!(!logger.is_prefix_color_enabled());
}

#[test]
fn message_color_frames_line() {
    let (logger, sink, id) = colored_logger(Prefix::EMPTY);
    logger
        .set_id_color(id, Fg::Red, Bg::Unchanged, TextAttr::empty())
        .unwrap();
    logger.enable_message_color();

    logger.info(id, "hi\n").unwrap();
    assert_eq!(sink.contents(), "\x1b[0;31mhi\n\x1b[0m");
}

#[test]
fn message_color_spans_continued_line() {
    let (logger, sink, id) = colored_logger(Prefix::EMPTY);
    logger
        .set_id_color(id, Fg::Red, Bg::Unchanged, TextAttr::empty())
        .unwrap();
    logger.enable_message_color();

    logger.info(id, "a").unwrap();
    logger.info(id, "b\n").unwrap();
    assert_eq!(sink.writes(), ["\x1b[0;31ma", "b\n\x1b[0m"]);
}

#[test]
fn message_color_off_without_global_switch() {
    let (logger, sink, id) = colored_logger(Prefix::EMPTY);
    logger
        .set_id_color(id, Fg::Red, Bg::Unchanged, TextAttr::empty())
        .unwrap();

    logger.info(id, "hi\n").unwrap();
    assert_eq!(sink.contents(), "hi\n");
}

#[test]
fn output_switch_disables_color() {
    let (logger, sink, id) = colored_logger(Prefix::EMPTY);
    logger
        .set_id_color(id, Fg::Red, Bg::Unchanged, TextAttr::empty())
        .unwrap();
    logger.enable_message_color();
    logger
        .set_output_color(&SinkHandle::from(sink.clone()), false)
        .unwrap();

    logger.info(id, "hi\n").unwrap();
    assert_eq!(sink.contents(), "hi\n");
}

#[test]
fn string_color_on_channel() {
    let (logger, sink, id) = colored_logger(Prefix::EMPTY);
    logger.set_id_color_strings(id, "<i>", "</i>").unwrap();
    logger.enable_message_color();

    logger.info(id, "hi\n").unwrap();
    assert_eq!(sink.contents(), "<i>hi\n</i>");

    logger.reset_id_color(id).unwrap();
    assert_eq!(logger.id_color(id).unwrap(), None);
    logger.info(id, "plain\n").unwrap();
    assert_eq!(sink.writes()[1], "plain\n");
}

#[test]
fn prefix_uses_level_color() {
    let (logger, sink, id) = colored_logger(Prefix::LEVEL);
    logger.enable_prefix_color();

    logger.notice(id, "hi\n").unwrap();
    assert_eq!(sink.contents(), "\x1b[0;32m NOTICE: \x1b[0mhi\n");
}

#[test]
fn custom_prefix_colors_and_reset() {
    let (logger, sink, id) = colored_logger(Prefix::LEVEL);
    logger.enable_prefix_color();
    logger.set_prefix_color_strings(Level::Err, "[", "]");
    logger.set_prefix_color(Level::Info, Fg::Blue, Bg::Unchanged, TextAttr::UNDERLINE);

    logger.err(id, "e\n").unwrap();
    logger.info(id, "i\n").unwrap();
    assert_eq!(sink.writes(), ["[    ERR: ]e\n", "\x1b[0;4;34m   INFO: \x1b[0mi\n"]);

    logger.reset_prefix_colors();
    for level in Level::ALL {
        assert_eq!(logger.prefix_color(level), default_prefix_color(level));
    }
}

#[test]
fn prefix_color_off_on_plain_sink() {
    let logger = Logger::builder().prefix(Prefix::LEVEL).build();
    let sink = Arc::new(MemorySink::new());
    logger.register_output(&SinkHandle::from(sink.clone())).unwrap();
    let id = logger.request_id(None).unwrap();
    logger.set_id_threshold(id, Level::Debug).unwrap();
    logger.enable_id(id).unwrap();
    logger.enable_prefix_color();

    logger.warning(id, "w\n").unwrap();
    assert_eq!(sink.contents(), "WARNING: w\n");
}

#[test]
fn private_output_color_switch() {
    let (logger, _, id) = colored_logger(Prefix::EMPTY);
    let private = Arc::new(MemorySink::new().with_color(true));
    let handle = SinkHandle::from(private.clone());
    logger.register_id_output(id, &handle).unwrap();
    assert!(logger.is_id_output_color_enabled(id, &handle));

    logger.set_id_output_color(id, &handle, false).unwrap();
    logger
        .set_id_color(id, Fg::Yellow, Bg::Unchanged, TextAttr::empty())
        .unwrap();
    logger.enable_message_color();

    logger.info(id, "hi\n").unwrap();
    assert_eq!(private.contents(), "hi\n");
}

#[test]
fn shared_sink_uses_the_accepting_entry_color_switch() {
    let (logger, sink, id) = colored_logger(Prefix::EMPTY);
    let handle = SinkHandle::from(sink.clone());
    logger.set_id_color_strings(id, "<y>", "</y>").unwrap();
    logger.enable_message_color();

    logger.register_id_output(id, &handle).unwrap();
    logger.set_id_output_color(id, &handle, false).unwrap();
    logger
        .set_id_output_threshold(id, &handle, Level::Err)
        .unwrap();

    // only the global entry accepts INFO, and it has color on
    logger.info(id, "a\n").unwrap();
    // both accept ERR, the private entry's switch wins
    logger.err(id, "b\n").unwrap();
    assert_eq!(sink.writes(), ["<y>a\n</y>", "b\n"]);
}
