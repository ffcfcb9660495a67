//! `chanlog` - channel-based logging with severity filtering and fan-out.
//!
//! A [`Logger`] keeps a table of channel ids and a table of output sinks. Each log call names
//! a channel and a severity; if logging is on, the channel is enabled and the severity passes
//! the channel's threshold, the message is written to every registered sink whose own
//! threshold accepts it, plus the channel's private sinks.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chanlog::{Level, Logger, MemorySink, SinkHandle};
//!
//! let logger = Logger::new();
//! let memory = Arc::new(MemorySink::new());
//! let sink = SinkHandle::from(memory.clone());
//! logger.register_output(&sink).unwrap();
//!
//! let net = logger.request_id(Some("net")).unwrap();
//! logger.set_id_threshold(net, Level::Info).unwrap();
//! logger.enable_id(net).unwrap();
//!
//! logger.info(net, "connected\n").unwrap();
//! logger.debug(net, "handshake bytes\n").unwrap();
//! assert_eq!(memory.contents(), "connected\n");
//! ```

mod macros;

pub mod clock;
pub mod config;
pub mod error;
pub mod fmt;
pub mod global;
pub mod internal;
pub mod level;
pub mod logger;
pub mod output;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::Error;
pub use fmt::{Bg, ColorSpec, ConsoleColor, Fg, Location, Prefix, TextAttr};
pub use global::{global, init, init_with, is_initialized};
pub use level::{Level, LevelMask, Threshold};
pub use logger::{Emission, Logger, LoggerBuilder};
pub use output::{CallbackSink, FileSink, MemorySink, Sink, SinkHandle, Stream, Terminal};
pub use registry::{Id, Registration};

/// Crate version as `major.minor.patch`.
#[must_use]
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
