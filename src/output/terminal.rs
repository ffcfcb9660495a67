//! Standard output and standard error, the only sinks that start with color enabled.

use super::Sink;
use std::io::{self, Write};

/// Which standard stream a [`Terminal`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Sink over one of the process's standard streams.
///
/// Prefer [`SinkHandle::stdout`](super::SinkHandle::stdout) and
/// [`SinkHandle::stderr`](super::SinkHandle::stderr): they share one identity per stream, so
/// registering "stdout" from two places counts as the same output.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    stream: Stream,
}

impl Terminal {
    #[must_use]
    pub const fn new(stream: Stream) -> Self {
        Self { stream }
    }

    #[must_use]
    pub const fn stream(&self) -> Stream {
        self.stream
    }
}

impl Sink for Terminal {
    fn write_str(&self, text: &str) -> Result<(), crate::Error> {
        match self.stream {
            Stream::Stdout => io::stdout().lock().write_all(text.as_bytes())?,
            Stream::Stderr => io::stderr().lock().write_all(text.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        match self.stream {
            Stream::Stdout => io::stdout().flush()?,
            Stream::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }

    fn supports_color(&self) -> bool {
        true
    }
}
