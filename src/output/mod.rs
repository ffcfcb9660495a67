//! Destinations for finished log text. A [`Sink`] only has to accept a string; the registry
//! tracks it through a [`SinkHandle`], whose identity is the allocation it points to.

mod callback;
mod file;
mod memory;
mod terminal;

pub use callback::CallbackSink;
pub use file::FileSink;
pub use memory::MemorySink;
pub use terminal::{Stream, Terminal};

use std::fmt;
use std::sync::{Arc, OnceLock};

/// `Send + Sync` so one logger can be shared between threads.
pub trait Sink: Send + Sync {
    /// Writes one finished chunk: prefix, color sequences and message body in a single call.
    ///
    /// # Errors
    /// I/O errors from the underlying stream, file or callback target.
    fn write_str(&self, text: &str) -> Result<(), crate::Error>;

    /// Pushes buffered text to its final destination.
    ///
    /// # Errors
    /// I/O errors from the underlying stream.
    fn flush(&self) -> Result<(), crate::Error> {
        Ok(())
    }

    /// Closed sinks are refused at registration.
    fn is_open(&self) -> bool {
        true
    }

    /// Initial value of the per-output color switch when the sink is registered.
    fn supports_color(&self) -> bool {
        false
    }
}

/// Shared reference to a sink, compared by identity: two handles are equal exactly when they
/// point at the same sink.
#[derive(Clone)]
pub struct SinkHandle(Arc<dyn Sink>);

impl SinkHandle {
    /// Each call creates a new identity; clone the handle to register the same sink elsewhere.
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self(Arc::new(sink))
    }

    /// Process-wide standard output. Every call returns the same identity.
    #[must_use]
    pub fn stdout() -> Self {
        static STDOUT: OnceLock<SinkHandle> = OnceLock::new();
        STDOUT
            .get_or_init(|| Self::new(Terminal::new(Stream::Stdout)))
            .clone()
    }

    /// Process-wide standard error. Every call returns the same identity.
    #[must_use]
    pub fn stderr() -> Self {
        static STDERR: OnceLock<SinkHandle> = OnceLock::new();
        STDERR
            .get_or_init(|| Self::new(Terminal::new(Stream::Stderr)))
            .clone()
    }

    /// Wraps a user function that receives each finished piece of text.
    pub fn callback(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self::new(CallbackSink::new(f))
    }

    /// Direct access for flushing and closing outside the logger.
    #[must_use]
    pub fn sink(&self) -> &dyn Sink {
        self.0.as_ref()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl<T: Sink + 'static> From<Arc<T>> for SinkHandle {
    fn from(sink: Arc<T>) -> Self {
        Self(sink)
    }
}

impl PartialEq for SinkHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for SinkHandle {}

impl fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SinkHandle({:p})", self.addr())
    }
}
