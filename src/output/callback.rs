//! User-defined sink: a function that receives each finished piece of text.

use super::Sink;
use std::fmt;

/// Hands finished text to user code, for destinations chanlog has no sink for (syslog, GUIs, network).
pub struct CallbackSink {
    callback: Box<dyn Fn(&str) + Send + Sync>,
}

impl CallbackSink {
    /// The closure runs with the logger's lock held, so it must not log through the same logger.
    pub fn new(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(f),
        }
    }
}

impl fmt::Debug for CallbackSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSink").finish_non_exhaustive()
    }
}

impl Sink for CallbackSink {
    fn write_str(&self, text: &str) -> Result<(), crate::Error> {
        (self.callback)(text);
        Ok(())
    }
}
