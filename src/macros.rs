/// Call site of the macro invocation, with the module path as the function name.
#[macro_export]
macro_rules! location {
    () => {
        $crate::fmt::Location::new(::core::file!(), ::core::module_path!(), ::core::line!())
    };
}

/// Formats and emits a message with the call site attached.
///
/// ```
/// use chanlog::{Level, Logger};
///
/// let logger = Logger::new();
/// let id = logger.request_id(Some("net")).unwrap();
/// let _ = chanlog::log!(logger, id, Level::Info, "connected to {}\n", "example.org");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $id:expr, $level:expr, $($arg:tt)+) => {
        $logger.emit($id, $level, $crate::location!(), &::std::format!($($arg)+))
    };
}
