//! Unified error type for all chanlog operations.
//!
//! The registry and dispatch variants form a closed set: every configuration call either
//! succeeds or names exactly one of them. Policy no-ops (logging off, id disabled, level
//! filtered) are not errors and never show up here.

/// Error type for chanlog operations.
#[derive(Debug)]
pub enum Error {
    /// The sink handed to a registration is closed or otherwise unusable.
    OutputInvalid,
    /// Every output slot of the table is taken.
    OutputsFull,
    /// The sink is not registered in the addressed table.
    OutputNotFound,
    /// Every id slot is taken.
    IdsFull,
    /// The id is in range but its slot is not allocated.
    IdNotFound,
    /// The id is out of range or does not name an allocated channel.
    IdUnknown,
    /// The level or level mask is outside the defined severities.
    LevelUnknown,
    /// The per-second call budget is used up; nothing was written.
    RateLimited,
    /// I/O error from a sink or while reading config.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// Config parsed but names something that does not exist (color, prefix field, kind).
    InvalidConfig(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutputInvalid => write!(f, "output is invalid"),
            Self::OutputsFull => write!(f, "all outputs are in use"),
            Self::OutputNotFound => write!(f, "output not registered"),
            Self::IdsFull => write!(f, "all ids are in use"),
            Self::IdNotFound => write!(f, "id not allocated"),
            Self::IdUnknown => write!(f, "id unknown"),
            Self::LevelUnknown => write!(f, "level unknown"),
            Self::RateLimited => write!(f, "rate limit exceeded"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::InvalidConfig(s) => write!(f, "invalid config: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
