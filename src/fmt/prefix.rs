//! Auto-generated message prefixes, composed from a set of fields.

use crate::Error;
use crate::level::Level;
use bitflags::bitflags;
use chrono::{DateTime, Local};
use std::str::FromStr;

bitflags! {
    /// Fields that make up a prefix. `UNSET` is not a field: on a channel it means "use the
    /// global prefix", and setting it globally restores [`Prefix::DEFAULT`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Prefix: u16 {
        const DATE = 1 << 0;
        const NAME = 1 << 1;
        const LEVEL = 1 << 2;
        const FILE = 1 << 3;
        const FUNCTION = 1 << 4;
        const LINE = 1 << 5;
        const UNSET = 1 << 15;
    }
}

impl Prefix {
    /// No prefix at all.
    pub const EMPTY: Self = Self::empty();

    /// Global prefix of a fresh logger: messages go out verbatim.
    pub const DEFAULT: Self = Self::EMPTY;

    /// Channel name and severity, the usual choice once prefixes are wanted.
    pub const NAME_LEVEL: Self = Self::NAME.union(Self::LEVEL);

    /// Whether this value defers to the next level up.
    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.contains(Self::UNSET)
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Prefix {
    type Err = Error;

    /// Parses a single field name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" | "time" | "timestamp" => Ok(Self::DATE),
            "name" => Ok(Self::NAME),
            "level" => Ok(Self::LEVEL),
            "file" => Ok(Self::FILE),
            "function" | "func" => Ok(Self::FUNCTION),
            "line" => Ok(Self::LINE),
            "unset" => Ok(Self::UNSET),
            _ => Err(Error::InvalidConfig(format!("unknown prefix field: {s}"))),
        }
    }
}

/// Call site of a log statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub file: &'static str,
    pub function: &'static str,
    pub line: u32,
}

impl Location {
    #[must_use]
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// File and line of the caller. The function is left empty; the `log!` macro fills it
    /// with the module path.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Self {
            file: loc.file(),
            function: "",
            line: loc.line(),
        }
    }
}

/// Everything a prefix may draw from.
#[derive(Debug, Clone, Copy)]
pub struct PrefixFields<'a> {
    pub time: DateTime<Local>,
    pub name: Option<&'a str>,
    pub level: Level,
    pub location: &'a Location,
}

/// Timestamp layout of the `DATE` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders `prefix` as `field:field:...: `. An empty selection renders nothing.
#[must_use]
pub fn render(prefix: Prefix, fields: &PrefixFields<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();

    if prefix.contains(Prefix::DATE) {
        parts.push(fields.time.format(DATE_FORMAT).to_string());
    }
    if prefix.contains(Prefix::NAME) {
        parts.push(format!("{:>15}", fields.name.unwrap_or("")));
    }
    if prefix.contains(Prefix::LEVEL) {
        parts.push(format!("{:>7}", fields.level.name()));
    }
    if prefix.contains(Prefix::FILE) {
        parts.push(fields.location.file.to_string());
    }
    if prefix.contains(Prefix::FUNCTION) {
        parts.push(format!("{}()", fields.location.function));
    }
    if prefix.contains(Prefix::LINE) {
        parts.push(format!("{:>5}", fields.location.line));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}: ", parts.join(":"))
    }
}
