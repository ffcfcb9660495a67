//! Severity levels and the two filter shapes (minimum level, explicit mask) that gate which
//! messages reach which channels and outputs.

use crate::Error;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

/// Syslog-style severities. `Ord` follows importance, so `Debug < Emerg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Level {
    /// Debug-level message.
    #[default]
    Debug = 1,
    /// Informational message.
    Info = 2,
    /// Normal, but significant, condition.
    Notice = 3,
    /// Warning conditions.
    Warning = 4,
    /// Error conditions.
    Err = 5,
    /// Critical conditions.
    Crit = 6,
    /// Action must be taken immediately.
    Alert = 7,
    /// System is unusable.
    Emerg = 8,
}

impl Level {
    /// Every level, least severe first.
    pub const ALL: [Self; 8] = [
        Self::Debug,
        Self::Info,
        Self::Notice,
        Self::Warning,
        Self::Err,
        Self::Crit,
        Self::Alert,
        Self::Emerg,
    ];

    /// Upper-case name used in rendered prefixes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Err => "ERR",
            Self::Crit => "CRIT",
            Self::Alert => "ALERT",
            Self::Emerg => "EMERG",
        }
    }

    /// Lower-case form used in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Err => "err",
            Self::Crit => "crit",
            Self::Alert => "alert",
            Self::Emerg => "emerg",
        }
    }

    /// The single-bit mask selecting only this level.
    #[must_use]
    pub const fn bit(self) -> LevelMask {
        LevelMask::from_bits_truncate(1 << (self as u8 - 1))
    }

    /// Position in [`Level::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Self::Debug),
            2 => Ok(Self::Info),
            3 => Ok(Self::Notice),
            4 => Ok(Self::Warning),
            5 => Ok(Self::Err),
            6 => Ok(Self::Crit),
            7 => Ok(Self::Alert),
            8 => Ok(Self::Emerg),
            _ => Err(Error::LevelUnknown),
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "notice" => Ok(Self::Notice),
            "warning" | "warn" => Ok(Self::Warning),
            "err" | "error" => Ok(Self::Err),
            "crit" | "critical" => Ok(Self::Crit),
            "alert" => Ok(Self::Alert),
            "emerg" | "emergency" => Ok(Self::Emerg),
            _ => Err(Error::LevelUnknown),
        }
    }
}

bitflags! {
    /// Explicit set of accepted severities; allows non-contiguous selections such as
    /// `WARNING | ERR | CRIT`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LevelMask: u16 {
        const DEBUG = 1 << 0;
        const INFO = 1 << 1;
        const NOTICE = 1 << 2;
        const WARNING = 1 << 3;
        const ERR = 1 << 4;
        const CRIT = 1 << 5;
        const ALERT = 1 << 6;
        const EMERG = 1 << 7;
    }
}

impl LevelMask {
    /// Every level at or above `level`, i.e. the mask equivalent of a minimum threshold.
    #[must_use]
    pub fn at_least(level: Level) -> Self {
        Level::ALL
            .into_iter()
            .filter(|l| *l >= level)
            .map(Level::bit)
            .collect()
    }

    /// Whether `level` is selected.
    #[must_use]
    pub const fn accepts(self, level: Level) -> bool {
        self.contains(level.bit())
    }

    /// Converts raw bits, rejecting empty masks and bits above `EMERG`.
    ///
    /// # Errors
    /// [`Error::LevelUnknown`] for an empty mask or undefined bits.
    pub const fn from_raw(bits: u16) -> Result<Self, Error> {
        match Self::from_bits(bits) {
            Some(mask) if !mask.is_empty() => Ok(mask),
            _ => Err(Error::LevelUnknown),
        }
    }
}

impl From<Level> for LevelMask {
    fn from(level: Level) -> Self {
        level.bit()
    }
}

impl FromIterator<Level> for LevelMask {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, l| acc | l.bit())
    }
}

/// Filter held by every channel and every output entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threshold {
    /// Nothing configured yet; accepts no level.
    #[default]
    Unset,
    /// Accepts `level` and everything more severe.
    Min(Level),
    /// Accepts exactly the selected levels.
    Mask(LevelMask),
}

impl Threshold {
    #[must_use]
    pub const fn accepts(self, level: Level) -> bool {
        match self {
            Self::Unset => false,
            Self::Min(min) => level as u8 >= min as u8,
            Self::Mask(mask) => mask.accepts(level),
        }
    }

    /// The minimum level when the threshold is in minimum form.
    #[must_use]
    pub const fn min_level(self) -> Option<Level> {
        match self {
            Self::Min(level) => Some(level),
            Self::Unset | Self::Mask(_) => None,
        }
    }

    /// The accepted set in mask form, whichever shape the threshold has.
    #[must_use]
    pub fn as_mask(self) -> LevelMask {
        match self {
            Self::Unset => LevelMask::empty(),
            Self::Min(level) => LevelMask::at_least(level),
            Self::Mask(mask) => mask,
        }
    }
}

impl From<Level> for Threshold {
    fn from(level: Level) -> Self {
        Self::Min(level)
    }
}

impl From<LevelMask> for Threshold {
    fn from(mask: LevelMask) -> Self {
        Self::Mask(mask)
    }
}
