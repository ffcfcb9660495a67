//! Fixed-capacity tables behind the logger: registered outputs and allocated channel ids.
//!
//! Both are plain slot arrays sized once at construction. Lookups are linear scans; the
//! capacities are small and a full table is reported, never grown.

mod ids;
mod outputs;

pub use ids::{Channel, IdTable};
pub use outputs::{OutputEntry, OutputTable};

use crate::Error;
use crate::level::Threshold;
use std::fmt;

/// Default number of channel ids.
pub const DEFAULT_MAX_IDS: usize = 256;
/// Default number of global outputs.
pub const DEFAULT_MAX_OUTPUTS: usize = 256;
/// Default number of private outputs per channel.
pub const DEFAULT_MAX_ID_OUTPUTS: usize = 16;

/// Handle of one logical channel, a small index into the id table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u16);

impl Id {
    /// Never allocated; every id-scoped operation rejects it.
    pub const UNKNOWN: Self = Self(u16::MAX);

    /// Ids travel through config and diagnostics as plain numbers.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Stable for the lifetime of the registration, so it can be stored and logged.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Slot position in the id table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registering a sink twice is not an error, but callers sharing a sink need to know whether
/// they were first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The sink was new to the table and took a free slot.
    Added,
    /// The sink was already present; its reference count is now `count`.
    AlreadyRegistered { count: u32 },
}

/// A threshold that accepts nothing is almost always a config mistake, so it is refused
/// instead of silencing the target.
pub(crate) fn check_threshold(threshold: Threshold) -> Result<Threshold, Error> {
    match threshold {
        Threshold::Unset => Err(Error::LevelUnknown),
        Threshold::Mask(mask) if mask.is_empty() => Err(Error::LevelUnknown),
        Threshold::Min(_) | Threshold::Mask(_) => Ok(threshold),
    }
}
