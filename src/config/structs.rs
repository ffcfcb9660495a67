//! Configuration struct definitions.

use crate::Error;
use crate::fmt::{Bg, ColorSpec, ConsoleColor, Fg, Prefix, TextAttr};
use crate::level::{Level, LevelMask, Threshold};
use crate::registry::{DEFAULT_MAX_ID_OUTPUTS, DEFAULT_MAX_IDS, DEFAULT_MAX_OUTPUTS};
use serde::Deserialize;
use std::collections::HashMap;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Global logging switch.
    pub enabled: bool,
    /// Global prefix fields; absent means the default.
    pub prefix: Option<Vec<String>>,
    /// Calls written per second, 0 for no limit.
    pub rate_limit: u32,
    /// Hold back identical consecutive messages.
    pub suppress_repeats: bool,
    /// Minimum level of chanlog's own diagnostics.
    pub internal_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: None,
            rate_limit: 0,
            suppress_repeats: false,
            internal_level: "warning".to_string(),
        }
    }
}

/// Table sizes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub ids: usize,
    pub outputs: usize,
    pub id_outputs: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            ids: DEFAULT_MAX_IDS,
            outputs: DEFAULT_MAX_OUTPUTS,
            id_outputs: DEFAULT_MAX_ID_OUTPUTS,
        }
    }
}

/// Color switches and per-level prefix colors.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ColorConfig {
    /// Color the generated prefix.
    pub prefix: bool,
    /// Color message text of channels that have a color.
    pub message: bool,
    /// Prefix color per level name.
    pub levels: HashMap<String, ColorEntry>,
}

/// A console color (`fg`, `bg`, `attr`) or a pair of wrap strings (`open`, `close`).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ColorEntry {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub attr: Vec<String>,
    pub open: Option<String>,
    pub close: Option<String>,
}

impl ColorEntry {
    /// # Errors
    /// [`Error::InvalidConfig`] for unknown color or attribute names.
    pub fn to_spec(&self) -> Result<ColorSpec, Error> {
        if self.open.is_some() || self.close.is_some() {
            return Ok(ColorSpec::Strings {
                open: self.open.clone().unwrap_or_default(),
                close: self.close.clone().unwrap_or_default(),
            });
        }

        let fg: Fg = self.fg.as_deref().unwrap_or_default().parse()?;
        let bg: Bg = self.bg.as_deref().unwrap_or_default().parse()?;
        let attr = self
            .attr
            .iter()
            .map(|a| a.parse::<TextAttr>())
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .fold(TextAttr::empty(), TextAttr::union);
        Ok(ColorSpec::Console(ConsoleColor::new(fg, bg, attr)))
    }
}

/// One destination.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `stdout`, `stderr` or `file`.
    pub kind: String,
    /// File path for `kind = "file"`; `~` and `$VAR` are expanded.
    pub path: Option<String>,
    /// Append to an existing file instead of truncating it.
    pub append: bool,
    /// Minimum level.
    pub level: Option<String>,
    /// Exact set of levels; wins over `level`.
    pub levels: Option<Vec<String>>,
    /// Override the sink's color capability.
    pub color: Option<bool>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: "stdout".to_string(),
            path: None,
            append: true,
            level: None,
            levels: None,
            color: None,
        }
    }
}

impl OutputConfig {
    /// [`Threshold::Unset`] when neither `level` nor `levels` is given.
    ///
    /// # Errors
    /// [`Error::LevelUnknown`] for unknown level names or an empty list.
    pub fn threshold(&self) -> Result<Threshold, Error> {
        parse_threshold(self.level.as_deref(), self.levels.as_deref())
    }
}

/// One named channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub enabled: bool,
    /// Minimum level; `debug` when neither this nor `levels` is given.
    pub level: Option<String>,
    /// Exact set of levels; wins over `level`.
    pub levels: Option<Vec<String>>,
    /// Prefix fields; absent means follow the global prefix.
    pub prefix: Option<Vec<String>>,
    /// Message color.
    pub color: Option<ColorEntry>,
    /// Destinations only this channel writes to.
    pub outputs: Vec<OutputConfig>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: None,
            levels: None,
            prefix: None,
            color: None,
            outputs: Vec::new(),
        }
    }
}

impl ChannelConfig {
    /// # Errors
    /// [`Error::LevelUnknown`] for unknown level names or an empty list.
    pub fn threshold(&self) -> Result<Threshold, Error> {
        match parse_threshold(self.level.as_deref(), self.levels.as_deref())? {
            Threshold::Unset => Ok(Threshold::Min(Level::Debug)),
            threshold => Ok(threshold),
        }
    }
}

fn parse_threshold(level: Option<&str>, levels: Option<&[String]>) -> Result<Threshold, Error> {
    if let Some(levels) = levels {
        let mask = levels
            .iter()
            .map(|l| l.parse::<Level>())
            .collect::<Result<LevelMask, _>>()?;
        if mask.is_empty() {
            return Err(Error::LevelUnknown);
        }
        return Ok(Threshold::Mask(mask));
    }
    match level {
        Some(level) => Ok(Threshold::Min(level.parse()?)),
        None => Ok(Threshold::Unset),
    }
}

/// Folds field names into a [`Prefix`]. An empty list is the empty prefix.
///
/// # Errors
/// [`Error::InvalidConfig`] for unknown field names.
pub fn parse_prefix(fields: &[String]) -> Result<Prefix, Error> {
    fields
        .iter()
        .map(|f| f.parse::<Prefix>())
        .try_fold(Prefix::EMPTY, |acc, f| Ok::<_, Error>(acc | f?))
}
