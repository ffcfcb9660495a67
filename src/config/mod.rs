//! TOML configuration: loading from the user's config directory or an explicit path.
//!
//! Struct definitions live in `structs`; this module owns file I/O and the location lookup.

mod structs;

pub use structs::{
    CapacityConfig, ChannelConfig, ColorConfig, ColorEntry, GeneralConfig, OutputConfig,
    parse_prefix,
};

use crate::internal;
use crate::level::Level;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// An empty file is a valid config: every section falls back to its defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Global switches.
    pub general: GeneralConfig,
    /// Table sizes.
    pub capacity: CapacityConfig,
    /// Color switches and prefix colors.
    pub color: ColorConfig,
    /// Global destinations.
    pub outputs: Vec<OutputConfig>,
    /// Named channels, requested in name order.
    pub channels: BTreeMap<String, ChannelConfig>,
}

impl Config {
    /// Loads the config from the default location, or defaults when there is no file.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined, the file can't be read, or TOML
    /// parsing hits a syntax error.
    pub fn load() -> Result<Self, crate::Error> {
        internal::debug("CONFIG", "Loading config from default location");
        let config_path = Self::get_config_path()?;
        let config = Self::load_from(&config_path)?;
        internal::info(
            "CONFIG",
            &format!("Config loaded from {}", config_path.display()),
        );
        Ok(config)
    }

    /// Loads configuration from an explicit path; a missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        content.parse().inspect_err(|e| {
            internal::error(
                "CONFIG",
                &format!("Failed to parse {}: {e}", path.display()),
            );
        })
    }

    /// `chanlog/chanlog.toml` under the platform config directory.
    ///
    /// # Errors
    /// Fails when the platform has no concept of a config directory.
    pub fn get_config_path() -> Result<PathBuf, crate::Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("chanlog").join("chanlog.toml"))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// Level of chanlog's own diagnostics; unknown names fall back to warning.
    #[must_use]
    pub fn parse_internal_level(&self) -> Level {
        self.general.internal_level.parse().unwrap_or(Level::Warning)
    }
}

impl FromStr for Config {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
