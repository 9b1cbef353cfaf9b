//! Optional TOML configuration for the `slots` CLI.
//!
//! ```toml
//! default_duration_minutes = 45
//! buffer_minutes = 10
//!
//! [working_hours]
//! monday = [["09:00", "17:00"]]
//! tuesday = [["09:00", "12:00"], ["13:00", "17:00"]]
//! ```
//!
//! Values in a request always win over the config file, which in turn wins over
//! the built-in defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slot_engine::WeeklyAvailability;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Meeting length used when a request does not give one.
    pub default_duration_minutes: u32,

    /// Minimum break around busy events, applied to every participant whose
    /// own buffer is smaller.
    pub buffer_minutes: u32,

    /// Working hours used as a constraint when a request has none.
    pub working_hours: Option<WeeklyAvailability>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration_minutes: 30,
            buffer_minutes: 0,
            working_hours: None,
        }
    }
}

impl Config {
    /// Load from `path`, or fall back to the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}
