//! Settings for the `water_returns` binary.
//!
//! Layered lowest to highest: the optional TOML file
//! (`config/water_returns.toml` unless `--config` names another), environment
//! variables prefixed with `WATER_RETURNS_`, then command line overrides.

use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/water_returns.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for this binary and the engine.
    pub level: String,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            pretty: true,
        }
    }
}

/// Command line overrides.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<String>,
    pub level: Option<String>,
    pub compact: bool,
}

pub fn load(overrides: Overrides) -> Result<Settings> {
    let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("WATER_RETURNS"))
        .build()?
        .try_deserialize()?;

    if let Some(level) = overrides.level {
        settings.level = level;
    }
    if overrides.compact {
        settings.pretty = false;
    }

    Ok(settings)
}
