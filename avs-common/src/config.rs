//! Configuration resolution
//!
//! Settings are resolved once at startup with priority:
//! 1. Environment variable (highest priority)
//! 2. TOML config file (`AVS_CONFIG` path, else `~/.config/avs/config.toml`)
//! 3. Compiled default supplied by the caller
//!
//! TOML keys are the lowercase form of the environment variable name, so
//! `HEYGEN_API_KEY` may be written as `heygen_api_key = "..."`.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "AVS_CONFIG";

/// Layered settings source (environment over TOML)
#[derive(Debug, Clone, Default)]
pub struct SettingsSource {
    toml: Option<toml::Table>,
}

impl SettingsSource {
    /// Load the TOML layer from the default location.
    ///
    /// A missing config file is not an error: the source falls back to
    /// environment variables and compiled defaults only.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                debug!(path = %path.display(), "No config file found, using environment only");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load the TOML layer from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Config file unreadable");
            Error::Io(e)
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Build a source from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self { toml: Some(table) })
    }

    /// Look up a setting, returning `None` when neither layer has a usable value
    pub fn get(&self, env_name: &str) -> Option<String> {
        if let Ok(value) = std::env::var(env_name) {
            if is_valid_value(&value) {
                return Some(value.trim().to_string());
            }
            warn!(variable = env_name, "Ignoring blank environment variable");
        }

        let key = env_name.to_ascii_lowercase();
        let value = self.toml.as_ref()?.get(&key)?;
        let text = match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        is_valid_value(&text).then(|| text.trim().to_string())
    }

    /// Look up a required setting
    pub fn require(&self, env_name: &str) -> Result<String> {
        self.get(env_name).ok_or_else(|| {
            Error::Config(format!(
                "{} not configured. Set the {} environment variable or add `{} = \"...\"` to the config file",
                env_name,
                env_name,
                env_name.to_ascii_lowercase()
            ))
        })
    }

    /// Look up a setting, falling back to a compiled default
    pub fn get_or(&self, env_name: &str, default: &str) -> String {
        self.get(env_name).unwrap_or_else(|| default.to_string())
    }

    /// Look up and parse a setting, falling back to a compiled default
    pub fn get_parsed<T>(&self, env_name: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(env_name) {
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("Invalid value for {}: {} ({})", env_name, raw, e))),
            None => Ok(default),
        }
    }
}

/// A setting is usable when it is non-empty after trimming
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Config file location: `AVS_CONFIG` if set, else the platform config dir
fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if is_valid_value(&path) {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|d| d.join("avs").join("config.toml"))
}
