use std::{env, path::PathBuf};

use thiserror::Error;

use super::schema::Settings;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `SEGUE__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SEGUE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Reject settings the runtime cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.controls.scrub_seconds == 0 {
            return Err(SettingsError::Invalid(
                "controls.scrub_seconds must be >= 1".to_string(),
            ));
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(SettingsError::Invalid(
                "library.extensions must name at least one extension".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the config path from `SEGUE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SEGUE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/segue/config.toml`, or `~/.config/segue/config.toml`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("segue").join("config.toml"))
}
