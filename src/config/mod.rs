// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, loading and saving user
//! preferences to a `settings.toml` file.
//!
//! Every field is optional; unset fields fall back to [`defaults`]. Command
//! line arguments take precedence over the file.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `SR_CONFIG_DIR` environment variable (or pass `--config-dir`)
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use sr_bindings::config::{self, Config};
//!
//! let mut config = config::load().unwrap_or_default();
//! config.model = Some("waifu2x_cunet_up2x".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the engine's model files.
    pub model_path: Option<PathBuf>,
    pub model: Option<String>,
    pub scale: Option<f32>,
    pub gpu_id: Option<i32>,
    pub cpu_mode: Option<bool>,
    pub tile_size: Option<u32>,
    pub output_format: Option<String>,
}

impl Config {
    #[must_use]
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    #[must_use]
    pub fn scale_or_default(&self) -> f32 {
        self.scale.unwrap_or(DEFAULT_SCALE)
    }

    #[must_use]
    pub fn gpu_id_or_default(&self) -> i32 {
        self.gpu_id.unwrap_or(DEFAULT_GPU_ID)
    }

    #[must_use]
    pub fn cpu_mode_or_default(&self) -> bool {
        self.cpu_mode.unwrap_or(false)
    }

    #[must_use]
    pub fn tile_size_or_default(&self) -> u32 {
        self.tile_size.unwrap_or(DEFAULT_TILE_SIZE)
    }

    #[must_use]
    pub fn output_format_or_default(&self) -> &str {
        self.output_format.as_deref().unwrap_or(DEFAULT_OUTPUT_FORMAT)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default location.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves the configuration to the default location.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads the configuration from `path`. Unparsable content yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::warn!("Ignoring invalid config {}: {err}", path.display());
            Ok(Config::default())
        }
    }
}

/// Saves the configuration to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_fields() {
        let config = Config {
            model_path: Some(PathBuf::from("/opt/models")),
            model: Some("waifu2x_cunet_up2x".to_string()),
            scale: Some(4.0),
            gpu_id: Some(1),
            cpu_mode: Some(false),
            tile_size: Some(256),
            output_format: Some("png".to_string()),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_fields_unset() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "cpu_mode = true\ntile_size = 128\n").expect("write config");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded.cpu_mode, Some(true));
        assert_eq!(loaded.tile_size, Some(128));
        assert!(loaded.model.is_none());
        assert_eq!(loaded.model_or_default(), DEFAULT_MODEL);
    }

    #[test]
    fn load_from_missing_path_is_an_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        assert!(load_from_path(&temp_dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let config = Config::default();
        assert_eq!(config.scale_or_default(), DEFAULT_SCALE);
        assert_eq!(config.gpu_id_or_default(), DEFAULT_GPU_ID);
        assert!(!config.cpu_mode_or_default());
        assert_eq!(config.tile_size_or_default(), DEFAULT_TILE_SIZE);
        assert_eq!(config.output_format_or_default(), DEFAULT_OUTPUT_FORMAT);
    }
}
