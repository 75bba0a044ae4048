// SPDX-License-Identifier: MPL-2.0
//! Centralized path management.
//!
//! # Config Directory Resolution Order
//!
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI argument** (`--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variable** (`SR_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs` crate
//!
//! # Model Directory Resolution Order
//!
//! 1. **Explicit path** - `--model-path` or the request's `model_path`
//! 2. **Environment variable** (`SR_MODEL_PATH`)
//! 3. **Config file** - `model_path` in `settings.toml`
//!
//! When none is set the engine uses its built-in model location.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "sr_bindings";

/// Environment variable naming the default model directory.
pub const ENV_MODEL_PATH: &str = "SR_MODEL_PATH";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "SR_CONFIG_DIR";

/// Global CLI override for config directory (set once at startup).
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Initializes the CLI override for the config directory.
///
/// Only the first call has an effect; later calls are ignored with a warning.
pub fn init_cli_overrides(config_dir: Option<String>) {
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        log::warn!("CLI config dir override already initialized");
    }
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

/// Reads an environment variable as a path, treating empty values as unset.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Returns the config directory path.
///
/// - Linux: `~/.config/sr_bindings/`
/// - macOS: `~/Library/Application Support/sr_bindings/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\sr_bindings\`
///
/// Returns `None` if the config directory cannot be determined.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the config directory path with an optional override.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = get_cli_config_dir() {
        return Some(path);
    }

    if let Some(path) = env_path(ENV_CONFIG_DIR) {
        return Some(path);
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Resolves the model directory handed to the engine.
///
/// `explicit` wins, then `SR_MODEL_PATH`, then `configured` (from the
/// config file).
pub fn resolve_model_path(
    explicit: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .or_else(|| env_path(ENV_MODEL_PATH))
        .or(configured)
}
