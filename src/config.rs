//! Session configuration loading.
//!
//! Structure:
//! - Pure functions: default path, validation
//! - Effect functions: reading the JSON file
//!
//! The file is optional. Nothing here ever writes configuration back; the
//! device keeps no state across restarts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::SessionConfig;

/// Configuration filename within the config directory.
const CONFIG_FILENAME: &str = "config.json";

/// Narrowest display the menu layout still fits on.
const MIN_DISPLAY_COLUMNS: u16 = 8;

/// Widest character LCD the simulator will draw.
const MAX_DISPLAY_COLUMNS: u16 = 80;

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Returns the default configuration path.
///
/// On Linux: ~/.config/cpi-menu/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cpi-menu")
        .join(CONFIG_FILENAME)
}

/// Check a configuration for values the session cannot run with.
pub fn validate(config: &SessionConfig) -> Result<()> {
    if !(MIN_DISPLAY_COLUMNS..=MAX_DISPLAY_COLUMNS).contains(&config.display_columns) {
        return Err(Error::Config(format!(
            "display_columns must be between {} and {}, got {}",
            MIN_DISPLAY_COLUMNS, MAX_DISPLAY_COLUMNS, config.display_columns
        )));
    }

    if config.wheel_step_ms == 0 {
        return Err(Error::Config("wheel_step_ms must be positive".to_string()));
    }

    let mut seen = HashSet::new();
    for entry in &config.contacts {
        if entry.name.is_empty() {
            return Err(Error::Config("seed contact with empty name".to_string()));
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(Error::Config(format!("duplicate seed contact: {}", entry.name)));
        }
    }

    Ok(())
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Parse and validate a configuration file.
pub fn load_file(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)?;
    let config: SessionConfig = serde_json::from_str(&contents)?;
    validate(&config)?;
    Ok(config)
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Without one, the default path is used when
/// present and built-in defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<SessionConfig> {
    match explicit {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            load_file(path)
        }
        None => {
            let path = default_config_path();
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading default configuration");
                load_file(&path)
            } else {
                Ok(SessionConfig::default())
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
