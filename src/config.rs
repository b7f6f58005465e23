//! Launcher configuration.
//!
//! Defaults are derived from the process environment (the code search path
//! plays the role the JVM class path plays for the original launcher); an
//! optional JSON file overrides them.

use crate::constants::{APP_PATH_ENV, CONFIG_DIR, CONFIG_FILE, RESOURCE_ROOT_ENV, WARMUP_DELAY};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Bring-up configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Root of the bundled resource tree holding native artifacts.
    pub resource_root: PathBuf,
    /// Locations application code is resolved from, in order.
    pub code_search_path: Vec<PathBuf>,
    /// File name of the application library on the code search path.
    pub app_library: String,
    /// Throttle before a background warm-up constructs the next instance.
    pub warmup_delay_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resource_root: default_resource_root(),
            code_search_path: default_code_search_path(),
            app_library: default_app_library(),
            warmup_delay_ms: WARMUP_DELAY.as_millis() as u64,
        }
    }
}

impl BootstrapConfig {
    /// Loads the configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from(&path)
        } else {
            debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads the configuration from a specific JSON file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Returns the default configuration file path
    /// (`~/.warmstart/config.json`).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    /// The warm-up throttle as a [`Duration`].
    pub fn warmup_delay(&self) -> Duration {
        Duration::from_millis(self.warmup_delay_ms)
    }
}

fn default_resource_root() -> PathBuf {
    if let Some(root) = std::env::var_os(RESOURCE_ROOT_ENV) {
        return PathBuf::from(root);
    }
    exe_dir()
}

fn default_code_search_path() -> Vec<PathBuf> {
    match std::env::var_os(APP_PATH_ENV) {
        Some(path) => std::env::split_paths(&path).collect(),
        None => vec![exe_dir()],
    }
}

/// Platform-decorated default application library name
/// (`libeditor.so` / `libeditor.dylib` / `editor.dll`).
fn default_app_library() -> String {
    format!(
        "{}editor{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    )
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_warmup_delay_matches_constant() {
        let config = BootstrapConfig::default();
        assert_eq!(config.warmup_delay(), WARMUP_DELAY);
    }

    #[test]
    fn test_default_app_library_is_platform_decorated() {
        let name = default_app_library();
        assert!(name.contains("editor"));
    }
}
