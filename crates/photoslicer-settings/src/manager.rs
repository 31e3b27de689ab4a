//! Settings Manager
//!
//! Resolves the platform config directory and loads the session config and
//! the persisted settings snapshot, falling back to defaults when a file is
//! missing or unreadable.

use crate::config::SessionConfig;
use crate::error::{ConfigError, SettingsError, SettingsResult};
use crate::persistence::SettingsPersistence;
use crate::snapshot::SettingsSnapshot;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "photoslicer";
const CONFIG_FILE: &str = "session.toml";
const SETTINGS_FILE: &str = "settings.json";

/// Locates and loads configuration files
pub struct SettingsManager;

impl SettingsManager {
    /// Platform config directory for PhotoSlicer
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                ConfigError::NoConfigDir(std::env::consts::OS).into()
            })
    }

    /// Path of the session config file
    pub fn config_file_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Path of the persisted settings snapshot
    pub fn settings_file_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(SETTINGS_FILE))
    }

    /// Create the config directory if needed
    pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir).map_err(SettingsError::io(&dir))?;
        Ok(dir)
    }

    /// Load the session config, using defaults when the file is absent or invalid
    pub fn load_session_config(path: &Path) -> SessionConfig {
        if !path.exists() {
            return SessionConfig::default();
        }
        SessionConfig::load_from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {}: {}; using defaults", path.display(), e);
            SessionConfig::default()
        })
    }

    /// Load the persisted snapshot, if one exists and parses
    pub fn load_snapshot(path: &Path) -> Option<SettingsSnapshot> {
        if !path.exists() {
            return None;
        }
        match SettingsPersistence::load_from_file(path) {
            Ok(persistence) => Some(persistence.snapshot().clone()),
            Err(e) => {
                tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
                None
            }
        }
    }
}
