//! Session configuration for PhotoSlicer
//!
//! Tunables of the coordination layer, stored as JSON or TOML in the
//! platform config directory. Configuration is organized into sections:
//! - Bridge settings (backend call timeout)
//! - Clock policy (behaviour while a job is paused)
//! - Viewport design resolution
//! - Notification display

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backend bridge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Time limit for backend calls in milliseconds; the folder picker and
    /// window close wait on the operator and are not limited
    pub timeout_ms: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

/// Elapsed-time clock policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Stop the clock while a job is paused and continue on resume
    pub pauses_with_job: bool,
}

/// Viewport scaling reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Width the layout was designed for, in pixels
    pub design_width: f64,
    /// Height the layout was designed for, in pixels
    pub design_height: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            design_width: 520.0,
            design_height: 810.0,
        }
    }
}

/// Screen corner used for toasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Notification display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// How long a toast stays visible in milliseconds
    pub duration_ms: u64,
    /// Maximum number of toasts visible at once
    pub max_opened: usize,
    pub position: ToastPosition,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            duration_ms: 2500,
            max_opened: 2,
            position: ToastPosition::TopLeft,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub bridge: BridgeSettings,
    pub clock: ClockSettings,
    pub viewport: ViewportSettings,
    pub notifications: NotificationSettings,
}

impl SessionConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(SettingsError::io(path))?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                )
                .into())
            }
        };

        config.validate()?;
        tracing::debug!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                )
                .into())
            }
        };

        std::fs::write(path, content).map_err(SettingsError::io(path))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bridge.timeout_ms == 0 {
            return Err(out_of_range("bridge.timeout_ms", self.bridge.timeout_ms));
        }

        let viewport = &self.viewport;
        if !(viewport.design_width.is_finite() && viewport.design_width > 0.0) {
            return Err(out_of_range("viewport.design_width", viewport.design_width));
        }
        if !(viewport.design_height.is_finite() && viewport.design_height > 0.0) {
            return Err(out_of_range(
                "viewport.design_height",
                viewport.design_height,
            ));
        }

        if self.notifications.max_opened == 0 {
            return Err(out_of_range(
                "notifications.max_opened",
                self.notifications.max_opened,
            ));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn out_of_range(key: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key,
        value: value.to_string(),
    }
}
