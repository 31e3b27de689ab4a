//! PhotoSlicer Settings Crate
//!
//! Handles the settings snapshot, the control panel it is derived from,
//! session configuration, and persistence.

pub mod config;
pub mod controls;
pub mod error;
pub mod manager;
pub mod persistence;
pub mod snapshot;

pub use config::{
    BridgeSettings, ClockSettings, NotificationSettings, SessionConfig, ToastPosition,
    ViewportSettings,
};
pub use controls::{ControlChange, ControlPanel};
pub use error::{ConfigError, PersistenceError, SettingsError, SettingsResult};
pub use manager::SettingsManager;
pub use persistence::SettingsPersistence;
pub use snapshot::{Direction, LanguageId, SaveFormat, SettingsSnapshot, ThemeId};
