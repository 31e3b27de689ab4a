//! Settings errors
//!
//! File errors carry the path they concern so a warning in the log names
//! the file to fix.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Cannot write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl SettingsError {
    /// Adapter for `map_err` on file operations against `path`
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> SettingsError + '_ {
        move |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Session configuration problems
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unsupported config format '{0}', expected .toml or .json")]
    UnsupportedFormat(String),

    #[error("Config value {key} = {value} is out of range")]
    ValueOutOfRange { key: &'static str, value: String },

    #[error("No configuration directory on this platform ({0})")]
    NoConfigDir(&'static str),
}

/// Settings snapshot problems
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// The snapshot breaks an invariant that cannot be repaired
    #[error("Settings snapshot is invalid: {0}")]
    Invalid(String),

    #[error("Settings document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_the_file() {
        let err = std::fs::read_to_string("/nonexistent/settings.json")
            .map_err(SettingsError::io(Path::new("/nonexistent/settings.json")))
            .unwrap_err();
        assert!(err.to_string().starts_with("Cannot access /nonexistent/settings.json: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_wrapped_errors_display_transparently() {
        let err: SettingsError = ConfigError::ValueOutOfRange {
            key: "bridge.timeout_ms",
            value: "0".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Config value bridge.timeout_ms = 0 is out of range");

        let err: SettingsError = PersistenceError::NotAnObject("an array").into();
        assert!(matches!(err, SettingsError::Persistence(_)));
        assert_eq!(
            err.to_string(),
            "Settings document must be a JSON object, found an array"
        );
    }
}
