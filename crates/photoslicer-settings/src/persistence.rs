//! Settings Persistence
//!
//! Loads and saves the settings snapshot document. Documents written by older
//! versions (missing keys, explicit `"blue"` theme, out-of-range numbers,
//! both archive flags set) are accepted and repaired on load.

use crate::error::{PersistenceError, SettingsError, SettingsResult};
use crate::snapshot::SettingsSnapshot;
use std::path::Path;

/// Settings persistence layer
#[derive(Debug, Clone, Default)]
pub struct SettingsPersistence {
    snapshot: SettingsSnapshot,
}

impl SettingsPersistence {
    /// Create new persistence layer holding the default snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing snapshot
    pub fn with_snapshot(snapshot: SettingsSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load settings from file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(SettingsError::io(path))?;
        let persistence = Self::from_json(&content)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(persistence)
    }

    /// Parse a settings document
    pub fn from_json(content: &str) -> SettingsResult<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(PersistenceError::NotAnObject(json_kind(&value)).into());
        }
        let snapshot: SettingsSnapshot = serde_json::from_value(value)?;
        Ok(Self {
            snapshot: snapshot.normalized(),
        })
    }

    /// Serialize the snapshot as a settings document
    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot)?)
    }

    /// Save settings to file
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(SettingsError::io(parent))?;
            }
        }
        std::fs::write(path, self.to_json()?).map_err(SettingsError::io(path))?;
        Ok(())
    }

    /// Get reference to the snapshot
    pub fn snapshot(&self) -> &SettingsSnapshot {
        &self.snapshot
    }

    /// Replace the snapshot (last write wins)
    pub fn replace(&mut self, snapshot: SettingsSnapshot) {
        self.snapshot = snapshot;
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        self.snapshot
            .validate()
            .map_err(|reason| PersistenceError::Invalid(reason).into())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{LanguageId, ThemeId, DEFAULT_QUALITY, DEFAULT_WIDTH};

    #[test]
    fn test_rejects_non_object_documents() {
        let err = SettingsPersistence::from_json("[1, 2]").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Persistence(PersistenceError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_repairs_conflicting_archive_flags() {
        let persistence =
            SettingsPersistence::from_json(r#"{"zip_checked": true, "pdf_checked": true}"#)
                .unwrap();
        assert!(persistence.snapshot().archive_as_zip);
        assert!(!persistence.snapshot().archive_as_pdf);
    }

    #[test]
    fn test_out_of_range_numbers_keep_the_rest_of_the_document() {
        let cases = [
            (r#""width": -1"#, DEFAULT_WIDTH, DEFAULT_QUALITY),
            (r#""save_quality": 300"#, DEFAULT_WIDTH, 100),
            (r#""save_quality": -5"#, DEFAULT_WIDTH, 1),
        ];
        for (field, width, quality) in cases {
            let content = format!(
                r#"{{{}, "zip_checked": true, "selected_tab": "single", "theme": "red", "language": "fa"}}"#,
                field
            );
            let persistence = SettingsPersistence::from_json(&content).unwrap();
            let snapshot = persistence.snapshot();
            assert_eq!(snapshot.width, width, "{}", field);
            assert_eq!(snapshot.save_quality, quality, "{}", field);
            assert!(snapshot.archive_as_zip);
            assert_eq!(snapshot.active_tab, "single");
            assert_eq!(snapshot.theme, ThemeId::Red);
            assert_eq!(snapshot.language, LanguageId::Fa);
            assert!(persistence.validate().is_ok());
        }
    }

    #[test]
    fn test_refuses_to_save_invalid_snapshot() {
        let persistence = SettingsPersistence::with_snapshot(SettingsSnapshot {
            save_quality: 0,
            ..Default::default()
        });
        let dir = tempfile::tempdir().unwrap();
        let err = persistence
            .save_to_file(&dir.path().join("settings.json"))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Persistence(PersistenceError::Invalid(_))
        ));
    }

    #[test]
    fn test_replace_is_last_write_wins() {
        let mut persistence = SettingsPersistence::new();
        persistence.replace(SettingsSnapshot {
            theme: ThemeId::Red,
            ..Default::default()
        });
        persistence.replace(SettingsSnapshot {
            theme: ThemeId::Green,
            ..Default::default()
        });
        assert_eq!(persistence.snapshot().theme, ThemeId::Green);
    }
}
