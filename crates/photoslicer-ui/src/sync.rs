//! Settings synchronizer
//!
//! Derives the canonical settings snapshot from the control panel and the
//! locale and theme controllers, and numbers every commit so outcomes can be
//! matched to the snapshot they carried.

use crate::locale::LocaleController;
use crate::theme::ThemeController;
use photoslicer_settings::{ControlChange, ControlPanel, SettingsSnapshot};

/// A snapshot ready to be sent to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sequence: u64,
    pub snapshot: SettingsSnapshot,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsSynchronizer {
    panel: ControlPanel,
    sequence: u64,
}

impl SettingsSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a control change; archive exclusion is enforced before returning
    pub fn apply(&mut self, change: ControlChange) {
        self.panel.apply(change);
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ControlPanel {
        &mut self.panel
    }

    /// Build the complete snapshot without side effects
    pub fn build_snapshot(
        &self,
        theme: &ThemeController,
        locale: &LocaleController,
    ) -> SettingsSnapshot {
        self.panel.build_snapshot(theme.theme(), locale.language())
    }

    /// Build a snapshot and assign it the next sequence number
    pub fn commit(&mut self, theme: &ThemeController, locale: &LocaleController) -> Commit {
        self.sequence += 1;
        let snapshot = self.build_snapshot(theme, locale);
        tracing::debug!("Settings commit #{}: {:?}", self.sequence, snapshot);
        Commit {
            sequence: self.sequence,
            snapshot,
        }
    }

    /// Write a snapshot back into the controls, the theme and the locale
    pub fn load(
        &mut self,
        snapshot: &SettingsSnapshot,
        theme: &mut ThemeController,
        locale: &mut LocaleController,
    ) {
        let snapshot = snapshot.clone().normalized();
        self.panel.load(&snapshot);
        theme.set_theme(snapshot.theme);
        locale.set_language(snapshot.language);
    }

    /// Number of the last commit
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}
