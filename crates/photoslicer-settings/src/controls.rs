//! Control panel
//!
//! Holds the current value of every settings-bearing control exactly as the
//! operator left it (numeric fields keep their raw text), plus the active tab
//! and the source folder field. Snapshots are derived from it on demand and
//! never cached.

use crate::snapshot::{
    dimension_or, parse_int_prefix, quality_or_default, LanguageId, SaveFormat, SettingsSnapshot,
    ThemeId, DEFAULT_HEIGHT_LIMIT, DEFAULT_TAB, DEFAULT_WIDTH,
};

/// A change event raised by one control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlChange {
    CustomWidth(bool),
    Width(String),
    HeightLimit(String),
    Quality(String),
    Format(String),
    Zip(bool),
    Pdf(bool),
    Enhance(bool),
    NoStitch(bool),
}

/// Current values of the settings form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    custom_width: bool,
    width: String,
    height_limit: String,
    quality: String,
    format: String,
    zip: bool,
    pdf: bool,
    enhance: bool,
    no_stitch: bool,
    active_tab: String,
    source: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        let mut panel = Self {
            custom_width: false,
            width: String::new(),
            height_limit: String::new(),
            quality: String::new(),
            format: String::new(),
            zip: false,
            pdf: false,
            enhance: false,
            no_stitch: false,
            active_tab: DEFAULT_TAB.to_string(),
            source: String::new(),
        };
        panel.load(&SettingsSnapshot::default());
        panel
    }
}

impl ControlPanel {
    /// Create a panel showing the default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one control change
    ///
    /// Checking the zip box unchecks the PDF box and vice versa, before any
    /// snapshot can observe both.
    pub fn apply(&mut self, change: ControlChange) {
        match change {
            ControlChange::CustomWidth(checked) => self.custom_width = checked,
            ControlChange::Width(text) => self.width = text,
            ControlChange::HeightLimit(text) => self.height_limit = text,
            ControlChange::Quality(text) => self.quality = text,
            ControlChange::Format(text) => self.format = text,
            ControlChange::Zip(checked) => {
                self.zip = checked;
                if checked {
                    self.pdf = false;
                }
            }
            ControlChange::Pdf(checked) => {
                self.pdf = checked;
                if checked {
                    self.zip = false;
                }
            }
            ControlChange::Enhance(checked) => self.enhance = checked,
            ControlChange::NoStitch(checked) => self.no_stitch = checked,
        }
    }

    /// Derive the complete snapshot from the current control values
    ///
    /// Unparsable or non-positive dimensions fall back to their defaults. A
    /// blank or zero quality takes the default, any other is clamped into
    /// [1, 100]. Reads only; calling it twice yields equal snapshots.
    pub fn build_snapshot(&self, theme: ThemeId, language: LanguageId) -> SettingsSnapshot {
        SettingsSnapshot {
            custom_width_enabled: self.custom_width,
            width: dimension_or(parse_int_prefix(&self.width), DEFAULT_WIDTH),
            height_limit: dimension_or(parse_int_prefix(&self.height_limit), DEFAULT_HEIGHT_LIMIT),
            save_quality: quality_or_default(parse_int_prefix(&self.quality)),
            save_format: self.format.parse::<SaveFormat>().unwrap_or_default(),
            archive_as_zip: self.zip,
            archive_as_pdf: self.pdf && !self.zip,
            ai_enhance: self.enhance,
            no_stitch: self.no_stitch,
            active_tab: if self.active_tab.is_empty() {
                DEFAULT_TAB.to_string()
            } else {
                self.active_tab.clone()
            },
            theme,
            language,
        }
    }

    /// Write every snapshot field back into the controls
    ///
    /// Theme and language belong to their own controllers and are applied by
    /// the caller.
    pub fn load(&mut self, snapshot: &SettingsSnapshot) {
        self.custom_width = snapshot.custom_width_enabled;
        self.width = snapshot.width.to_string();
        self.height_limit = snapshot.height_limit.to_string();
        self.quality = snapshot.save_quality.to_string();
        self.format = snapshot.save_format.to_string();
        self.zip = snapshot.archive_as_zip;
        self.pdf = snapshot.archive_as_pdf && !snapshot.archive_as_zip;
        self.enhance = snapshot.ai_enhance;
        self.no_stitch = snapshot.no_stitch;
        self.active_tab = snapshot.active_tab.clone();
    }

    /// Select a tab
    pub fn set_active_tab(&mut self, tab: impl Into<String>) {
        self.active_tab = tab.into();
    }

    /// Identifier of the active tab
    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    /// Replace the source folder field
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Raw content of the source folder field
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the zip box is checked
    pub fn zip_checked(&self) -> bool {
        self.zip
    }

    /// Whether the PDF box is checked
    pub fn pdf_checked(&self) -> bool {
        self.pdf
    }
}
