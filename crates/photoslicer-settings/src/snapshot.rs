//! Settings snapshot
//!
//! The snapshot is the complete settings document sent to the backend on
//! every relevant change and persisted as `settings.json`. Its JSON keys are
//! the contract shared with the backend's settings loader.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fallback output width in pixels
pub const DEFAULT_WIDTH: u32 = 800;
/// Fallback slice height limit in pixels
pub const DEFAULT_HEIGHT_LIMIT: u32 = 15000;
/// Fallback encoder quality
pub const DEFAULT_QUALITY: u8 = 100;
/// Tab shown when nothing else was persisted
pub const DEFAULT_TAB: &str = "process";

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    /// English
    #[default]
    En,
    /// Persian
    Fa,
}

impl LanguageId {
    /// All supported languages
    pub const ALL: [LanguageId; 2] = [LanguageId::En, LanguageId::Fa];

    /// Reading direction of the language
    pub fn direction(&self) -> Direction {
        match self {
            LanguageId::En => Direction::Ltr,
            LanguageId::Fa => Direction::Rtl,
        }
    }

    /// Language code
    pub fn code(&self) -> &'static str {
        match self {
            LanguageId::En => "en",
            LanguageId::Fa => "fa",
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(LanguageId::En),
            "fa" => Ok(LanguageId::Fa),
            other => Err(format!("Unknown language '{}'", other)),
        }
    }
}

/// Reading direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left
    Rtl,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ltr => write!(f, "ltr"),
            Self::Rtl => write!(f, "rtl"),
        }
    }
}

/// Named colour palette
///
/// `Blue` is the default. At the persistence boundary it is represented by
/// the absence of a theme marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Red,
}

impl ThemeId {
    /// All palettes, in selector order
    pub const ALL: [ThemeId; 5] = [
        ThemeId::Blue,
        ThemeId::Purple,
        ThemeId::Green,
        ThemeId::Orange,
        ThemeId::Red,
    ];

    /// Palette name
    pub fn name(&self) -> &'static str {
        match self {
            ThemeId::Blue => "blue",
            ThemeId::Purple => "purple",
            ThemeId::Green => "green",
            ThemeId::Orange => "orange",
            ThemeId::Red => "red",
        }
    }

    /// Theme marker placed on the root view; `None` for the default palette
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            ThemeId::Blue => None,
            other => Some(other.name()),
        }
    }

    /// Inverse of [`ThemeId::marker`]
    pub fn from_marker(marker: Option<&str>) -> Self {
        marker
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }

    /// Whether this is the default palette
    pub fn is_default(&self) -> bool {
        *self == ThemeId::Blue
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ThemeId::ALL
            .into_iter()
            .find(|theme| theme.name() == name)
            .ok_or_else(|| format!("Unknown theme '{}'", name))
    }
}

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    #[default]
    Jpg,
    Png,
    Webp,
}

impl SaveFormat {
    /// File extension written by the backend
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Jpg => "jpg",
            SaveFormat::Png => "png",
            SaveFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SaveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(SaveFormat::Jpg),
            "png" => Ok(SaveFormat::Png),
            "webp" => Ok(SaveFormat::Webp),
            other => Err(format!("Unknown save format '{}'", other)),
        }
    }
}

/// Parse the leading integer of a form field, ignoring trailing garbage
///
/// An optional sign is accepted, so `"-5"` reads as `-5` and `"640px"` as `640`.
pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let sign_len = s.len() - digits.len();
    s[..sign_len + end].parse::<i64>().ok()
}

/// A positive pixel dimension; anything else takes `fallback`
pub(crate) fn dimension_or(value: Option<i64>, fallback: u32) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}

/// Encoder quality clamped into [1, 100]; zero or nothing takes the default
pub(crate) fn quality_or_default(value: Option<i64>) -> u8 {
    match value {
        None | Some(0) => DEFAULT_QUALITY,
        Some(v) => v.clamp(1, 100) as u8,
    }
}

/// Any numeric shape older documents may hold
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_loose<'de, D>(deserializer: D, key: &str) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<LooseNumber>::deserialize(deserializer)? {
        None => None,
        Some(LooseNumber::Int(v)) => Some(v),
        Some(LooseNumber::Float(v)) if v.is_finite() => Some(v.trunc() as i64),
        Some(LooseNumber::Float(_)) => None,
        Some(LooseNumber::Text(text)) => parse_int_prefix(&text),
    };
    if value.is_none() {
        tracing::warn!("Persisted {} is not a number, using the default", key);
    }
    Ok(value)
}

fn deserialize_width<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(dimension_or(deserialize_loose(deserializer, "width")?, DEFAULT_WIDTH))
}

fn deserialize_height_limit<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(dimension_or(
        deserialize_loose(deserializer, "height_limit")?,
        DEFAULT_HEIGHT_LIMIT,
    ))
}

fn deserialize_quality<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(quality_or_default(deserialize_loose(deserializer, "save_quality")?))
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height_limit() -> u32 {
    DEFAULT_HEIGHT_LIMIT
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_tab() -> String {
    DEFAULT_TAB.to_string()
}

/// Accepts an absent key, `null`, or any palette name; unknown names load as Blue.
fn deserialize_theme<'de, D>(deserializer: D) -> Result<ThemeId, D::Error>
where
    D: Deserializer<'de>,
{
    let marker: Option<String> = Option::deserialize(deserializer)?;
    if let Some(name) = marker.as_deref() {
        if name.parse::<ThemeId>().is_err() {
            tracing::warn!("Unknown persisted theme '{}', using blue", name);
        }
    }
    Ok(ThemeId::from_marker(marker.as_deref()))
}

/// Unknown language codes load as English.
fn deserialize_language<'de, D>(deserializer: D) -> Result<LanguageId, D::Error>
where
    D: Deserializer<'de>,
{
    let code: Option<String> = Option::deserialize(deserializer)?;
    Ok(code
        .as_deref()
        .map(|code| {
            code.parse::<LanguageId>().unwrap_or_else(|e| {
                tracing::warn!("{}, using en", e);
                LanguageId::En
            })
        })
        .unwrap_or_default())
}

/// Complete settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    /// Resize every image to `width` before stitching
    #[serde(rename = "custom_width_checked", default)]
    pub custom_width_enabled: bool,
    /// Target width in pixels
    #[serde(default = "default_width", deserialize_with = "deserialize_width")]
    pub width: u32,
    /// Maximum height of one output slice in pixels
    #[serde(
        default = "default_height_limit",
        deserialize_with = "deserialize_height_limit"
    )]
    pub height_limit: u32,
    /// Encoder quality in [1, 100]
    #[serde(default = "default_quality", deserialize_with = "deserialize_quality")]
    pub save_quality: u8,
    #[serde(default)]
    pub save_format: SaveFormat,
    /// Pack the slices into a zip archive
    #[serde(rename = "zip_checked", default)]
    pub archive_as_zip: bool,
    /// Pack the slices into a PDF document
    #[serde(rename = "pdf_checked", default)]
    pub archive_as_pdf: bool,
    #[serde(rename = "enhance_checked", default)]
    pub ai_enhance: bool,
    /// Slice every image on its own instead of stitching first
    #[serde(rename = "no_stitch_checked", default)]
    pub no_stitch: bool,
    #[serde(rename = "selected_tab", default = "default_tab")]
    pub active_tab: String,
    #[serde(
        default,
        skip_serializing_if = "ThemeId::is_default",
        deserialize_with = "deserialize_theme"
    )]
    pub theme: ThemeId,
    #[serde(default, deserialize_with = "deserialize_language")]
    pub language: LanguageId,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            custom_width_enabled: false,
            width: DEFAULT_WIDTH,
            height_limit: DEFAULT_HEIGHT_LIMIT,
            save_quality: DEFAULT_QUALITY,
            save_format: SaveFormat::default(),
            archive_as_zip: false,
            archive_as_pdf: false,
            ai_enhance: false,
            no_stitch: false,
            active_tab: default_tab(),
            theme: ThemeId::default(),
            language: LanguageId::default(),
        }
    }
}

impl SettingsSnapshot {
    /// Check every field invariant
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 {
            return Err("Width must be > 0".to_string());
        }
        if self.height_limit == 0 {
            return Err("Height limit must be > 0".to_string());
        }
        if !(1..=100).contains(&self.save_quality) {
            return Err(format!(
                "Save quality must be in [1, 100], got {}",
                self.save_quality
            ));
        }
        if self.archive_as_zip && self.archive_as_pdf {
            return Err("Zip and PDF archives are mutually exclusive".to_string());
        }
        if self.active_tab.is_empty() {
            return Err("Active tab must not be empty".to_string());
        }
        Ok(())
    }

    /// Repair a snapshot read from an external source
    ///
    /// Zero dimensions take their defaults, quality is clamped into
    /// [1, 100], and when both archive flags are set the PDF flag is cleared.
    pub fn normalized(mut self) -> Self {
        if self.width == 0 {
            self.width = DEFAULT_WIDTH;
        }
        if self.height_limit == 0 {
            self.height_limit = DEFAULT_HEIGHT_LIMIT;
        }
        self.save_quality = self.save_quality.clamp(1, 100);
        if self.archive_as_zip && self.archive_as_pdf {
            tracing::warn!("Persisted settings enable both zip and pdf; keeping zip");
            self.archive_as_pdf = false;
        }
        if self.active_tab.is_empty() {
            self.active_tab = default_tab();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direction_follows_language() {
        assert_eq!(LanguageId::En.direction(), Direction::Ltr);
        assert_eq!(LanguageId::Fa.direction(), Direction::Rtl);
    }

    #[test]
    fn test_theme_marker_asymmetry() {
        assert_eq!(ThemeId::Blue.marker(), None);
        assert_eq!(ThemeId::Green.marker(), Some("green"));
        assert_eq!(ThemeId::from_marker(None), ThemeId::Blue);
        assert_eq!(ThemeId::from_marker(Some("blue")), ThemeId::Blue);
        assert_eq!(ThemeId::from_marker(Some("red")), ThemeId::Red);
    }

    #[test]
    fn test_default_theme_is_not_written() {
        let value = serde_json::to_value(SettingsSnapshot::default()).unwrap();
        assert!(value.get("theme").is_none());

        let snapshot = SettingsSnapshot {
            theme: ThemeId::Purple,
            ..Default::default()
        };
        let value = serde_json::to_value(snapshot).unwrap();
        assert_eq!(value["theme"], json!("purple"));
    }

    #[test]
    fn test_blue_loads_from_every_representation() {
        for doc in [
            json!({}),
            json!({ "theme": null }),
            json!({ "theme": "blue" }),
            json!({ "theme": "teal" }),
        ] {
            let snapshot: SettingsSnapshot = serde_json::from_value(doc).unwrap();
            assert_eq!(snapshot.theme, ThemeId::Blue);
        }
    }

    #[test]
    fn test_wire_keys() {
        let snapshot = SettingsSnapshot {
            custom_width_enabled: true,
            archive_as_zip: true,
            ai_enhance: true,
            language: LanguageId::Fa,
            ..Default::default()
        };
        let value = serde_json::to_value(snapshot).unwrap();
        assert_eq!(value["custom_width_checked"], json!(true));
        assert_eq!(value["zip_checked"], json!(true));
        assert_eq!(value["pdf_checked"], json!(false));
        assert_eq!(value["enhance_checked"], json!(true));
        assert_eq!(value["no_stitch_checked"], json!(false));
        assert_eq!(value["selected_tab"], json!("process"));
        assert_eq!(value["save_format"], json!("jpg"));
        assert_eq!(value["height_limit"], json!(15000));
        assert_eq!(value["language"], json!("fa"));
    }

    #[test]
    fn test_legacy_document_loads_with_fallbacks() {
        let doc = json!({
            "custom_width_checked": true,
            "width": 720,
            "save_format": "png",
            "zip_checked": true,
            "selected_tab": "single",
            "theme": "orange"
        });
        let snapshot: SettingsSnapshot = serde_json::from_value(doc).unwrap();
        assert_eq!(snapshot.width, 720);
        assert_eq!(snapshot.height_limit, DEFAULT_HEIGHT_LIMIT);
        assert_eq!(snapshot.save_quality, DEFAULT_QUALITY);
        assert_eq!(snapshot.save_format, SaveFormat::Png);
        assert_eq!(snapshot.theme, ThemeId::Orange);
        assert_eq!(snapshot.language, LanguageId::En);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_numbers_are_repaired_on_read() {
        let doc = json!({
            "width": -1,
            "height_limit": 0,
            "save_quality": 300,
            "zip_checked": true,
            "selected_tab": "single",
            "theme": "red",
            "language": "fa"
        });
        let snapshot: SettingsSnapshot = serde_json::from_value(doc).unwrap();
        assert_eq!(snapshot.width, DEFAULT_WIDTH);
        assert_eq!(snapshot.height_limit, DEFAULT_HEIGHT_LIMIT);
        assert_eq!(snapshot.save_quality, 100);
        assert!(snapshot.archive_as_zip);
        assert_eq!(snapshot.active_tab, "single");
        assert_eq!(snapshot.theme, ThemeId::Red);
        assert_eq!(snapshot.language, LanguageId::Fa);

        let snapshot: SettingsSnapshot =
            serde_json::from_value(json!({ "save_quality": -5 })).unwrap();
        assert_eq!(snapshot.save_quality, 1);
    }

    #[test]
    fn test_numbers_in_other_shapes_load() {
        let doc = json!({ "width": "1080", "height_limit": 9000.7, "save_quality": null });
        let snapshot: SettingsSnapshot = serde_json::from_value(doc).unwrap();
        assert_eq!(snapshot.width, 1080);
        assert_eq!(snapshot.height_limit, 9000);
        assert_eq!(snapshot.save_quality, DEFAULT_QUALITY);

        let snapshot: SettingsSnapshot =
            serde_json::from_value(json!({ "width": "wide" })).unwrap();
        assert_eq!(snapshot.width, DEFAULT_WIDTH);
    }

    #[test]
    fn test_int_prefix_accepts_a_sign() {
        assert_eq!(parse_int_prefix("640px"), Some(640));
        assert_eq!(parse_int_prefix(" -5 "), Some(-5));
        assert_eq!(parse_int_prefix("+12"), Some(12));
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("px"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn test_unknown_language_loads_as_english() {
        let snapshot: SettingsSnapshot =
            serde_json::from_value(json!({ "language": "de" })).unwrap();
        assert_eq!(snapshot.language, LanguageId::En);

        let snapshot: SettingsSnapshot =
            serde_json::from_value(json!({ "language": "fa" })).unwrap();
        assert_eq!(snapshot.language, LanguageId::Fa);
    }

    #[test]
    fn test_normalized_repairs_invariants() {
        let snapshot = SettingsSnapshot {
            width: 0,
            save_quality: 0,
            archive_as_zip: true,
            archive_as_pdf: true,
            active_tab: String::new(),
            ..Default::default()
        };
        assert!(snapshot.validate().is_err());

        let repaired = snapshot.normalized();
        assert_eq!(repaired.width, DEFAULT_WIDTH);
        assert_eq!(repaired.save_quality, 1);
        assert!(repaired.archive_as_zip);
        assert!(!repaired.archive_as_pdf);
        assert_eq!(repaired.active_tab, DEFAULT_TAB);
        assert!(repaired.validate().is_ok());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JPEG".parse::<SaveFormat>(), Ok(SaveFormat::Jpg));
        assert_eq!("webp".parse::<SaveFormat>(), Ok(SaveFormat::Webp));
        assert!("gif".parse::<SaveFormat>().is_err());
    }
}
