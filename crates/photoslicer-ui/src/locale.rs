//! Locale and reading direction
//!
//! Static translation tables per language and the controller that owns the
//! current language and every text node tagged with a translation key.

use once_cell::sync::Lazy;
use photoslicer_settings::{Direction, LanguageId};
use serde::Serialize;
use std::collections::HashMap;

type Table = HashMap<&'static str, &'static str>;

static EN: Lazy<Table> = Lazy::new(|| {
    HashMap::from([
        ("app.title", "PhotoSlicer"),
        ("tab.process", "Multi Folder"),
        ("tab.single", "Single Folder"),
        ("tab.settings", "Settings"),
        ("label.directory", "Directory"),
        ("label.custom_width", "Custom width"),
        ("label.width", "Width"),
        ("label.height_limit", "Height limit"),
        ("label.quality", "Quality"),
        ("label.format", "Format"),
        ("label.zip", "Save as ZIP"),
        ("label.pdf", "Save as PDF"),
        ("label.enhance", "AI enhance"),
        ("label.no_stitch", "Slice without stitching"),
        ("label.theme", "Theme"),
        ("label.language", "Language"),
        ("label.elapsed", "Elapsed"),
        ("button.browse", "Browse"),
        ("button.open_result", "Open output folder"),
        ("action.initiate", "INITIATE"),
        ("action.pause", "PAUSE"),
        ("action.resume", "RESUME"),
        ("action.processing", "PROCESSING"),
        ("status.idle", "Idle"),
        ("status.processing", "Processing..."),
        ("status.paused", "Paused"),
        ("status.done", "Done! Idle."),
        ("toast.success_title", "Success"),
        ("toast.error_title", "Error"),
        ("error.no_directory", "Please select a directory first."),
        ("error.not_a_directory", "The selected path is not a directory."),
        ("error.bridge_timeout", "The application did not respond in time."),
        ("error.bridge_failed", "The operation failed."),
        ("error.settings_not_saved", "Settings could not be saved."),
    ])
});

static FA: Lazy<Table> = Lazy::new(|| {
    HashMap::from([
        ("app.title", "فوتواسلایسر"),
        ("tab.process", "چند پوشه"),
        ("tab.single", "تک پوشه"),
        ("tab.settings", "تنظیمات"),
        ("label.directory", "پوشه"),
        ("label.custom_width", "عرض دلخواه"),
        ("label.width", "عرض"),
        ("label.height_limit", "حداکثر ارتفاع"),
        ("label.quality", "کیفیت"),
        ("label.format", "فرمت"),
        ("label.zip", "ذخیره به صورت ZIP"),
        ("label.pdf", "ذخیره به صورت PDF"),
        ("label.enhance", "بهبود کیفیت"),
        ("label.theme", "پوسته"),
        ("label.language", "زبان"),
        ("button.browse", "انتخاب"),
        ("button.open_result", "باز کردن پوشه خروجی"),
        ("action.initiate", "شروع"),
        ("action.pause", "توقف"),
        ("action.resume", "ادامه"),
        ("action.processing", "در حال پردازش"),
        ("status.idle", "آماده"),
        ("status.processing", "در حال پردازش..."),
        ("status.paused", "متوقف شد"),
        ("status.done", "انجام شد!"),
        ("toast.success_title", "موفق"),
        ("toast.error_title", "خطا"),
        ("error.no_directory", "لطفاً ابتدا یک پوشه انتخاب کنید."),
        ("error.not_a_directory", "مسیر انتخاب شده پوشه نیست."),
        ("error.bridge_timeout", "برنامه به موقع پاسخ نداد."),
        ("error.bridge_failed", "عملیات با خطا مواجه شد."),
        ("error.settings_not_saved", "ذخیره تنظیمات انجام نشد."),
    ])
});

/// Keys of the text nodes present in the main view
pub const VIEW_TEXT_KEYS: &[&str] = &[
    "app.title",
    "tab.process",
    "tab.single",
    "tab.settings",
    "label.directory",
    "label.custom_width",
    "label.width",
    "label.height_limit",
    "label.quality",
    "label.format",
    "label.zip",
    "label.pdf",
    "label.enhance",
    "label.no_stitch",
    "label.theme",
    "label.language",
    "label.elapsed",
    "button.browse",
    "button.open_result",
];

fn table(language: LanguageId) -> &'static Table {
    match language {
        LanguageId::En => &*EN,
        LanguageId::Fa => &*FA,
    }
}

/// Look up `key` in the table of `language`
///
/// Returns `None` when the table has no entry for the key.
pub fn translate(language: LanguageId, key: &str) -> Option<&'static str> {
    table(language).get(key).copied()
}

/// Like [`translate`], falling back to English and then to the key itself
pub fn translate_or_key(language: LanguageId, key: &str) -> String {
    translate(language, key)
        .or_else(|| translate(LanguageId::En, key))
        .unwrap_or(key)
        .to_string()
}

/// A piece of view text tagged with a translation key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
    pub key: String,
    pub text: String,
}

/// Owns the current language and the tagged text nodes
#[derive(Debug, Clone)]
pub struct LocaleController {
    language: LanguageId,
    nodes: Vec<TextNode>,
}

impl Default for LocaleController {
    fn default() -> Self {
        Self::new(LanguageId::default())
    }
}

impl LocaleController {
    /// Create a controller with every view node tagged and rendered
    pub fn new(language: LanguageId) -> Self {
        let mut controller = Self {
            language,
            nodes: Vec::with_capacity(VIEW_TEXT_KEYS.len()),
        };
        for key in VIEW_TEXT_KEYS {
            controller.tag(*key, translate_or_key(LanguageId::En, key));
        }
        controller.render();
        controller
    }

    /// Tag a text node with a translation key
    pub fn tag(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let mut node = TextNode {
            key: key.into(),
            text: text.into(),
        };
        if let Some(text) = translate(self.language, &node.key) {
            node.text = text.to_string();
        }
        self.nodes.push(node);
    }

    /// Switch language and re-render every tagged node
    ///
    /// Nodes whose key is missing from the new table keep their text.
    /// Returns the derived reading direction.
    pub fn set_language(&mut self, language: LanguageId) -> Direction {
        if language != self.language {
            tracing::info!("Language {} -> {}", self.language, language);
        }
        self.language = language;
        self.render();
        self.direction()
    }

    /// Re-apply the current table to every tagged node
    pub fn render(&mut self) {
        for node in &mut self.nodes {
            if let Some(text) = translate(self.language, &node.key) {
                node.text = text.to_string();
            }
        }
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Reading direction of the current language
    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    /// Localized text for `key`, falling back to English
    pub fn message(&self, key: &str) -> String {
        translate_or_key(self.language, key)
    }

    pub fn nodes(&self) -> &[TextNode] {
        &self.nodes
    }

    /// Rendered text of the first node tagged with `key`
    pub fn node_text(&self, key: &str) -> Option<&str> {
        self.nodes
            .iter()
            .find(|node| node.key == key)
            .map(|node| node.text.as_str())
    }
}
