//! Observable view state
//!
//! A plain projection of everything the operator can see, assembled from the
//! session's controllers. Hosts render it; tests assert on it.

use crate::job::ActionIcon;
use crate::locale::TextNode;
use crate::notifications::Toast;
use photoslicer_core::JobState;
use photoslicer_settings::{Direction, LanguageId};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub language: LanguageId,
    pub direction: Direction,
    pub text_nodes: Vec<TextNode>,
    /// Theme marker on the root view; absent for the default palette
    pub theme_marker: Option<&'static str>,
    /// Style class of the active theme selector
    pub active_theme_selector: Option<String>,
    pub job_state: JobState,
    pub action_icon: ActionIcon,
    pub action_label: String,
    pub action_enabled: bool,
    pub status_line: String,
    pub timer_text: String,
    pub timer_visible: bool,
    /// Output location bound to the "open result" control; hidden when `None`
    pub open_result: Option<PathBuf>,
    pub progress: f32,
    pub source: String,
    pub active_tab: String,
    pub zoom: f64,
    pub toasts: Vec<Toast>,
}

impl ViewState {
    /// Rendered text of the node tagged with `key`
    pub fn text(&self, key: &str) -> Option<&str> {
        self.text_nodes
            .iter()
            .find(|node| node.key == key)
            .map(|node| node.text.as_str())
    }

    /// Pretty JSON rendering, used by text hosts
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
