//! Theme controller
//!
//! Owns the current palette and the row of theme selectors. Exactly one
//! selector is active at any time.

use photoslicer_settings::ThemeId;
use serde::Serialize;

/// One palette selector dot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSelector {
    pub theme: ThemeId,
    pub active: bool,
}

impl ThemeSelector {
    /// Style class identifying the selector
    pub fn class_name(&self) -> String {
        format!("dot-{}", self.theme.name())
    }
}

#[derive(Debug, Clone)]
pub struct ThemeController {
    theme: ThemeId,
    selectors: Vec<ThemeSelector>,
}

impl Default for ThemeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeController {
    pub fn new() -> Self {
        let mut controller = Self {
            theme: ThemeId::default(),
            selectors: ThemeId::ALL
                .into_iter()
                .map(|theme| ThemeSelector {
                    theme,
                    active: false,
                })
                .collect(),
        };
        controller.set_theme(ThemeId::default());
        controller
    }

    /// Apply a palette and mark its selector active
    ///
    /// Returns `true` when the palette changed.
    pub fn set_theme(&mut self, theme: ThemeId) -> bool {
        let changed = theme != self.theme;
        self.theme = theme;
        for selector in &mut self.selectors {
            selector.active = selector.theme == theme;
        }
        if changed {
            tracing::info!("Theme -> {}", theme);
        }
        changed
    }

    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    /// Marker placed on the root view; cleared for the default palette
    pub fn marker(&self) -> Option<&'static str> {
        self.theme.marker()
    }

    pub fn selectors(&self) -> &[ThemeSelector] {
        &self.selectors
    }

    pub fn active_selector(&self) -> Option<&ThemeSelector> {
        self.selectors.iter().find(|selector| selector.active)
    }
}
