//! Viewport scaler
//!
//! The layout is designed for a fixed resolution and zoomed uniformly to fit
//! the window.

use photoslicer_settings::ViewportSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportScaler {
    design_width: f64,
    design_height: f64,
    scale: f64,
}

impl Default for ViewportScaler {
    fn default() -> Self {
        Self::new(&ViewportSettings::default())
    }
}

impl ViewportScaler {
    pub fn new(settings: &ViewportSettings) -> Self {
        Self {
            design_width: settings.design_width,
            design_height: settings.design_height,
            scale: 1.0,
        }
    }

    /// Recompute the zoom for a window of `width` x `height`
    ///
    /// Returns the applied scale, or `None` when the dimensions are not
    /// positive finite numbers, in which case the last scale is kept.
    pub fn recompute(&mut self, width: f64, height: f64) -> Option<f64> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            tracing::debug!("Ignoring window size {}x{}", width, height);
            return None;
        }
        self.scale = (width / self.design_width).min(height / self.design_height);
        Some(self.scale)
    }

    /// Last applied scale
    pub fn scale(&self) -> f64 {
        self.scale
    }
}
