//! Viewport sizing.
//!
//! The viewport is the crop rectangle, centred in the view, whose aspect
//! ratio comes from the configuration (or from the source image when the
//! configured ratio is zero). It is as large as the view allows once the
//! overlay padding is removed from the constraining axis.

use crate::config::CropConfig;
use serde::{Deserialize, Serialize};

/// Viewport dimensions in view pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-sized viewport means there is no image to crop yet.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Ratio actually used for the viewport: the configured one, or the source
/// aspect ratio when the configured ratio is zero.
///
/// Returns `None` when the ratio would come from an image that has no size.
pub fn effective_ratio(source_width: u32, source_height: u32, config: &CropConfig) -> Option<f32> {
    let configured = config.viewport_ratio();
    if configured != 0.0 {
        return Some(configured);
    }
    if source_width == 0 || source_height == 0 {
        return None;
    }
    Some(source_width as f32 / source_height as f32)
}

/// Compute viewport dimensions for a source image shown in a view of the
/// given size.
///
/// # Arguments
///
/// * `source_width`, `source_height` - Source image size; `0` means no image
/// * `available_width`, `available_height` - View size
/// * `config` - Supplies the viewport ratio and overlay padding
///
/// # Returns
///
/// The viewport size, or `0x0` when there is no image.
pub fn compute_viewport(
    source_width: u32,
    source_height: u32,
    available_width: u32,
    available_height: u32,
    config: &CropConfig,
) -> Viewport {
    if source_width == 0 || source_height == 0 {
        return Viewport::default();
    }
    let Some(ratio) = effective_ratio(source_width, source_height, config) else {
        return Viewport::default();
    };

    let view_aspect = available_width as f32 / available_height as f32;
    let padding = config.overlay_padding().saturating_mul(2);

    if ratio > view_aspect {
        // Viewport is wider than the view: width constrains.
        let width = available_width.saturating_sub(padding);
        let height = (width as f32 * (1.0 / ratio)) as u32;
        Viewport::new(width, height)
    } else {
        // Viewport is taller than the view: height constrains.
        let height = available_height.saturating_sub(padding);
        let width = (height as f32 * ratio) as u32;
        Viewport::new(width, height)
    }
}
