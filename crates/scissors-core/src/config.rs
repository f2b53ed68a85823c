//! Tunable parameters of a crop view.
//!
//! A [`CropConfig`] can be built in code, deserialized from any serde format,
//! or read from a TOML file:
//!
//! ```toml
//! viewport_ratio = 1.7777
//! max_scale = 8.0
//! overlay_padding = 16
//! shape = "oval"
//! mode = "animated"
//! ```
//!
//! Every setter sanitises its input, and values read from a document go
//! through the same setters, so a config never holds a non-positive scale
//! bound or a negative ratio.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default viewport aspect ratio (square).
pub const DEFAULT_VIEWPORT_RATIO: f32 = 1.0;
/// Default maximum zoom factor.
pub const DEFAULT_MAXIMUM_SCALE: f32 = 10.0;
/// Default minimum zoom floor. The cover scale of the loaded image is
/// almost always larger.
pub const DEFAULT_MINIMUM_SCALE: f32 = 0.001;
/// Default export quality.
pub const DEFAULT_IMAGE_QUALITY: u8 = 100;
/// Black with 200 alpha, as `0xAARRGGBB`.
pub const DEFAULT_OVERLAY_COLOR: u32 = 0xC800_0000;
/// Opaque red, as `0xAARRGGBB`.
pub const DEFAULT_BORDER_COLOR: u32 = 0xFFFF_0000;

/// Errors raised while reading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid TOML or has mistyped fields.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Shape of the viewport overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangle,
    Oval,
}

/// Which touch strategy drives the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Raw multi-pointer tracking: drag and pinch, containment on release.
    #[default]
    Tracker,
    /// Gesture detection with fling and double-tap animations.
    Animated,
}

/// Crop view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    viewport_ratio: f32,
    min_scale: f32,
    max_scale: f32,
    overlay_padding: u32,
    overlay_color: u32,
    border_color: u32,
    shape: Shape,
    mode: EngineMode,
    image_quality: u8,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            viewport_ratio: DEFAULT_VIEWPORT_RATIO,
            min_scale: DEFAULT_MINIMUM_SCALE,
            max_scale: DEFAULT_MAXIMUM_SCALE,
            overlay_padding: 0,
            overlay_color: DEFAULT_OVERLAY_COLOR,
            border_color: DEFAULT_BORDER_COLOR,
            shape: Shape::Rectangle,
            mode: EngineMode::Tracker,
            image_quality: DEFAULT_IMAGE_QUALITY,
        }
    }
}

impl CropConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let parsed: CropConfig = toml::from_str(document)?;
        Ok(parsed.sanitized())
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    /// Re-apply every setter so deserialized values obey the same rules as
    /// values set in code.
    pub fn sanitized(mut self) -> Self {
        let Self {
            viewport_ratio,
            min_scale,
            max_scale,
            image_quality,
            ..
        } = self;
        self.set_viewport_ratio(viewport_ratio);
        self.set_min_scale(min_scale);
        self.set_max_scale(max_scale);
        self.set_image_quality(image_quality);
        self
    }

    /// Configured viewport ratio; `0.0` means "match the source image".
    pub fn viewport_ratio(&self) -> f32 {
        self.viewport_ratio
    }

    /// Set the viewport ratio. Zero is kept (match source); negative or
    /// non-finite values fall back to [`DEFAULT_VIEWPORT_RATIO`].
    pub fn set_viewport_ratio(&mut self, ratio: f32) {
        self.viewport_ratio = if ratio == 0.0 {
            0.0
        } else if !ratio.is_finite() || ratio < 0.0 {
            DEFAULT_VIEWPORT_RATIO
        } else {
            ratio
        };
    }

    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    /// Set the minimum zoom floor; non-positive values reset to the default.
    ///
    /// A floor above the current maximum raises the maximum with it.
    pub fn set_min_scale(&mut self, scale: f32) {
        self.min_scale = positive_or(scale, DEFAULT_MINIMUM_SCALE);
        self.max_scale = self.max_scale.max(self.min_scale);
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    /// Set the maximum zoom; non-positive values reset to the default.
    /// The maximum never drops below [`min_scale`](Self::min_scale).
    pub fn set_max_scale(&mut self, scale: f32) {
        self.max_scale = positive_or(scale, DEFAULT_MAXIMUM_SCALE).max(self.min_scale);
    }

    pub fn overlay_padding(&self) -> u32 {
        self.overlay_padding
    }

    pub fn set_overlay_padding(&mut self, padding: u32) {
        self.overlay_padding = padding;
    }

    /// Overlay color as `0xAARRGGBB`.
    pub fn overlay_color(&self) -> u32 {
        self.overlay_color
    }

    pub fn set_overlay_color(&mut self, color: u32) {
        self.overlay_color = color;
    }

    /// Crop border color as `0xAARRGGBB`.
    pub fn border_color(&self) -> u32 {
        self.border_color
    }

    pub fn set_border_color(&mut self, color: u32) {
        self.border_color = color;
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EngineMode) {
        self.mode = mode;
    }

    /// Default quality for crop exports (0-100).
    pub fn image_quality(&self) -> u8 {
        self.image_quality
    }

    /// Set the export quality, clamped to 100.
    pub fn set_image_quality(&mut self, quality: u8) {
        self.image_quality = quality.min(100);
    }

    /// Builder-style setter for the engine mode.
    pub fn with_mode(mut self, mode: EngineMode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Builder-style setter for the viewport ratio.
    pub fn with_viewport_ratio(mut self, ratio: f32) -> Self {
        self.set_viewport_ratio(ratio);
        self
    }

    /// Builder-style setter for the overlay padding.
    pub fn with_overlay_padding(mut self, padding: u32) -> Self {
        self.set_overlay_padding(padding);
        self
    }

    /// Builder-style setter for the maximum zoom.
    pub fn with_max_scale(mut self, scale: f32) -> Self {
        self.set_max_scale(scale);
        self
    }

    /// Builder-style setter for the overlay shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.set_shape(shape);
        self
    }
}

fn positive_or(value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}
