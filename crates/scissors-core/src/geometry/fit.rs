//! Size-fit calculation: scale a source rectangle so it covers a viewport.
//!
//! Used for the engine's minimum-scale rule and by image loaders that
//! pre-scale a decoded image to viewport size before handing it over.

use super::Rect;

/// Compute the size a source image should be scaled to so it fills the
/// viewport while keeping its aspect ratio.
///
/// The result covers the viewport (both dimensions are at least the
/// viewport's), anchored at the origin. Dimensions are rounded half up.
///
/// # Arguments
///
/// * `source_width`, `source_height` - Source image size
/// * `viewport_width`, `viewport_height` - Viewport size to fill
///
/// # Example
///
/// ```
/// use scissors_core::geometry::{compute_target_size, Rect};
///
/// assert_eq!(compute_target_size(50, 50, 100, 100), Rect::new(0, 0, 100, 100));
/// ```
pub fn compute_target_size(
    source_width: u32,
    source_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> Rect {
    // Fast path: source already matches the viewport
    if source_width == viewport_width && source_height == viewport_height {
        return Rect::from_size(viewport_width, viewport_height);
    }

    let cross_source = source_width as u64 * viewport_height as u64;
    let cross_viewport = viewport_width as u64 * source_height as u64;

    let scale = if cross_source > cross_viewport {
        viewport_height as f32 / source_height as f32
    } else {
        viewport_width as f32 / source_width as f32
    };

    let width = (source_width as f32 * scale + 0.5) as u32;
    let height = (source_height as f32 * scale + 0.5) as u32;
    Rect::from_size(width, height)
}
