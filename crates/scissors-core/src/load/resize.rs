//! Pre-scaling of loaded bitmaps.
//!
//! Images handed to the crop view only need to be large enough to cover the
//! viewport, so loaders shrink (or grow) them to the cover size right after
//! decoding. All functions return new bitmaps without modifying the input.

use super::{Bitmap, FilterType, LoadError};
use crate::geometry::compute_target_size;

/// Resize a bitmap to exact dimensions, keeping its pixel format.
///
/// # Errors
///
/// Returns `LoadError::InvalidDimensions` if a target dimension is zero or
/// the source buffer does not match its dimensions.
pub fn resize(
    bitmap: &Bitmap,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Bitmap, LoadError> {
    if width == 0 || height == 0 {
        return Err(LoadError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if bitmap.width == width && bitmap.height == height {
        return Ok(bitmap.clone());
    }

    let source = bitmap.to_dynamic().ok_or(LoadError::InvalidDimensions {
        width: bitmap.width,
        height: bitmap.height,
    })?;

    let resized = source.resize_exact(width, height, filter.to_image_filter());
    Ok(Bitmap::from_dynamic(resized))
}

/// Scale a bitmap so it just covers a viewport, preserving aspect ratio.
///
/// A bitmap that already has the viewport's size is returned unchanged.
pub fn fill_viewport(
    bitmap: &Bitmap,
    viewport_width: u32,
    viewport_height: u32,
    filter: FilterType,
) -> Result<Bitmap, LoadError> {
    if bitmap.is_empty() {
        return Err(LoadError::InvalidDimensions {
            width: bitmap.width,
            height: bitmap.height,
        });
    }

    let target = compute_target_size(bitmap.width, bitmap.height, viewport_width, viewport_height);
    resize(bitmap, target.width() as u32, target.height() as u32, filter)
}
