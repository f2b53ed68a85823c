//! Crop rasterizer.
//!
//! Draws a bitmap through an affine transform into a fresh canvas using
//! inverse mapping: every destination pixel centre is mapped back into the
//! source and sampled bilinearly. Destination pixels whose centre lands
//! outside the source stay zero (transparent for RGBA).
//!
//! [`crop`] renders exactly what the view shows inside the viewport, so the
//! output matches the screen pixel for pixel.

use super::Affine;
use crate::geometry::Point;
use crate::load::Bitmap;

/// Render the part of `bitmap` visible through a centred viewport.
///
/// `transform` is the same transform used to draw the bitmap into a view of
/// `view_width x view_height`. The output is `viewport_width x
/// viewport_height` and has the pixel format of `bitmap`.
///
/// Returns `None` when the viewport or bitmap is empty, the pixel buffer
/// does not match the bitmap size, or the transform cannot be inverted.
pub fn crop(
    bitmap: &Bitmap,
    transform: &Affine,
    view_width: u32,
    view_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> Option<Bitmap> {
    let left = (view_width as i64 - viewport_width as i64) / 2;
    let top = (view_height as i64 - viewport_height as i64) / 2;

    let mut matrix = *transform;
    matrix.post_translate(-(left as f32), -(top as f32));
    render(bitmap, &matrix, viewport_width, viewport_height)
}

/// Draw `bitmap` through `transform` into a `width x height` canvas.
pub fn render(bitmap: &Bitmap, transform: &Affine, width: u32, height: u32) -> Option<Bitmap> {
    if width == 0 || height == 0 || bitmap.is_empty() || !bitmap.has_valid_length() {
        return None;
    }
    let inverse = transform.invert()?;

    let mut output = Bitmap::blank(width, height, bitmap.format);
    let bpp = bitmap.format.bytes_per_pixel();
    let row_len = width as usize * bpp;

    for (y, row) in output.pixels.chunks_exact_mut(row_len).enumerate() {
        for (x, dst) in row.chunks_exact_mut(bpp).enumerate() {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let src = inverse.map_point(centre);
            sample_bilinear(bitmap, src.x, src.y, dst);
        }
    }

    Some(output)
}

/// Sample `bitmap` at `(x, y)` in pixel-edge coordinates into `out`.
///
/// Neighbours past the border repeat the edge pixel; points outside the
/// bitmap leave `out` untouched.
fn sample_bilinear(bitmap: &Bitmap, x: f32, y: f32, out: &mut [u8]) {
    let (w, h) = (bitmap.width as f32, bitmap.height as f32);

    // Also rejects NaN
    if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
        return;
    }

    // Shift to pixel-centre coordinates
    let cx = x - 0.5;
    let cy = y - 0.5;
    let fx0 = cx.floor();
    let fy0 = cy.floor();
    let tx = cx - fx0;
    let ty = cy - fy0;

    let max_x = bitmap.width as i64 - 1;
    let max_y = bitmap.height as i64 - 1;
    let x0 = (fx0 as i64).clamp(0, max_x) as u32;
    let x1 = (fx0 as i64 + 1).clamp(0, max_x) as u32;
    let y0 = (fy0 as i64).clamp(0, max_y) as u32;
    let y1 = (fy0 as i64 + 1).clamp(0, max_y) as u32;

    let p00 = bitmap.pixel(x0, y0);
    let p10 = bitmap.pixel(x1, y0);
    let p01 = bitmap.pixel(x0, y1);
    let p11 = bitmap.pixel(x1, y1);

    for (i, value) in out.iter_mut().enumerate() {
        let v = p00[i] as f32 * (1.0 - tx) * (1.0 - ty)
            + p10[i] as f32 * tx * (1.0 - ty)
            + p01[i] as f32 * (1.0 - tx) * ty
            + p11[i] as f32 * tx * ty;
        *value = v.round().clamp(0.0, 255.0) as u8;
    }
}
