//! WASM-compatible wrapper types for bitmaps.
//!
//! JavaScript hands pixels over as canvas `ImageData` buffers, so every
//! bitmap crossing the boundary is RGBA with 4 bytes per pixel.

use scissors_core::load::{Bitmap, PixelFormat};
use wasm_bindgen::prelude::*;

/// An RGBA bitmap for JavaScript.
///
/// The pixel data is stored in WASM memory. `pixels()` copies it into a
/// `Uint8Array`, which can be wrapped in an `ImageData` directly.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a bitmap from RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Throws if `pixels` is not `width * height * 4` bytes long.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsBitmap, JsValue> {
        Self::from_rgba(width, height, pixels).map_err(|e| crate::to_js_error(&e))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as a Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsBitmap {
    pub(crate) fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(format!(
                "Invalid pixel data: expected {expected} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert a core bitmap, expanding gray and RGB to RGBA.
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        let pixels = match bitmap.format {
            PixelFormat::Rgba8 => bitmap.pixels,
            PixelFormat::Rgb8 => bitmap
                .pixels
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
            PixelFormat::Gray8 => bitmap
                .pixels
                .iter()
                .flat_map(|&v| [v, v, v, 255])
                .collect(),
        };
        Self {
            width: bitmap.width,
            height: bitmap.height,
            pixels,
        }
    }

    pub(crate) fn to_bitmap(&self) -> Bitmap {
        Bitmap::new(
            self.width,
            self.height,
            PixelFormat::Rgba8,
            self.pixels.clone(),
        )
    }
}
