//! JPEG and PNG encoding of bitmaps.
//!
//! Encoding uses the `image` crate encoders. JPEG has no alpha channel, so
//! RGBA bitmaps lose their alpha before JPEG encoding; PNG keeps every
//! format as is.

use crate::load::{Bitmap, PixelFormat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur while encoding a bitmap.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the bitmap dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder failed or could not write its output
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressFormat {
    #[default]
    Jpeg,
    Png,
}

impl CompressFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            CompressFormat::Jpeg => "jpg",
            CompressFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            CompressFormat::Jpeg => "image/jpeg",
            CompressFormat::Png => "image/png",
        }
    }
}

/// Encode a bitmap into a new buffer.
///
/// # Arguments
///
/// * `bitmap` - Pixels to encode
/// * `format` - Target format
/// * `quality` - JPEG quality (0-100, values below 1 encode as 1); ignored
///   for PNG
///
/// # Example
///
/// ```ignore
/// let bytes = encode(&bitmap, CompressFormat::Jpeg, 90)?;
/// assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode(bitmap: &Bitmap, format: CompressFormat, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    encode_into(&mut buffer, bitmap, format, quality)?;
    Ok(buffer)
}

/// Encode a bitmap straight into `writer`.
pub fn encode_into<W: Write>(
    writer: &mut W,
    bitmap: &Bitmap,
    format: CompressFormat,
    quality: u8,
) -> Result<(), EncodeError> {
    validate(bitmap)?;

    let result = match format {
        CompressFormat::Jpeg => {
            // Clamp quality to the encoder's range (1-100)
            let quality = quality.clamp(1, 100);
            let encoder = JpegEncoder::new_with_quality(&mut *writer, quality);
            match bitmap.format {
                PixelFormat::Rgba8 => {
                    let rgb = strip_alpha(&bitmap.pixels);
                    encoder.write_image(&rgb, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
                }
                other => encoder.write_image(
                    &bitmap.pixels,
                    bitmap.width,
                    bitmap.height,
                    color_type(other),
                ),
            }
        }
        CompressFormat::Png => PngEncoder::new(&mut *writer).write_image(
            &bitmap.pixels,
            bitmap.width,
            bitmap.height,
            color_type(bitmap.format),
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))
}

fn validate(bitmap: &Bitmap) -> Result<(), EncodeError> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: bitmap.width,
            height: bitmap.height,
        });
    }

    let expected = bitmap.width as usize * bitmap.height as usize * bitmap.format.bytes_per_pixel();
    if bitmap.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: bitmap.pixels.len(),
        });
    }
    Ok(())
}

fn color_type(format: PixelFormat) -> ExtendedColorType {
    match format {
        PixelFormat::Gray8 => ExtendedColorType::L8,
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba8 => ExtendedColorType::Rgba8,
    }
}

fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4).flat_map(|p| [p[0], p[1], p[2]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_rgb(width: u32, height: u32) -> Bitmap {
        Bitmap::new(
            width,
            height,
            PixelFormat::Rgb8,
            vec![128u8; (width * height * 3) as usize],
        )
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg_bytes = encode(&gray_rgb(100, 100), CompressFormat::Jpeg, 90).unwrap();

        // Check JPEG magic bytes (SOI marker)
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);

        // Check JPEG ends with EOI marker
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode(&gray_rgb(10, 10), CompressFormat::Png, 0).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let bitmap = Bitmap::new(8, 8, PixelFormat::Rgba8, [200u8, 10, 10, 0].repeat(64));
        let jpeg = encode(&bitmap, CompressFormat::Jpeg, 100).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        let pixel = decoded.to_rgb8().get_pixel(4, 4).0;
        assert!(pixel[0] > 180 && pixel[1] < 40, "{pixel:?}");
    }

    #[test]
    fn test_png_keeps_alpha_and_pixels() {
        let pixels: Vec<u8> = (0..4 * 3 * 4).map(|i| (i * 5) as u8).collect();
        let bitmap = Bitmap::new(4, 3, PixelFormat::Rgba8, pixels.clone());
        let png = encode(&bitmap, CompressFormat::Png, 100).unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
        assert_eq!(decoded.into_rgba8().into_raw(), pixels);
    }

    #[test]
    fn test_gray_jpeg() {
        let bitmap = Bitmap::new(16, 16, PixelFormat::Gray8, vec![77u8; 256]);
        let jpeg = encode(&bitmap, CompressFormat::Jpeg, 80).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn test_quality_affects_size() {
        let mut pixels = Vec::with_capacity(64 * 64 * 3);
        for y in 0..64u32 {
            for x in 0..64u32 {
                pixels.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8]);
            }
        }
        let bitmap = Bitmap::new(64, 64, PixelFormat::Rgb8, pixels);

        let low = encode(&bitmap, CompressFormat::Jpeg, 10).unwrap();
        let high = encode(&bitmap, CompressFormat::Jpeg, 100).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_zero_quality_still_encodes() {
        assert!(encode(&gray_rgb(8, 8), CompressFormat::Jpeg, 0).is_ok());
    }

    #[test]
    fn test_invalid_dimensions() {
        let bitmap = Bitmap {
            width: 0,
            height: 10,
            format: PixelFormat::Rgb8,
            pixels: vec![],
        };
        let result = encode(&bitmap, CompressFormat::Png, 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_invalid_pixel_data() {
        let bitmap = Bitmap {
            width: 10,
            height: 10,
            format: PixelFormat::Rgba8,
            pixels: vec![0u8; 10],
        };
        let result = encode(&bitmap, CompressFormat::Jpeg, 90);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 400,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_encode_into_writer() {
        let mut out = std::io::Cursor::new(Vec::new());
        encode_into(&mut out, &gray_rgb(4, 4), CompressFormat::Png, 100).unwrap();
        assert!(!out.into_inner().is_empty());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(CompressFormat::default(), CompressFormat::Jpeg);
        assert_eq!(CompressFormat::Png.extension(), "png");
        assert_eq!(CompressFormat::Jpeg.mime_type(), "image/jpeg");
    }
}
