//! Core types for bitmaps and image loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Error types for image loading operations.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The loader does not know how to resolve this kind of model.
    #[error("Unsupported model type: {0}")]
    UnsupportedModel(String),

    /// I/O error while reading the model.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The decoded image (or a requested resize) has no pixels.
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Reference to an image a loader can resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Model {
    /// A file on disk.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
    /// A URI such as `file:///...` or `https://...`.
    Uri(String),
    /// A platform resource identifier.
    Resource(u32),
}

impl Model {
    /// Short name of the model kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Path(_) => "path",
            Model::Bytes(_) => "bytes",
            Model::Uri(_) => "uri",
            Model::Resource(_) => "resource id",
        }
    }
}

impl From<PathBuf> for Model {
    fn from(path: PathBuf) -> Self {
        Model::Path(path)
    }
}

impl From<&std::path::Path> for Model {
    fn from(path: &std::path::Path) -> Self {
        Model::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for Model {
    fn from(bytes: Vec<u8>) -> Self {
        Model::Bytes(bytes)
    }
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Pixel layout of a [`Bitmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit luminance.
    Gray8,
    /// 8-bit RGB.
    Rgb8,
    /// 8-bit RGBA, the default 32-bit format.
    #[default]
    Rgba8,
}

impl PixelFormat {
    /// Bytes used by a single pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Whether the format carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba8)
    }
}

/// A decoded image held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub format: PixelFormat,
    /// Pixel data in row-major order.
    /// Length is `width * height * format.bytes_per_pixel()`.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * format.bytes_per_pixel(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    /// Create a zero-filled bitmap (transparent for RGBA).
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self::new(width, height, format, vec![0u8; len])
    }

    /// Convert a decoded `image` crate image.
    ///
    /// 8-bit gray, RGB and RGBA keep their layout; every other color type
    /// is converted to [`PixelFormat::Rgba8`].
    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        match image {
            image::DynamicImage::ImageLuma8(img) => {
                Self::new(width, height, PixelFormat::Gray8, img.into_raw())
            }
            image::DynamicImage::ImageRgb8(img) => {
                Self::new(width, height, PixelFormat::Rgb8, img.into_raw())
            }
            image::DynamicImage::ImageRgba8(img) => {
                Self::new(width, height, PixelFormat::Rgba8, img.into_raw())
            }
            other => Self::new(width, height, PixelFormat::Rgba8, other.into_rgba8().into_raw()),
        }
    }

    /// Convert to an `image` crate image for resizing or encoding.
    ///
    /// Returns `None` if the pixel buffer does not match the dimensions.
    pub fn to_dynamic(&self) -> Option<image::DynamicImage> {
        let pixels = self.pixels.clone();
        match self.format {
            PixelFormat::Gray8 => image::GrayImage::from_raw(self.width, self.height, pixels)
                .map(image::DynamicImage::ImageLuma8),
            PixelFormat::Rgb8 => image::RgbImage::from_raw(self.width, self.height, pixels)
                .map(image::DynamicImage::ImageRgb8),
            PixelFormat::Rgba8 => image::RgbaImage::from_raw(self.width, self.height, pixels)
                .map(image::DynamicImage::ImageRgba8),
        }
    }

    /// Bytes of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let idx = (y as usize * self.width as usize + x as usize) * bpp;
        &self.pixels[idx..idx + bpp]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Native aspect ratio, or `0.0` for an empty bitmap.
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Whether `pixels` holds exactly `width * height` pixels of `format`.
    pub fn has_valid_length(&self) -> bool {
        self.pixels.len()
            == self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}
