//! Image loaders.
//!
//! A crop view is handed its loader at construction; nothing is discovered
//! at runtime. Loaders decode a [`Model`] and pre-scale the result so it just
//! covers the current viewport. Loaded images are viewport-sized and
//! short-lived, so no loader caches them.

use super::{fill_viewport, Bitmap, FilterType, LoadError, Model};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Capability to turn a model reference into a bitmap sized for a viewport.
pub trait BitmapLoader: std::fmt::Debug {
    /// Load `model` and scale it to cover `viewport_width x viewport_height`.
    ///
    /// A zero-sized viewport skips pre-scaling.
    fn load(
        &self,
        model: &Model,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<Bitmap, LoadError>;
}

/// Loader backed by the `image` crate decoders.
///
/// Resolves [`Model::Path`], [`Model::Bytes`] and `file://` URIs. Other
/// URIs and resource ids are rejected with [`LoadError::UnsupportedModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader {
    filter: FilterType,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific resampling filter for pre-scaling.
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }

    fn decode(&self, model: &Model) -> Result<Bitmap, LoadError> {
        match model {
            Model::Path(path) => decode_file(path),
            Model::Bytes(bytes) => decode_bytes(bytes),
            Model::Uri(uri) => match uri.strip_prefix("file://") {
                Some(path) => decode_file(Path::new(path)),
                None => Err(LoadError::UnsupportedModel(format!("uri scheme of {uri}"))),
            },
            Model::Resource(_) => Err(LoadError::UnsupportedModel(model.kind().to_string())),
        }
    }
}

impl BitmapLoader for ImageLoader {
    fn load(
        &self,
        model: &Model,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<Bitmap, LoadError> {
        let decoded = self.decode(model)?;
        if decoded.is_empty() {
            return Err(LoadError::InvalidDimensions {
                width: decoded.width,
                height: decoded.height,
            });
        }

        if viewport_width == 0 || viewport_height == 0 {
            return Ok(decoded);
        }

        let scaled = fill_viewport(&decoded, viewport_width, viewport_height, self.filter)?;
        debug!(
            kind = model.kind(),
            source_width = decoded.width,
            source_height = decoded.height,
            width = scaled.width,
            height = scaled.height,
            "Loaded bitmap"
        );
        Ok(scaled)
    }
}

fn decode_file(path: &Path) -> Result<Bitmap, LoadError> {
    let bytes = std::fs::read(path)?;
    decode_bytes(&bytes)
}

fn decode_bytes(bytes: &[u8]) -> Result<Bitmap, LoadError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::Decode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| LoadError::Decode(e.to_string()))?;

    Ok(Bitmap::from_dynamic(img))
}
