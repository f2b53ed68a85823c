//! Exporting the crop.
//!
//! A [`CropRequest`] rasterizes the viewport on the calling thread, then
//! hands the finished bitmap to a worker thread that encodes it and writes
//! it out. The caller keeps an [`ExportHandle`] and collects the outcome
//! with [`ExportHandle::wait`]. Failures are logged and also returned, so a
//! caller that never waits still sees them in the logs.
//!
//! ```ignore
//! let handle = view
//!     .crop_request()
//!     .format(CompressFormat::Png)
//!     .quality(90)?
//!     .into_file("out/avatar.png")?;
//! handle.wait()?;
//! ```

use crate::encode::{encode, encode_into, CompressFormat, EncodeError};
use crate::load::Bitmap;
use crate::view::CropView;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread::JoinHandle;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// Errors raised while building or running an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Quality must lie in `0..=100`.
    #[error("Invalid quality {0}: must be between 0 and 100")]
    InvalidQuality(u8),

    /// The view has nothing to crop.
    #[error("No image to crop")]
    NoImage,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The worker thread panicked before reporting.
    #[error("Export worker panicked")]
    WorkerPanicked,
}

/// Builder for an asynchronous export of a view's crop.
#[derive(Debug)]
pub struct CropRequest<'a> {
    view: &'a CropView,
    format: CompressFormat,
    quality: u8,
}

impl<'a> CropRequest<'a> {
    /// Request with JPEG output at the configured image quality.
    pub fn new(view: &'a CropView) -> Self {
        Self {
            view,
            format: CompressFormat::default(),
            quality: view.config().image_quality(),
        }
    }

    pub fn format(mut self, format: CompressFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the encoding quality.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidQuality` above 100.
    pub fn quality(mut self, quality: u8) -> Result<Self, ExportError> {
        if quality > 100 {
            return Err(ExportError::InvalidQuality(quality));
        }
        self.quality = quality;
        Ok(self)
    }

    fn rasterize(&self) -> Result<Bitmap, ExportError> {
        self.view.crop().ok_or(ExportError::NoImage)
    }

    /// Encode the crop on the calling thread.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let bitmap = self.rasterize()?;
        Ok(encode(&bitmap, self.format, self.quality)?)
    }

    /// Write the crop to `path`, creating missing parent directories.
    pub fn into_file(self, path: impl AsRef<Path>) -> Result<ExportHandle<()>, ExportError> {
        let bitmap = self.rasterize()?;
        let path = path.as_ref().to_path_buf();
        let (format, quality) = (self.format, self.quality);

        Ok(ExportHandle::spawn(move || {
            let start = Instant::now();
            let result = write_file(&path, &bitmap, format, quality);
            match &result {
                Ok(()) => info!(
                    path = %path.display(),
                    width = bitmap.width,
                    height = bitmap.height,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Crop saved"
                ),
                Err(e) => error!(path = %path.display(), "Crop export failed: {e}"),
            }
            result
        }))
    }

    /// Write the crop to `writer`. The writer is flushed and handed back on
    /// success so the caller decides whether to close it.
    pub fn into_writer<W>(self, mut writer: W) -> Result<ExportHandle<W>, ExportError>
    where
        W: Write + Send + 'static,
    {
        let bitmap = self.rasterize()?;
        let (format, quality) = (self.format, self.quality);

        Ok(ExportHandle::spawn(move || {
            let result = encode_into(&mut writer, &bitmap, format, quality)
                .map_err(ExportError::from)
                .and_then(|()| writer.flush().map_err(ExportError::from));
            match result {
                Ok(()) => {
                    info!(width = bitmap.width, height = bitmap.height, "Crop written");
                    Ok(writer)
                }
                Err(e) => {
                    error!("Crop export failed: {e}");
                    Err(e)
                }
            }
        }))
    }
}

fn write_file(
    path: &Path,
    bitmap: &Bitmap,
    format: CompressFormat,
    quality: u8,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    encode_into(&mut file, bitmap, format, quality)?;
    file.flush()?;
    Ok(())
}

/// Completion handle of a running export.
#[derive(Debug)]
pub struct ExportHandle<T> {
    worker: JoinHandle<Result<T, ExportError>>,
}

impl<T: Send + 'static> ExportHandle<T> {
    fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> Result<T, ExportError> + Send + 'static,
    {
        Self {
            worker: std::thread::spawn(job),
        }
    }

    /// Whether the worker is done; [`wait`](Self::wait) will not block.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Block until the export completes.
    pub fn wait(self) -> Result<T, ExportError> {
        self.worker
            .join()
            .map_err(|_| ExportError::WorkerPanicked)?
    }
}
