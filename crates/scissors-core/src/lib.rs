//! Scissors Core - touch-driven image cropping
//!
//! This crate provides the engine behind a crop widget: a bitmap is shown
//! behind a fixed viewport of a configured aspect ratio, the user pans,
//! pinches, flings and double-taps it into place, and the part under the
//! viewport is rasterized and exported.
//!
//! - [`engine`]: pointer events to scale and position, kept covering the
//!   viewport
//! - [`geometry`]: viewport sizing and cover-fit calculations
//! - [`transform`]: affine matrix and crop rasterizer
//! - [`load`]: bitmaps, injected loaders and deferred loads
//! - [`encode`] / [`export`]: JPEG and PNG output on a worker thread
//! - [`overlay`]: shade geometry drawn around the viewport
//! - [`view`]: [`CropView`], the composition a host widget drives

pub mod config;
pub mod encode;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod load;
pub mod overlay;
pub mod transform;
pub mod view;

pub use config::{ConfigError, CropConfig, EngineMode, Shape};
pub use encode::{CompressFormat, EncodeError};
pub use engine::{PointerAction, PointerEvent, TransformEngine, TransformState};
pub use export::{CropRequest, ExportError, ExportHandle};
pub use geometry::{compute_target_size, compute_viewport, Point, Rect, Viewport};
pub use load::{Bitmap, BitmapLoader, ImageLoader, LoadError, LoadState, Model, PixelFormat};
pub use overlay::Overlay;
pub use transform::Affine;
pub use view::CropView;
