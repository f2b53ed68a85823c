//! Bitmaps and image loading.
//!
//! - [`Bitmap`]: decoded pixels in a known [`PixelFormat`]
//! - [`BitmapLoader`]: injected capability that resolves a [`Model`]
//! - [`ImageLoader`]: loader backed by the `image` crate
//! - [`LoadRequest`]: a load parked until the view has a size

mod loader;
mod request;
mod resize;
mod types;

pub use loader::{BitmapLoader, ImageLoader};
pub use request::{LoadRequest, LoadState};
pub use resize::{fill_viewport, resize};
pub use types::{Bitmap, FilterType, LoadError, Model, PixelFormat};
