//! The crop view.
//!
//! [`CropView`] ties the pieces together the way a host widget needs them:
//! it holds the bitmap, forwards layout and pointer events to the
//! [`TransformEngine`], resolves deferred loads through its injected
//! [`BitmapLoader`], and produces the transform, overlay and crop the host
//! draws or saves.

use crate::config::{CropConfig, Shape};
use crate::engine::{PointerEvent, TransformEngine};
use crate::export::CropRequest;
use crate::load::{Bitmap, BitmapLoader, ImageLoader, LoadError, LoadRequest, LoadState, Model};
use crate::overlay::Overlay;
use crate::transform::{self, Affine};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct CropView {
    engine: TransformEngine,
    loader: Box<dyn BitmapLoader>,
    bitmap: Option<Bitmap>,
    view_width: u32,
    view_height: u32,
    pending: LoadRequest,
    enabled: bool,
}

impl CropView {
    /// Create a view with no size and no image.
    pub fn new(config: CropConfig, loader: Box<dyn BitmapLoader>) -> Self {
        Self {
            engine: TransformEngine::new(config),
            loader,
            bitmap: None,
            view_width: 0,
            view_height: 0,
            pending: LoadRequest::default(),
            enabled: true,
        }
    }

    /// Create a view that loads through [`ImageLoader`].
    pub fn with_image_loader(config: CropConfig) -> Self {
        Self::new(config, Box::new(ImageLoader::new()))
    }

    pub fn config(&self) -> &CropConfig {
        self.engine.config()
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn view_width(&self) -> u32 {
        self.view_width
    }

    pub fn view_height(&self) -> u32 {
        self.view_height
    }

    /// Lay the view out at a new size, e.g. after rotation.
    ///
    /// Resets the transform and runs a load parked by [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the parked load fails. The view keeps
    /// its size and previous bitmap.
    pub fn set_view_size(&mut self, width: u32, height: u32) -> Result<(), LoadError> {
        self.view_width = width;
        self.view_height = height;
        self.reset_engine();

        match self.pending.resolve(width, height) {
            Some(model) => {
                debug!(kind = model.kind(), "Running deferred load");
                self.load_now(&model).map(|_| ())
            }
            None => Ok(()),
        }
    }

    /// Replace the image. `None` clears it.
    pub fn set_bitmap(&mut self, bitmap: Option<Bitmap>) {
        self.bitmap = bitmap.filter(|b| !b.is_empty());
        self.reset_engine();
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Load `model` through the injected loader.
    ///
    /// Before the view has a size the load is parked and runs on the first
    /// [`set_view_size`](Self::set_view_size) with a nonzero size. A newer
    /// load replaces a parked one.
    pub fn load(&mut self, model: impl Into<Model>) -> Result<LoadState, LoadError> {
        let model = model.into();
        if self.view_width == 0 || self.view_height == 0 {
            debug!(kind = model.kind(), "View has no size, deferring load");
            self.pending = LoadRequest::pending(model);
            return Ok(LoadState::Deferred);
        }
        self.pending = LoadRequest::Ready;
        self.load_now(&model)
    }

    pub fn is_load_pending(&self) -> bool {
        self.pending.is_pending()
    }

    fn load_now(&mut self, model: &Model) -> Result<LoadState, LoadError> {
        match self.loader.load(model, self.view_width, self.view_height) {
            Ok(bitmap) => {
                self.set_bitmap(Some(bitmap));
                Ok(LoadState::Loaded)
            }
            Err(e) => {
                warn!(kind = model.kind(), "Failed to load image: {e}");
                Err(e)
            }
        }
    }

    fn reset_engine(&mut self) {
        let (width, height) = self
            .bitmap
            .as_ref()
            .map_or((0, 0), |b| (b.width, b.height));
        self.engine
            .reset_for(width, height, self.view_width, self.view_height);
    }

    /// Aspect ratio of the current image, `0.0` without one.
    pub fn image_ratio(&self) -> f32 {
        self.bitmap.as_ref().map_or(0.0, Bitmap::aspect_ratio)
    }

    pub fn viewport_ratio(&self) -> f32 {
        self.engine.aspect_ratio()
    }

    /// Set the viewport ratio. `0.0` locks it to the current image ratio.
    pub fn set_viewport_ratio(&mut self, ratio: f32) {
        let ratio = if ratio == 0.0 { self.image_ratio() } else { ratio };
        self.engine.set_aspect_ratio(ratio);
    }

    pub fn set_overlay_padding(&mut self, padding: u32) {
        self.engine
            .update_config(|config| config.set_overlay_padding(padding));
    }

    /// Set the overlay color as `0xAARRGGBB`.
    pub fn set_overlay_color(&mut self, color: u32) {
        self.engine.update_config(|config| config.set_overlay_color(color));
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.engine.update_config(|config| config.set_shape(shape));
    }

    /// A disabled view ignores pointer events.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feed a pointer event. Returns `false` when the view is disabled.
    pub fn on_event(&mut self, event: &PointerEvent) -> bool {
        if !self.enabled {
            return false;
        }
        self.engine.on_event(event);
        true
    }

    /// Advance a running animation. Returns `true` while more frames are
    /// needed.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.engine.tick(now)
    }

    /// Transform for drawing the bitmap into the view.
    pub fn transform_matrix(&self) -> Affine {
        self.engine.transform()
    }

    pub fn viewport_width(&self) -> u32 {
        self.engine.viewport_width()
    }

    pub fn viewport_height(&self) -> u32 {
        self.engine.viewport_height()
    }

    pub fn overlay(&self) -> Overlay {
        let config = self.config();
        Overlay::new(
            self.view_width,
            self.view_height,
            self.viewport_width(),
            self.viewport_height(),
            config.shape(),
        )
        .with_color(config.overlay_color())
    }

    /// Rasterize the whole view: the transformed bitmap with the overlay
    /// blended on top.
    pub fn render_frame(&self) -> Option<Bitmap> {
        let bitmap = self.bitmap.as_ref()?;
        let mut frame = transform::render(
            bitmap,
            &self.transform_matrix(),
            self.view_width,
            self.view_height,
        )?;
        self.overlay().paint(&mut frame);
        Some(frame)
    }

    /// The pixels inside the viewport, exactly as shown.
    pub fn crop(&self) -> Option<Bitmap> {
        let bitmap = self.bitmap.as_ref()?;
        transform::crop(
            bitmap,
            &self.transform_matrix(),
            self.view_width,
            self.view_height,
            self.viewport_width(),
            self.viewport_height(),
        )
    }

    /// Start building an export of the crop.
    pub fn crop_request(&self) -> CropRequest<'_> {
        CropRequest::new(self)
    }
}
