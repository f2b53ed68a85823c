//! Crop view bindings.
//!
//! [`JsCropView`] wraps the core `CropView` for a browser host. The host
//! forwards its canvas size and pointer events, draws the image with the
//! matrix from `transform()` and the shade from `overlay_rects()`, and calls
//! `export()` to get the encoded crop.
//!
//! ```typescript
//! const view = new JsCropView({ viewport_ratio: 1.0, mode: "animated" });
//! view.set_view_size(canvas.width, canvas.height);
//! view.load_bytes(new Uint8Array(await file.arrayBuffer()));
//!
//! canvas.addEventListener("pointermove", (e) => {
//!   view.on_pointer(2, 0, [e.offsetX], [e.offsetY], e.timeStamp);
//! });
//! ctx.setTransform(...view.transform());
//! ```

use crate::to_js_error;
use crate::types::JsBitmap;
use scissors_core::config::CropConfig;
use scissors_core::encode::CompressFormat;
use scissors_core::engine::{PointerAction, PointerEvent};
use scissors_core::geometry::{Point, Rect};
use scissors_core::load::{LoadState, Model};
use scissors_core::overlay::Ellipse;
use scissors_core::view::CropView;
use serde::Serialize;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Overlay geometry handed to JavaScript as a plain object.
#[derive(Debug, Serialize)]
struct OverlayGeometry {
    viewport: Rect,
    shades: [Rect; 4],
    oval: Option<Ellipse>,
    color: u32,
    border_color: u32,
}

#[wasm_bindgen]
#[derive(Debug)]
pub struct JsCropView {
    inner: CropView,
}

#[wasm_bindgen]
impl JsCropView {
    /// Create a view from a configuration object. `undefined` or `null`
    /// uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropView, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<CropConfig>(config)
                .map_err(|e| to_js_error(&format!("Invalid config: {e}")))?
                .sanitized()
        };
        Ok(Self::with_config(config))
    }

    /// Lay out at a new canvas size. Runs a load deferred by `load_bytes`.
    pub fn set_view_size(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner
            .set_view_size(width, height)
            .map_err(|e| to_js_error(&e))
    }

    /// Replace the image with an RGBA bitmap.
    pub fn set_image(&mut self, image: &JsBitmap) {
        self.inner.set_bitmap(Some(image.to_bitmap()));
    }

    pub fn clear_image(&mut self) {
        self.inner.set_bitmap(None);
    }

    /// Decode and install an encoded image.
    ///
    /// Returns `false` when the load was deferred until the view has a size.
    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<bool, JsValue> {
        let state = self
            .inner
            .load(Model::Bytes(bytes))
            .map_err(|e| to_js_error(&e))?;
        Ok(state == LoadState::Loaded)
    }

    /// Feed a pointer event.
    ///
    /// `action` uses the Android `MotionEvent` codes: 0 down, 1 up, 2 move,
    /// 3 cancel, 5 pointer down, 6 pointer up. `xs` and `ys` hold every
    /// pointer currently touching. Returns `false` when the view is
    /// disabled.
    pub fn on_pointer(
        &mut self,
        action: u8,
        index: usize,
        xs: &[f32],
        ys: &[f32],
        time_ms: f64,
    ) -> Result<bool, JsValue> {
        let event = pointer_event(action, index, xs, ys, time_ms).map_err(|e| to_js_error(&e))?;
        Ok(self.inner.on_event(&event))
    }

    /// Advance animations to `time_ms`. Returns `true` while another frame
    /// should be requested.
    pub fn tick(&mut self, time_ms: f64) -> bool {
        self.inner.tick(millis(time_ms))
    }

    /// The image transform as `[a, b, c, d, e, f]` for `setTransform`.
    pub fn transform(&self) -> Vec<f32> {
        self.inner.transform_matrix().to_array().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn viewport_width(&self) -> u32 {
        self.inner.viewport_width()
    }

    #[wasm_bindgen(getter)]
    pub fn viewport_height(&self) -> u32 {
        self.inner.viewport_height()
    }

    #[wasm_bindgen(getter)]
    pub fn viewport_ratio(&self) -> f32 {
        self.inner.viewport_ratio()
    }

    /// Set the viewport ratio; `0` matches the image.
    #[wasm_bindgen(setter)]
    pub fn set_viewport_ratio(&mut self, ratio: f32) {
        self.inner.set_viewport_ratio(ratio);
    }

    #[wasm_bindgen(getter)]
    pub fn image_ratio(&self) -> f32 {
        self.inner.image_ratio()
    }

    #[wasm_bindgen(setter)]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.inner.set_enabled(enabled);
    }

    #[wasm_bindgen(getter)]
    pub fn enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    pub fn set_overlay_padding(&mut self, padding: u32) {
        self.inner.set_overlay_padding(padding);
    }

    pub fn set_overlay_color(&mut self, color: u32) {
        self.inner.set_overlay_color(color);
    }

    /// The four shade rectangles as 16 integers, `[left, top, right, bottom]`
    /// each, in left/top/right/bottom band order.
    pub fn overlay_rects(&self) -> Vec<i32> {
        self.inner
            .overlay()
            .shade_rects()
            .iter()
            .flat_map(|r| [r.left, r.top, r.right, r.bottom])
            .collect()
    }

    /// Full overlay geometry, including the oval when the shape is oval.
    pub fn overlay(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.overlay_geometry()).map_err(|e| to_js_error(&e))
    }

    /// The viewport pixels as an RGBA bitmap.
    pub fn crop(&self) -> Option<JsBitmap> {
        self.inner.crop().map(JsBitmap::from_bitmap)
    }

    /// The whole view with the overlay blended in.
    pub fn render_frame(&self) -> Option<JsBitmap> {
        self.inner.render_frame().map(JsBitmap::from_bitmap)
    }

    /// Encode the crop as `"jpeg"` or `"png"`.
    ///
    /// # Errors
    ///
    /// Throws for an unknown format, a quality outside `0..=100`, or a
    /// view with no image.
    pub fn export(&self, format: &str, quality: i32) -> Result<Vec<u8>, JsValue> {
        self.export_bytes(format, quality).map_err(|e| to_js_error(&e))
    }
}

impl JsCropView {
    pub(crate) fn with_config(config: CropConfig) -> Self {
        Self {
            inner: CropView::with_image_loader(config),
        }
    }

    fn overlay_geometry(&self) -> OverlayGeometry {
        let overlay = self.inner.overlay();
        OverlayGeometry {
            viewport: overlay.viewport(),
            shades: overlay.shade_rects(),
            oval: overlay.oval(),
            color: overlay.color(),
            border_color: self.inner.config().border_color(),
        }
    }

    fn export_bytes(&self, format: &str, quality: i32) -> Result<Vec<u8>, String> {
        let format = parse_format(format)?;
        let quality = checked_quality(quality)?;
        let request = self
            .inner
            .crop_request()
            .format(format)
            .quality(quality)
            .map_err(|e| e.to_string())?;
        request.to_bytes().map_err(|e| e.to_string())
    }
}

fn millis(time_ms: f64) -> Duration {
    if time_ms.is_finite() && time_ms > 0.0 {
        Duration::from_secs_f64(time_ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

fn checked_quality(quality: i32) -> Result<u8, String> {
    u8::try_from(quality)
        .ok()
        .filter(|q| *q <= 100)
        .ok_or_else(|| format!("Invalid quality {quality}: must be between 0 and 100"))
}

fn parse_format(format: &str) -> Result<CompressFormat, String> {
    match format.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => Ok(CompressFormat::Jpeg),
        "png" => Ok(CompressFormat::Png),
        other => Err(format!("Unsupported format: {other}")),
    }
}

fn action_from_code(code: u8) -> Option<PointerAction> {
    match code {
        0 => Some(PointerAction::Down),
        1 => Some(PointerAction::Up),
        2 => Some(PointerAction::Move),
        3 => Some(PointerAction::Cancel),
        5 => Some(PointerAction::PointerDown),
        6 => Some(PointerAction::PointerUp),
        _ => None,
    }
}

fn pointer_event(
    action: u8,
    index: usize,
    xs: &[f32],
    ys: &[f32],
    time_ms: f64,
) -> Result<PointerEvent, String> {
    let action = action_from_code(action).ok_or_else(|| format!("Unknown pointer action {action}"))?;
    if xs.len() != ys.len() {
        return Err(format!(
            "Pointer coordinates differ in length: {} xs, {} ys",
            xs.len(),
            ys.len()
        ));
    }
    let pointers = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| Point::new(x, y))
        .collect();
    Ok(PointerEvent::new(action, index, pointers, millis(time_ms)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scissors_core::config::Shape;

    fn view_with_image() -> JsCropView {
        let mut view = JsCropView::with_config(CropConfig::default().with_overlay_padding(10));
        view.inner.set_view_size(120, 100).unwrap();
        let image = JsBitmap::from_rgba(160, 160, [40u8, 80, 120, 255].repeat(160 * 160)).unwrap();
        view.set_image(&image);
        view
    }

    #[test]
    fn test_action_codes() {
        assert_eq!(action_from_code(0), Some(PointerAction::Down));
        assert_eq!(action_from_code(6), Some(PointerAction::PointerUp));
        assert_eq!(action_from_code(4), None);
    }

    #[test]
    fn test_pointer_event_from_arrays() {
        let event = pointer_event(5, 1, &[1.0, 2.0], &[3.0, 4.0], 1500.0).unwrap();
        assert_eq!(event.action, PointerAction::PointerDown);
        assert_eq!(event.pointers, vec![Point::new(1.0, 3.0), Point::new(2.0, 4.0)]);
        assert_eq!(event.time, Duration::from_millis(1500));

        assert!(pointer_event(2, 0, &[1.0], &[], 0.0).is_err());
        assert!(pointer_event(9, 0, &[1.0], &[1.0], 0.0).is_err());
    }

    #[test]
    fn test_drag_moves_transform() {
        let mut view = view_with_image();
        // 160x160 covers the 80x80 viewport at scale 0.5, centred at (60, 50)
        assert_eq!(view.transform(), vec![0.5, 0.0, 0.0, 0.5, 20.0, 10.0]);

        view.on_pointer(0, 0, &[60.0], &[50.0], 0.0).unwrap();
        view.on_pointer(2, 0, &[65.0], &[50.0], 16.0).unwrap();
        assert_eq!(view.transform()[4], 25.0);
    }

    #[test]
    fn test_overlay_rects_layout() {
        let view = view_with_image();
        assert_eq!(
            view.overlay_rects(),
            vec![
                0, 10, 20, 90, // left
                0, 0, 120, 10, // top
                100, 10, 120, 90, // right
                0, 90, 120, 100, // bottom
            ]
        );
    }

    #[test]
    fn test_overlay_geometry_includes_oval() {
        let mut view = view_with_image();
        assert!(view.overlay_geometry().oval.is_none());

        view.inner.set_shape(Shape::Oval);
        let geometry = view.overlay_geometry();
        let oval = geometry.oval.unwrap();
        assert_eq!(oval.center, Point::new(60.0, 50.0));
        assert_eq!(geometry.viewport, Rect::new(20, 10, 100, 90));
    }

    #[test]
    fn test_crop_and_export() {
        let view = view_with_image();
        let crop = view.crop().unwrap();
        assert_eq!((crop.width(), crop.height()), (80, 80));
        assert_eq!(&crop.pixels()[0..4], &[40, 80, 120, 255]);

        let png = view.export_bytes("PNG", 100).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let jpeg = view.export_bytes("jpg", 75).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        assert!(view.export_bytes("gif", 90).unwrap_err().contains("gif"));
        assert!(view.export_bytes("png", 101).is_err());
    }

    #[test]
    fn test_quality_out_of_range_is_rejected() {
        assert_eq!(checked_quality(0), Ok(0));
        assert_eq!(checked_quality(100), Ok(100));
        assert!(checked_quality(101).is_err());
        assert!(checked_quality(-1).unwrap_err().contains("-1"));
        // 300 must not wrap to 44
        assert!(checked_quality(300).unwrap_err().contains("300"));

        let view = view_with_image();
        assert!(view.export_bytes("jpeg", 300).is_err());
        assert!(view.export_bytes("jpeg", -1).is_err());
    }

    #[test]
    fn test_export_without_image_fails() {
        let view = JsCropView::with_config(CropConfig::default());
        assert!(view.crop().is_none());
        assert!(view.export_bytes("png", 100).is_err());
    }
}
