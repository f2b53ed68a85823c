//! Scissors WASM - WebAssembly bindings for the crop view
//!
//! This crate exposes the scissors-core crop view to JavaScript/TypeScript
//! applications. The host owns the canvas and the event loop; the view owns
//! the transform, the viewport and the crop.
//!
//! # Module Structure
//!
//! - `types` - RGBA bitmap wrapper
//! - `view` - `JsCropView`, layout, pointer events, overlay and export
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropView } from '@scissors/wasm';
//!
//! await init();
//!
//! const view = new JsCropView({ viewport_ratio: 16 / 9 });
//! view.set_view_size(canvas.width, canvas.height);
//! view.load_bytes(new Uint8Array(await file.arrayBuffer()));
//! const jpeg = view.export("jpeg", 90);
//! ```

use wasm_bindgen::prelude::*;

mod types;
mod view;

pub use types::JsBitmap;
pub use view::JsCropView;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Size a source image must be scaled to so it covers a viewport, as
/// `[left, top, right, bottom]`.
///
/// Host-side loaders use this to pre-scale images before `JsBitmap::new`.
#[wasm_bindgen]
pub fn compute_target_size(
    source_width: u32,
    source_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> Vec<i32> {
    let rect = scissors_core::geometry::compute_target_size(
        source_width,
        source_height,
        viewport_width,
        viewport_height,
    );
    vec![rect.left, rect.top, rect.right, rect.bottom]
}

pub(crate) fn to_js_error(err: &impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
