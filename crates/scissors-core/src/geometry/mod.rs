//! Geometry primitives and the pure sizing functions the engine is built on.
//!
//! - [`Point`]: 2D vector for touch coordinates and image position
//! - [`Rect`]: integer rectangle in view pixels
//! - [`compute_viewport`]: viewport size from view size, ratio and padding
//! - [`compute_target_size`]: cover-fit of a source rectangle to a viewport

mod fit;
mod point;
mod viewport;

pub use fit::compute_target_size;
pub use point::Point;
pub use viewport::{compute_viewport, effective_ratio, Viewport};

use serde::{Deserialize, Serialize};

/// Integer rectangle, edges exclusive on the right and bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Whether the pixel `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}
