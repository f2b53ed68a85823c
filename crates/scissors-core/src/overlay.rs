//! Viewport overlay geometry.
//!
//! The overlay shades everything outside the viewport: four rectangles
//! around the centred viewport and, for [`Shape::Oval`], the corners of the
//! viewport outside its inscribed ellipse. Hosts can draw the rectangles
//! themselves or let [`Overlay::paint`] blend the shade into a rendered
//! frame.

use crate::config::{Shape, DEFAULT_OVERLAY_COLOR};
use crate::geometry::{Point, Rect};
use crate::load::{Bitmap, PixelFormat};
use serde::{Deserialize, Serialize};

/// Ellipse inscribed in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: f32,
    pub radius_y: f32,
}

impl Ellipse {
    /// Whether `point` lies inside or on the ellipse.
    pub fn contains(&self, point: Point) -> bool {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return false;
        }
        let dx = (point.x - self.center.x) / self.radius_x;
        let dy = (point.y - self.center.y) / self.radius_y;
        dx * dx + dy * dy <= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    view_width: u32,
    view_height: u32,
    viewport: Rect,
    shape: Shape,
    color: u32,
}

impl Overlay {
    pub fn new(
        view_width: u32,
        view_height: u32,
        viewport_width: u32,
        viewport_height: u32,
        shape: Shape,
    ) -> Self {
        let left = (view_width as i32 - viewport_width as i32) / 2;
        let top = (view_height as i32 - viewport_height as i32) / 2;
        Self {
            view_width,
            view_height,
            viewport: Rect::new(
                left,
                top,
                left + viewport_width as i32,
                top + viewport_height as i32,
            ),
            shape,
            color: DEFAULT_OVERLAY_COLOR,
        }
    }

    /// Shade color as `0xAARRGGBB`.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The viewport in view coordinates.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Shade bands in draw order: left, top, right, bottom.
    ///
    /// Left and right bands span the viewport rows; top and bottom bands
    /// span the full view width.
    pub fn shade_rects(&self) -> [Rect; 4] {
        let width = self.view_width as i32;
        let height = self.view_height as i32;
        let left = self.viewport.left;
        let top = self.viewport.top;

        [
            Rect::new(0, top, left, height - top),
            Rect::new(0, 0, width, top),
            Rect::new(width - left, top, width, height - top),
            Rect::new(0, height - top, width, height),
        ]
    }

    /// The inscribed ellipse for oval overlays.
    pub fn oval(&self) -> Option<Ellipse> {
        if self.shape != Shape::Oval || self.viewport.is_empty() {
            return None;
        }
        let rect = self.viewport;
        Some(Ellipse {
            center: Point::new(
                (rect.left + rect.right) as f32 / 2.0,
                (rect.top + rect.bottom) as f32 / 2.0,
            ),
            radius_x: rect.width() as f32 / 2.0,
            radius_y: rect.height() as f32 / 2.0,
        })
    }

    /// Whether the view pixel `(x, y)` is shaded.
    pub fn covers(&self, x: i32, y: i32) -> bool {
        if !self.viewport.contains(x, y) {
            return true;
        }
        match self.oval() {
            Some(ellipse) => !ellipse.contains(Point::new(x as f32 + 0.5, y as f32 + 0.5)),
            None => false,
        }
    }

    /// Blend the shade color into a rendered view frame.
    ///
    /// `frame` is expected to be view-sized; pixels beyond the view are left
    /// alone.
    pub fn paint(&self, frame: &mut Bitmap) {
        let [a, r, g, b] = self.color.to_be_bytes();
        let alpha = a as f32 / 255.0;
        let blend = |dst: u8, src: u8| (dst as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8;
        let gray = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8;

        let width = frame.width.min(self.view_width);
        let height = frame.height.min(self.view_height);
        let bpp = frame.format.bytes_per_pixel();
        let stride = frame.width as usize * bpp;

        for y in 0..height {
            for x in 0..width {
                if !self.covers(x as i32, y as i32) {
                    continue;
                }
                let idx = y as usize * stride + x as usize * bpp;
                let px = &mut frame.pixels[idx..idx + bpp];
                match frame.format {
                    PixelFormat::Gray8 => px[0] = blend(px[0], gray),
                    PixelFormat::Rgb8 | PixelFormat::Rgba8 => {
                        px[0] = blend(px[0], r);
                        px[1] = blend(px[1], g);
                        px[2] = blend(px[2], b);
                        if frame.format == PixelFormat::Rgba8 {
                            px[3] = blend(px[3], 255);
                        }
                    }
                }
            }
        }
    }
}
