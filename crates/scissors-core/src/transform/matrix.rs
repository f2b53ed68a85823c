//! 2x3 affine matrix in the layout renderers expect.
//!
//! A point maps as:
//!
//! ```text
//! x' = sx * x + kx * y + tx
//! y' = ky * x + sy * y + ty
//! ```
//!
//! `post_*` operations apply after the current transform (the new operation
//! is left-multiplied), `pre_*` operations apply before it.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub sx: f32,
    pub kx: f32,
    pub tx: f32,
    pub ky: f32,
    pub sy: f32,
    pub ty: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        sx: 1.0,
        kx: 0.0,
        tx: 0.0,
        ky: 0.0,
        sy: 1.0,
        ty: 0.0,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            sx,
            sy,
            ..Self::IDENTITY
        }
    }

    /// Reset to identity.
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// `self = other * self`: apply `other` after the current transform.
    pub fn post_concat(&mut self, other: &Affine) {
        *self = other.multiply(self);
    }

    /// `self = self * other`: apply `other` before the current transform.
    pub fn pre_concat(&mut self, other: &Affine) {
        *self = self.multiply(other);
    }

    pub fn post_translate(&mut self, dx: f32, dy: f32) {
        self.post_concat(&Affine::translate(dx, dy));
    }

    pub fn post_scale(&mut self, sx: f32, sy: f32) {
        self.post_concat(&Affine::scale(sx, sy));
    }

    pub fn pre_translate(&mut self, dx: f32, dy: f32) {
        self.pre_concat(&Affine::translate(dx, dy));
    }

    /// Matrix product `self * rhs` (`rhs` applies first).
    pub fn multiply(&self, rhs: &Affine) -> Affine {
        Affine {
            sx: self.sx * rhs.sx + self.kx * rhs.ky,
            kx: self.sx * rhs.kx + self.kx * rhs.sy,
            tx: self.sx * rhs.tx + self.kx * rhs.ty + self.tx,
            ky: self.ky * rhs.sx + self.sy * rhs.ky,
            sy: self.ky * rhs.kx + self.sy * rhs.sy,
            ty: self.ky * rhs.tx + self.sy * rhs.ty + self.ty,
        }
    }

    /// Map a point through the transform.
    #[inline]
    pub fn map_point(&self, point: Point) -> Point {
        Point::new(
            self.sx * point.x + self.kx * point.y + self.tx,
            self.ky * point.x + self.sy * point.y + self.ty,
        )
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.sx * self.sy - self.kx * self.ky;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            sx: self.sy * inv,
            kx: -self.kx * inv,
            tx: (self.kx * self.ty - self.sy * self.tx) * inv,
            ky: -self.ky * inv,
            sy: self.sx * inv,
            ty: (self.ky * self.tx - self.sx * self.ty) * inv,
        })
    }

    /// Values in canvas `setTransform(a, b, c, d, e, f)` order.
    pub fn to_array(&self) -> [f32; 6] {
        [self.sx, self.ky, self.kx, self.sy, self.tx, self.ty]
    }
}
