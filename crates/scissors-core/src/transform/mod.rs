//! Affine transforms and the crop rasterizer.
//!
//! The engine expresses the image placement as an [`Affine`]; renderers draw
//! with it and [`crop`] rasterizes the viewport through the same matrix.

mod crop;
mod matrix;

pub use crop::{crop, render};
pub use matrix::Affine;
