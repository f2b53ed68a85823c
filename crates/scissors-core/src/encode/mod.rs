//! Bitmap encoding for export.
//!
//! # Examples
//!
//! ```ignore
//! use scissors_core::encode::{encode, CompressFormat};
//!
//! let bytes = encode(&bitmap, CompressFormat::Png, 100)?;
//! ```

mod codec;

pub use codec::{encode, encode_into, CompressFormat, EncodeError};
