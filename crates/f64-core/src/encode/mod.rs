//! Image encoding for export.
//!
//! The adjustment pipeline never encodes; the export path hands rendered
//! rasters to this module to turn them into file bytes.
//!
//! # Examples
//!
//! ```ignore
//! use f64_core::encode::{encode_jpeg, DEFAULT_QUALITY};
//!
//! let pixels = vec![128u8; 100 * 100 * 4]; // Gray RGBA image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, DEFAULT_QUALITY).unwrap();
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, encode_raster, EncodeError, DEFAULT_QUALITY};
