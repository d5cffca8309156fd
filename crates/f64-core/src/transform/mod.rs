//! Geometric transforms applied before the adjustment pipeline.
//!
//! # Transform Order
//!
//! When rendering a photo, steps are applied in this order:
//! 1. Crop (percentages resolved against the decoded source)
//! 2. Adjustment pipeline on the cropped buffer

mod crop;

pub use crop::{checked_crop_rect, extract_crop, resolve_crop, Axis, CropError, CropRect, PixelRect};
