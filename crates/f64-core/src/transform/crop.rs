//! Crop geometry and crop-region extraction.
//!
//! Crop amounts are percentages trimmed from each edge of the original
//! image, so they stay valid whatever resolution the source is decoded at.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner
//! - `left`/`right` trim along x, `top`/`bottom` along y
//! - Resolved rectangles are in source pixel units
//!
//! # Example
//!
//! ```ignore
//! // Trim 5% from the sides and 10% from top and bottom
//! let rect = resolve_crop(&Crop::new(10.0, 5.0, 5.0, 10.0), 2000, 1000);
//! assert_eq!((rect.x, rect.y, rect.width, rect.height), (100.0, 100.0, 1800.0, 800.0));
//! ```

use crate::raster::{Raster, BYTES_PER_PIXEL};
use crate::Crop;
use std::fmt;
use thiserror::Error;

/// Which pair of opposite edges a crop error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `left` + `right`
    Horizontal,
    /// `top` + `bottom`
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("left + right"),
            Axis::Vertical => f.write_str("top + bottom"),
        }
    }
}

/// Errors raised when a crop cannot produce a usable region.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// A single edge is not a finite percentage in `[0, 100)`.
    #[error("Crop {edge} must be in [0, 100), got {value}")]
    OutOfRange { edge: &'static str, value: f32 },

    /// Opposite edges trim the whole image away (or more).
    #[error("Crop {axis} must be below 100%, got {total}%")]
    Degenerate { axis: Axis, total: f32 },

    /// The region rounds down to zero pixels on the given source.
    #[error("Crop region is empty: {width}x{height} pixels")]
    EmptyRegion { width: f64, height: f64 },
}

impl Crop {
    /// Check the crop against its invariants before any buffer is allocated.
    pub fn validate(&self) -> Result<(), CropError> {
        for (edge, value) in [
            ("top", self.top),
            ("left", self.left),
            ("right", self.right),
            ("bottom", self.bottom),
        ] {
            if !value.is_finite() || !(0.0..100.0).contains(&value) {
                return Err(CropError::OutOfRange { edge, value });
            }
        }

        let horizontal = self.left + self.right;
        if horizontal >= 100.0 {
            return Err(CropError::Degenerate {
                axis: Axis::Horizontal,
                total: horizontal,
            });
        }
        let vertical = self.top + self.bottom;
        if vertical >= 100.0 {
            return Err(CropError::Degenerate {
                axis: Axis::Vertical,
                total: vertical,
            });
        }
        Ok(())
    }
}

/// Distance below a whole pixel that still counts as that pixel. Crop
/// percentages are `f32`, so `0.7%` of 1000 px resolves to 6.9999998.
const SNAP_EPSILON: f64 = 1e-3;

/// Floor, treating values just under an integer as that integer.
#[inline]
fn snap_floor(v: f64) -> f64 {
    (v + SNAP_EPSILON).floor()
}

/// Source rectangle of a crop, in (possibly fractional) pixel units.
///
/// Width or height can be zero or negative when the crop was never
/// validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer source rectangle, ready for buffer allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Resolve crop percentages against the original image dimensions.
///
/// Pure arithmetic: nothing is clamped, so an invalid crop shows up as a
/// zero or negative width/height.
pub fn resolve_crop(crop: &Crop, width: u32, height: u32) -> CropRect {
    let w = width as f64;
    let h = height as f64;
    let (top, left, right, bottom) = (
        crop.top as f64,
        crop.left as f64,
        crop.right as f64,
        crop.bottom as f64,
    );
    CropRect {
        x: left * w / 100.0,
        y: top * h / 100.0,
        width: w * (100.0 - (left + right)) / 100.0,
        height: h * (100.0 - (top + bottom)) / 100.0,
    }
}

impl CropRect {
    /// Whether the rectangle has positive area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Snap to whole pixels inside a `width` x `height` source.
    ///
    /// The origin is floored and the size truncated, the same way a canvas
    /// sizes itself from fractional dimensions. Values within
    /// `SNAP_EPSILON` below a whole pixel round up to it first.
    pub fn to_pixel_rect(&self, width: u32, height: u32) -> Result<PixelRect, CropError> {
        if !self.has_area() {
            return Err(CropError::EmptyRegion {
                width: self.width,
                height: self.height,
            });
        }

        let x = (snap_floor(self.x.max(0.0)) as u32).min(width);
        let y = (snap_floor(self.y.max(0.0)) as u32).min(height);
        let w = (snap_floor(self.width) as u32).min(width - x);
        let h = (snap_floor(self.height) as u32).min(height - y);

        if w == 0 || h == 0 {
            return Err(CropError::EmptyRegion {
                width: self.width,
                height: self.height,
            });
        }
        Ok(PixelRect {
            x,
            y,
            width: w,
            height: h,
        })
    }
}

/// Validate, resolve and snap a crop in one step.
pub fn checked_crop_rect(crop: &Crop, width: u32, height: u32) -> Result<PixelRect, CropError> {
    crop.validate()?;
    resolve_crop(crop, width, height).to_pixel_rect(width, height)
}

/// Copy the region retained by `crop` into a fresh raster.
///
/// The crop is validated first; an invalid crop never allocates.
pub fn extract_crop(image: &Raster, crop: &Crop) -> Result<Raster, CropError> {
    let rect = checked_crop_rect(crop, image.width, image.height)?;
    if rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * BYTES_PER_PIXEL;
    let row_bytes = rect.width as usize * BYTES_PER_PIXEL;
    let mut pixels = Vec::with_capacity(row_bytes * rect.height as usize);

    for row in image
        .pixels
        .chunks_exact(src_stride)
        .skip(rect.y as usize)
        .take(rect.height as usize)
    {
        let start = rect.x as usize * BYTES_PER_PIXEL;
        pixels.extend_from_slice(&row[start..start + row_bytes]);
    }

    Ok(Raster::new(rect.width, rect.height, pixels))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
