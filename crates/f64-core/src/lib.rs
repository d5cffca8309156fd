//! f64 Core - Image adjustment library
//!
//! This crate provides the editing core of the f64 photo editor: the edit
//! parameter model, crop geometry, the per-pixel adjustment pipeline, and the
//! render/encode/export path built on top of it.

pub mod adjustments;
pub mod encode;
pub mod export;
pub mod raster;
pub mod render;
pub mod session;
pub mod transform;

pub use adjustments::apply_pipeline;
pub use raster::Raster;
pub use render::render;
pub use transform::{checked_crop_rect, extract_crop, resolve_crop, CropError, CropRect, PixelRect};

use serde::{Deserialize, Serialize};

/// Crop amounts, as percentages trimmed from each edge of the original image.
///
/// Each value lies in `[0, 100)` and opposite edges must sum to less than 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crop {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Crop {
    /// No trimming on any edge.
    pub const NONE: Crop = Crop {
        top: 0.0,
        left: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn new(top: f32, left: f32, right: f32, bottom: f32) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }
}

impl Default for Crop {
    fn default() -> Self {
        Self::NONE
    }
}

/// The full set of editing controls for one photo.
///
/// A parameter set is replaced wholesale on every edit and is read-only while
/// the pipeline runs. Every tonal field is neutral at `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditParams {
    /// Crop percentages
    pub crop: Crop,
    /// Exposure adjustment (-5 to 5 stops)
    pub exposure: f32,
    /// Contrast (-100 to 100)
    pub contrast: f32,
    /// Highlights (-100 to 100)
    pub highlights: f32,
    /// Shadows (-100 to 100)
    pub shadows: f32,
    /// Whites (-100 to 100)
    pub whites: f32,
    /// Blacks (-100 to 100)
    pub blacks: f32,
    /// White balance temperature (-100 to 100)
    pub temperature: f32,
    /// White balance tint (-100 to 100)
    pub tint: f32,
    /// Vibrance (-100 to 100)
    pub vibrance: f32,
    /// Saturation (-100 to 100)
    pub saturation: f32,
}

/// The neutral parameter set. The pipeline is an identity transform under it.
pub const DEFAULT_PARAMS: EditParams = EditParams {
    crop: Crop::NONE,
    exposure: 0.0,
    contrast: 0.0,
    highlights: 0.0,
    shadows: 0.0,
    whites: 0.0,
    blacks: 0.0,
    temperature: 0.0,
    tint: 0.0,
    vibrance: 0.0,
    saturation: 0.0,
};

/// Exposure range in stops.
pub const EXPOSURE_RANGE: (f32, f32) = (-5.0, 5.0);

/// Range shared by every slider other than exposure.
pub const SLIDER_RANGE: (f32, f32) = (-100.0, 100.0);

impl Default for EditParams {
    fn default() -> Self {
        DEFAULT_PARAMS
    }
}

impl EditParams {
    /// Create a new parameter set with neutral values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the tonal controls are all neutral, ignoring crop.
    pub fn is_tonal_neutral(&self) -> bool {
        Self {
            crop: Crop::NONE,
            ..*self
        } == DEFAULT_PARAMS
    }

    /// Copy with every tonal control clamped to its documented range.
    ///
    /// Crop is left alone; see [`Crop::validate`] for that.
    pub fn clamped(&self) -> Self {
        let slider = |v: f32| v.clamp(SLIDER_RANGE.0, SLIDER_RANGE.1);
        Self {
            crop: self.crop,
            exposure: self.exposure.clamp(EXPOSURE_RANGE.0, EXPOSURE_RANGE.1),
            contrast: slider(self.contrast),
            highlights: slider(self.highlights),
            shadows: slider(self.shadows),
            whites: slider(self.whites),
            blacks: slider(self.blacks),
            temperature: slider(self.temperature),
            tint: slider(self.tint),
            vibrance: slider(self.vibrance),
            saturation: slider(self.saturation),
        }
    }
}

/// Whether a parameter set differs from [`DEFAULT_PARAMS`].
pub fn is_edited(params: &EditParams) -> bool {
    *params != DEFAULT_PARAMS
}
