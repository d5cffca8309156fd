//! WASM bindings for crop geometry.
//!
//! The preview draws the original onto a canvas sized to the resolved crop
//! rectangle, so the browser does the resampling. `extract_crop` is the
//! pure-pixel equivalent used by export.

use crate::adjustments::EditParams;
use crate::js_error;
use crate::types::JsRaster;
use f64_core::transform;
use f64_core::CropRect;
use wasm_bindgen::prelude::*;

/// Source rectangle of a crop, in original-image pixels.
///
/// Coordinates may be fractional; canvas `drawImage` accepts them as is.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether the rectangle covers any pixels
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl From<CropRect> for JsCropRect {
    fn from(rect: CropRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Resolve the crop in `params` against the original image size.
///
/// No clamping happens here; call `validate_crop` first if the values come
/// from user input.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const rect = resolve_crop(params, img.naturalWidth, img.naturalHeight);
/// canvas.width = rect.width;
/// canvas.height = rect.height;
/// ctx.drawImage(img, rect.x, rect.y, rect.width, rect.height, 0, 0, rect.width, rect.height);
/// ```
#[wasm_bindgen]
pub fn resolve_crop(params: &EditParams, width: u32, height: u32) -> JsCropRect {
    transform::resolve_crop(&params.inner().crop, width, height).into()
}

/// Throw if the crop in `params` is out of range or leaves no area.
#[wasm_bindgen]
pub fn validate_crop(params: &EditParams) -> Result<(), JsValue> {
    params.inner().crop.validate().map_err(js_error)
}

/// Copy the region the crop retains into a new image.
#[wasm_bindgen]
pub fn extract_crop(image: &JsRaster, params: &EditParams) -> Result<JsRaster, JsValue> {
    let cropped =
        transform::extract_crop(&image.to_raster(), &params.inner().crop).map_err(js_error)?;
    Ok(JsRaster::from_raster(cropped))
}
