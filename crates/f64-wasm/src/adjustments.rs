//! Edit parameter and pipeline bindings.
//!
//! `EditParams` wraps the core parameter set so the sidebar can read and
//! write individual controls. The UI still replaces the set wholesale: build
//! or clone a fresh `EditParams` per edit rather than sharing one.

use crate::js_error;
use crate::types::JsRaster;
use f64_core::raster::rgba_len;
use f64_core::Crop;
use wasm_bindgen::prelude::*;

/// Edit parameters wrapper for JavaScript
#[wasm_bindgen]
#[derive(Clone)]
pub struct EditParams {
    inner: f64_core::EditParams,
}

macro_rules! slider {
    ($get:ident, $set:ident, $($field:ident).+) => {
        #[wasm_bindgen]
        impl EditParams {
            #[wasm_bindgen(getter)]
            pub fn $get(&self) -> f32 {
                self.inner.$($field).+
            }

            #[wasm_bindgen(setter)]
            pub fn $set(&mut self, value: f32) {
                self.inner.$($field).+ = value;
            }
        }
    };
}

slider!(exposure, set_exposure, exposure);
slider!(contrast, set_contrast, contrast);
slider!(highlights, set_highlights, highlights);
slider!(shadows, set_shadows, shadows);
slider!(whites, set_whites, whites);
slider!(blacks, set_blacks, blacks);
slider!(temperature, set_temperature, temperature);
slider!(tint, set_tint, tint);
slider!(vibrance, set_vibrance, vibrance);
slider!(saturation, set_saturation, saturation);
slider!(crop_top, set_crop_top, crop.top);
slider!(crop_left, set_crop_left, crop.left);
slider!(crop_right, set_crop_right, crop.right);
slider!(crop_bottom, set_crop_bottom, crop.bottom);

#[wasm_bindgen]
impl EditParams {
    /// Create new parameters with neutral values
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: f64_core::DEFAULT_PARAMS,
        }
    }

    /// Replace all four crop edges at once (percentages).
    pub fn set_crop(&mut self, top: f32, left: f32, right: f32, bottom: f32) {
        self.inner.crop = Crop::new(top, left, right, bottom);
    }

    /// Independent copy, for wholesale replacement on edit.
    #[wasm_bindgen(js_name = clone)]
    pub fn duplicate(&self) -> EditParams {
        self.clone()
    }

    /// Copy with every slider clamped to its range
    pub fn clamped(&self) -> EditParams {
        Self {
            inner: self.inner.clamped(),
        }
    }

    /// Whether any control differs from the neutral set
    pub fn is_edited(&self) -> bool {
        f64_core::is_edited(&self.inner)
    }

    /// Serialize to a plain JS object for storage (presets, clipboard)
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(js_error)
    }

    /// Deserialize from a plain JS object; missing fields are neutral
    pub fn from_json(value: JsValue) -> Result<EditParams, JsValue> {
        let inner: f64_core::EditParams = serde_wasm_bindgen::from_value(value).map_err(js_error)?;
        Ok(Self { inner })
    }
}

impl Default for EditParams {
    fn default() -> Self {
        Self::new()
    }
}

impl EditParams {
    pub(crate) fn inner(&self) -> &f64_core::EditParams {
        &self.inner
    }
}

/// Run the adjustment pipeline over an RGBA buffer in place.
///
/// `pixels` is typically `ImageData.data` of the already-cropped canvas.
/// Crop values in `params` are ignored here.
///
/// Throws if the buffer length is not `width * height * 4`.
///
/// # Example (TypeScript)
/// ```typescript
/// const data = ctx.getImageData(0, 0, w, h);
/// apply_pipeline(data.data, w, h, params);
/// ctx.putImageData(data, 0, 0);
/// ```
#[wasm_bindgen]
pub fn apply_pipeline(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    params: &EditParams,
) -> Result<(), JsValue> {
    let expected = rgba_len(width, height);
    if pixels.len() != expected {
        return Err(js_error(format!(
            "pixel buffer has {} bytes, expected {expected} for {width}x{height}",
            pixels.len()
        )));
    }
    f64_core::apply_pipeline(pixels, width, height, params.inner());
    Ok(())
}

/// Crop and adjust a decoded original, returning the edited image.
///
/// The source image is left untouched. Used by both preview and export.
#[wasm_bindgen]
pub fn render(image: &JsRaster, params: &EditParams) -> Result<JsRaster, JsValue> {
    let out = f64_core::render(&image.to_raster(), params.inner()).map_err(js_error)?;
    Ok(JsRaster::from_raster(out))
}
