//! WASM-compatible wrapper types for image data.
//!
//! Converts between the core [`Raster`] and a JavaScript-friendly object
//! holding an RGBA buffer, the same layout as canvas `ImageData`.

use crate::js_error;
use f64_core::raster::rgba_len;
use f64_core::Raster;
use wasm_bindgen::prelude::*;

/// An RGBA8 image for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`; keep images in WASM memory between steps where possible.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create a raster from dimensions and RGBA pixel data.
    ///
    /// Throws if `pixels.length !== width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRaster, JsValue> {
        let expected = rgba_len(width, height);
        if pixels.len() != expected {
            return Err(js_error(format!(
                "expected {expected} bytes for a {width}x{height} RGBA image, got {}",
                pixels.len()
            )));
        }
        Ok(JsRaster {
            width,
            height,
            pixels,
        })
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as a Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsRaster {
    pub(crate) fn from_raster(img: Raster) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Clones the pixel data into a core raster.
    pub(crate) fn to_raster(&self) -> Raster {
        Raster::new(self.width, self.height, self.pixels.clone())
    }

    pub(crate) fn pixel_slice(&self) -> &[u8] {
        &self.pixels
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_js_raster_rejects_wrong_length() {
        assert!(JsRaster::new(10, 10, vec![0u8; 10 * 10 * 3]).is_err());
    }
}
