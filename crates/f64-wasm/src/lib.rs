//! f64 WASM - WebAssembly bindings for the f64 photo editor
//!
//! This crate exposes the f64-core editing pipeline to the TypeScript
//! front-end.
//!
//! # Module Structure
//!
//! - `adjustments` - Edit parameters, the in-place pipeline and `render`
//! - `transform` - Crop geometry and crop extraction
//! - `encode` - JPEG encoding and export file naming
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { EditParams, apply_pipeline, resolve_crop } from '@f64/wasm';
//!
//! await init();
//!
//! const params = new EditParams();
//! params.exposure = 0.5;
//!
//! const rect = resolve_crop(params, img.width, img.height);
//! ctx.drawImage(img, rect.x, rect.y, rect.width, rect.height, 0, 0, rect.width, rect.height);
//! const data = ctx.getImageData(0, 0, canvas.width, canvas.height);
//! apply_pipeline(data.data, canvas.width, canvas.height, params);
//! ctx.putImageData(data, 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod encode;
mod transform;
mod types;

// Re-export public types
pub use adjustments::{apply_pipeline, render, EditParams};
pub use encode::{default_quality, encode_jpeg, encode_jpeg_from_image, export_file_name};
pub use transform::{extract_crop, resolve_crop, validate_crop, JsCropRect};
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("f64 wasm {} ready", version());
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert any displayable error into a JS exception value.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
