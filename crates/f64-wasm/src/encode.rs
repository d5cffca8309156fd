//! Export encoding WASM bindings.
//!
//! The browser owns the destination (a directory handle or a download
//! link); these functions produce the bytes and the file name it writes.
//!
//! # Example
//!
//! ```typescript
//! import { render, encode_jpeg_from_image, export_file_name, default_quality } from '@f64/wasm';
//!
//! const edited = render(original, params);
//! const jpeg = encode_jpeg_from_image(edited, default_quality());
//! const name = export_file_name(photo.name, !hasFolderAccess);
//! ```

use crate::js_error;
use crate::types::JsRaster;
use f64_core::encode;
use f64_core::export::{self, Destination, ExportConfig};
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to JPEG bytes.
///
/// Alpha is discarded. Throws if the buffer length does not match
/// `width * height * 4` or either dimension is zero.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, clamped)
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(js_error)
}

/// Encode a rendered image to JPEG bytes.
///
/// # Example
///
/// ```typescript
/// const jpeg = encode_jpeg_from_image(edited, 95);
/// const writable = await fileHandle.createWritable();
/// await writable.write(new Blob([jpeg], { type: 'image/jpeg' }));
/// await writable.close();
/// ```
#[wasm_bindgen]
pub fn encode_jpeg_from_image(image: &JsRaster, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(image.pixel_slice(), image.width(), image.height(), quality)
        .map_err(js_error)
}

/// File name an exported photo is written under.
///
/// Downloads get the `f64_` prefix; folder exports keep the original name.
#[wasm_bindgen]
pub fn export_file_name(name: &str, download: bool) -> String {
    let destination = if download {
        Destination::Download
    } else {
        Destination::Folder
    };
    export::export_file_name(destination, name, &ExportConfig::default())
}

/// JPEG quality used for exports
#[wasm_bindgen]
pub fn default_quality() -> u8 {
    encode::DEFAULT_QUALITY
}
