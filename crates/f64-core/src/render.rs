//! Render a photo: crop extraction followed by the adjustment pipeline.
//!
//! Preview and export both go through [`render`], so what the viewport shows
//! is byte-for-byte what gets encoded.

use crate::adjustments::apply_pipeline;
use crate::raster::Raster;
use crate::transform::{extract_crop, CropError};
use crate::EditParams;

/// Produce the edited image for `source` under `params`.
///
/// The source is never modified; the cropped region is copied into a fresh
/// raster which the pipeline then edits in place.
pub fn render(source: &Raster, params: &EditParams) -> Result<Raster, CropError> {
    let mut out = extract_crop(source, &params.crop)?;
    log::debug!(
        "render {}x{} -> {}x{}",
        source.width,
        source.height,
        out.width,
        out.height
    );
    apply_pipeline(&mut out.pixels, out.width, out.height, params);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Crop, DEFAULT_PARAMS};

    #[test]
    fn test_render_neutral_is_copy() {
        let source = Raster::filled(8, 6, [90, 120, 150, 255]);
        let out = render(&source, &DEFAULT_PARAMS).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_render_crops_then_adjusts() {
        let source = Raster::filled(10, 10, [64, 64, 64, 128]);
        let mut params = EditParams::new();
        params.crop = Crop::new(0.0, 50.0, 0.0, 0.0);
        params.exposure = 1.0;

        let out = render(&source, &params).unwrap();
        assert_eq!((out.width, out.height), (5, 10));
        assert_eq!(out.pixel(0, 0), Some([128, 128, 128, 128]));
        // Source untouched
        assert_eq!(source.pixel(0, 0), Some([64, 64, 64, 128]));
    }

    #[test]
    fn test_render_rejects_bad_crop() {
        let source = Raster::filled(10, 10, [0, 0, 0, 255]);
        let mut params = EditParams::new();
        params.crop = Crop::new(70.0, 0.0, 0.0, 30.0);
        assert!(matches!(
            render(&source, &params),
            Err(CropError::Degenerate { .. })
        ));
    }
}
