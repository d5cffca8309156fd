//! The per-pixel adjustment pipeline.
//!
//! Applies the tonal and colour controls of an [`EditParams`] to an RGBA8
//! buffer in place. Each pixel is processed independently; alpha is never
//! touched.
//!
//! ## Operator Order
//! 1. Exposure
//! 2. Contrast
//! 3. Temperature
//! 4. Tint
//! 5. Highlights
//! 6. Shadows
//! 7. Whites
//! 8. Blacks
//! 9. Saturation
//! 10. Vibrance
//!
//! Every operator is a no-op at `0.0`, and channels are rounded (not
//! truncated) back to 8 bits, so the neutral parameter set leaves the buffer
//! byte-identical.

use crate::raster::{rgba_len, BYTES_PER_PIXEL};
use crate::EditParams;

/// ITU-R BT.709 luma coefficients.
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Apply the full adjustment pipeline to an RGBA8 buffer in place.
///
/// The buffer is borrowed for the duration of the call; nothing is allocated.
/// Crop is not read here: the caller sizes the buffer to the cropped region
/// beforehand (see [`crate::transform::extract_crop`]).
///
/// # Panics
///
/// Panics if `pixels.len() != width * height * 4`.
///
/// # Example
/// ```
/// use f64_core::{apply_pipeline, EditParams};
///
/// let mut pixels = vec![64, 64, 64, 255]; // Single gray pixel
/// let mut params = EditParams::default();
/// params.exposure = 1.0; // +1 stop
///
/// apply_pipeline(&mut pixels, 1, 1, &params);
/// assert_eq!(pixels, vec![128, 128, 128, 255]);
/// ```
pub fn apply_pipeline(pixels: &mut [u8], width: u32, height: u32, params: &EditParams) {
    assert_eq!(
        pixels.len(),
        rgba_len(width, height),
        "pixel buffer does not match {width}x{height} RGBA dimensions"
    );

    if params.is_tonal_neutral() {
        return;
    }

    for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        let out = adjust_pixel(Rgb::from_bytes(px[0], px[1], px[2]), params);
        px[0] = to_byte(out.r);
        px[1] = to_byte(out.g);
        px[2] = to_byte(out.b);
    }
}

/// Run one pixel through every operator in order.
#[inline]
fn adjust_pixel(c: Rgb, p: &EditParams) -> Rgb {
    let c = exposure(c, p.exposure);
    let c = contrast(c, p.contrast);
    let c = temperature(c, p.temperature);
    let c = tint(c, p.tint);

    let lum = c.luminance();
    let c = highlights(c, lum, p.highlights);
    let c = shadows(c, lum, p.shadows);
    let c = whites(c, p.whites);
    let c = blacks(c, p.blacks);
    let c = saturation(c, p.saturation);
    vibrance(c, p.vibrance)
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Normalized RGB triple. Values may leave [0, 1] between operators.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb {
    r: f32,
    g: f32,
    b: f32,
}

impl Rgb {
    #[inline]
    fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    #[inline]
    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }

    #[inline]
    fn scale(self, k: f32) -> Self {
        self.map(|v| v * k)
    }

    #[inline]
    fn max(self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    #[inline]
    fn min(self) -> f32 {
        self.r.min(self.g).min(self.b)
    }

    #[inline]
    fn luminance(self) -> f32 {
        LUMA[0] * self.r + LUMA[1] * self.g + LUMA[2] * self.b
    }
}

/// Hermite interpolation between two edges. Edges may be given in either order.
#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Exposure in stops: `c * 2^ev`.
#[inline]
fn exposure(c: Rgb, ev: f32) -> Rgb {
    if ev == 0.0 {
        return c;
    }
    c.scale(2.0_f32.powf(ev))
}

/// Contrast around mid-gray: `(c - 0.5) * (1 + amount/100) + 0.5`.
#[inline]
fn contrast(c: Rgb, amount: f32) -> Rgb {
    if amount == 0.0 {
        return c;
    }
    let factor = 1.0 + amount / 100.0;
    c.map(|v| (v - 0.5) * factor + 0.5)
}

/// White balance temperature. Negative warms (red up, blue down), positive cools.
#[inline]
fn temperature(c: Rgb, amount: f32) -> Rgb {
    if amount == 0.0 {
        return c;
    }
    let shift = amount.abs() / 100.0 * 0.3;
    if amount < 0.0 {
        Rgb {
            r: c.r * (1.0 + shift),
            g: c.g,
            b: c.b * (1.0 - shift),
        }
    } else {
        Rgb {
            r: c.r * (1.0 - shift),
            g: c.g,
            b: c.b * (1.0 + shift),
        }
    }
}

/// Green/magenta tint. Negative boosts green, positive boosts red and blue.
#[inline]
fn tint(c: Rgb, amount: f32) -> Rgb {
    if amount == 0.0 {
        return c;
    }
    let shift = amount.abs() / 100.0 * 0.2;
    if amount < 0.0 {
        Rgb {
            g: c.g * (1.0 + shift),
            ..c
        }
    } else {
        Rgb {
            r: c.r * (1.0 + shift),
            g: c.g * (1.0 - shift),
            b: c.b * (1.0 + shift),
        }
    }
}

/// Shared shape of highlights and shadows: pull down multiplicatively,
/// lift additively, weighted by a luminance mask.
#[inline]
fn masked_tone(c: Rgb, mask: f32, amount: f32) -> Rgb {
    let weight = amount / 100.0 * mask;
    if amount < 0.0 {
        c.scale(1.0 + weight)
    } else {
        let lift = weight * 0.5;
        c.map(|v| v + lift)
    }
}

/// Highlights: only pixels with luminance above 0.5 are affected.
#[inline]
fn highlights(c: Rgb, lum: f32, amount: f32) -> Rgb {
    if amount == 0.0 {
        return c;
    }
    masked_tone(c, smoothstep(0.5, 1.0, lum), amount)
}

/// Shadows: only pixels with luminance below 0.5 are affected.
#[inline]
fn shadows(c: Rgb, lum: f32, amount: f32) -> Rgb {
    if amount == 0.0 {
        return c;
    }
    masked_tone(c, smoothstep(0.5, 0.0, lum), amount)
}

/// Whites: scales pixels whose brightest channel exceeds 0.9.
#[inline]
fn whites(c: Rgb, amount: f32) -> Rgb {
    if amount == 0.0 || c.max() <= 0.9 {
        return c;
    }
    c.scale(1.0 + amount / 100.0 * 0.3)
}

/// Blacks: scales pixels whose darkest channel is below 0.1.
#[inline]
fn blacks(c: Rgb, amount: f32) -> Rgb {
    if amount == 0.0 || c.min() >= 0.1 {
        return c;
    }
    c.scale(1.0 + amount / 100.0 * 0.2)
}

/// Saturation relative to BT.709 luminance. -100 yields grayscale.
#[inline]
fn saturation(c: Rgb, amount: f32) -> Rgb {
    if amount == 0.0 {
        return c;
    }
    let gray = c.luminance();
    let factor = 1.0 + amount / 100.0;
    c.map(|v| gray + (v - gray) * factor)
}

/// Vibrance: saturation that backs off on already-saturated colours and
/// on skin tones (R > G > B).
#[inline]
fn vibrance(c: Rgb, amount: f32) -> Rgb {
    if amount == 0.0 {
        return c;
    }
    // HSV saturation of the displayable colour, so it stays in [0, 1].
    let shown = c.map(|v| v.clamp(0.0, 1.0));
    let max = shown.max();
    let current_sat = if max > 0.0 { (max - shown.min()) / max } else { 0.0 };

    let is_skin = c.r > c.g && c.g > c.b && (c.r - c.g) > 0.06;
    let skin_protection = if is_skin { 0.5 } else { 1.0 };

    saturation(c, amount * skin_protection * (1.0 - current_sat))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(r: u8, g: u8, b: u8) -> Vec<u8> {
        vec![r, g, b, 255]
    }

    fn apply(pixels: &[u8], params: &EditParams) -> Vec<u8> {
        let mut result = pixels.to_vec();
        let count = (result.len() / 4) as u32;
        apply_pipeline(&mut result, count, 1, params);
        result
    }

    fn with(f: impl FnOnce(&mut EditParams)) -> EditParams {
        let mut params = EditParams::default();
        f(&mut params);
        params
    }

    /// Every byte value on every channel, alpha varying too.
    fn gradient_buffer() -> Vec<u8> {
        (0..=255u8)
            .flat_map(|v| [v, 255 - v, v / 2, v.wrapping_mul(7)])
            .collect()
    }

    // ===== Identity Tests =====

    #[test]
    fn test_neutral_params_are_identity() {
        let pixels = gradient_buffer();
        assert_eq!(apply(&pixels, &EditParams::default()), pixels);
    }

    #[test]
    fn test_crop_only_params_do_not_touch_pixels() {
        let pixels = gradient_buffer();
        let params = with(|p| p.crop.left = 20.0);
        assert_eq!(apply(&pixels, &params), pixels);
    }

    #[test]
    fn test_byte_round_trip_is_exact() {
        for v in 0..=255u8 {
            assert_eq!(to_byte(v as f32 / 255.0), v);
        }
    }

    #[test]
    fn test_each_operator_is_noop_at_zero() {
        let c = Rgb::from_bytes(200, 90, 30);
        let lum = c.luminance();
        assert_eq!(exposure(c, 0.0), c);
        assert_eq!(contrast(c, 0.0), c);
        assert_eq!(temperature(c, 0.0), c);
        assert_eq!(tint(c, 0.0), c);
        assert_eq!(highlights(c, lum, 0.0), c);
        assert_eq!(shadows(c, lum, 0.0), c);
        assert_eq!(whites(c, 0.0), c);
        assert_eq!(blacks(c, 0.0), c);
        assert_eq!(saturation(c, 0.0), c);
        assert_eq!(vibrance(c, 0.0), c);
    }

    // ===== Contract Tests =====

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_buffer_size_mismatch_panics() {
        let mut pixels = vec![0u8; 10];
        apply_pipeline(&mut pixels, 2, 2, &with(|p| p.exposure = 1.0));
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_buffer_size_mismatch_panics_even_for_neutral() {
        let mut pixels = vec![0u8; 12];
        apply_pipeline(&mut pixels, 2, 2, &EditParams::default());
    }

    #[test]
    fn test_empty_buffer() {
        let mut pixels: Vec<u8> = vec![];
        apply_pipeline(&mut pixels, 0, 0, &with(|p| p.exposure = 1.0));
        assert!(pixels.is_empty());
    }

    #[test]
    fn test_alpha_preserved() {
        let pixels = gradient_buffer();
        let params = with(|p| {
            p.exposure = 2.0;
            p.contrast = 60.0;
            p.saturation = -40.0;
            p.tint = 30.0;
        });
        let result = apply(&pixels, &params);
        for (before, after) in pixels.chunks_exact(4).zip(result.chunks_exact(4)) {
            assert_eq!(before[3], after[3]);
        }
    }

    // ===== Exposure Tests =====

    #[test]
    fn test_exposure_positive_one_stop() {
        let result = apply(&pixel(64, 64, 64), &with(|p| p.exposure = 1.0));
        assert_eq!(result, pixel(128, 128, 128));
    }

    #[test]
    fn test_exposure_negative_one_stop() {
        let result = apply(&pixel(128, 128, 128), &with(|p| p.exposure = -1.0));
        assert_eq!(result, pixel(64, 64, 64));
    }

    #[test]
    fn test_exposure_clips_at_white() {
        let result = apply(&pixel(200, 200, 200), &with(|p| p.exposure = 2.0));
        assert_eq!(result, pixel(255, 255, 255));
    }

    // ===== Contrast Tests =====

    #[test]
    fn test_contrast_positive_spreads_from_midpoint() {
        let result = apply(&pixel(64, 128, 192), &with(|p| p.contrast = 100.0));
        assert!(result[0] < 64, "Dark channel should get darker");
        assert!((result[1] as i32 - 128).abs() <= 2, "Mid channel stays near middle");
        assert_eq!(result[2], 255, "Bright channel should clip at white");
    }

    #[test]
    fn test_contrast_negative_pulls_to_midpoint() {
        let result = apply(&pixel(0, 128, 255), &with(|p| p.contrast = -50.0));
        assert!(result[0] > 0);
        assert!((result[1] as i32 - 128).abs() <= 2);
        assert!(result[2] < 255);
    }

    // ===== White Balance Tests =====

    #[test]
    fn test_temperature_warm_and_cool() {
        let warm = apply(&pixel(128, 128, 128), &with(|p| p.temperature = -100.0));
        assert!(warm[0] > 128 && warm[2] < 128);
        assert_eq!(warm[1], 128);

        let cool = apply(&pixel(128, 128, 128), &with(|p| p.temperature = 100.0));
        assert!(cool[0] < 128 && cool[2] > 128);
        assert_eq!(cool[1], 128);
    }

    #[test]
    fn test_tint_green() {
        let result = apply(&pixel(128, 128, 128), &with(|p| p.tint = -100.0));
        assert!(result[1] > 128);
        assert_eq!(result[0], 128);
        assert_eq!(result[2], 128);
    }

    #[test]
    fn test_tint_magenta() {
        let result = apply(&pixel(128, 128, 128), &with(|p| p.tint = 100.0));
        assert!(result[0] > 128);
        assert!(result[1] < 128);
        assert!(result[2] > 128);
    }

    // ===== Tonal Range Tests =====

    #[test]
    fn test_highlights_leave_dark_pixels() {
        let dark = pixel(30, 30, 30);
        assert_eq!(apply(&dark, &with(|p| p.highlights = 80.0)), dark);
        assert_eq!(apply(&dark, &with(|p| p.highlights = -80.0)), dark);
    }

    #[test]
    fn test_highlights_recover_bright_pixels() {
        let result = apply(&pixel(240, 240, 240), &with(|p| p.highlights = -100.0));
        assert!(result[0] < 240);
    }

    #[test]
    fn test_shadows_leave_bright_pixels() {
        let bright = pixel(220, 220, 220);
        assert_eq!(apply(&bright, &with(|p| p.shadows = 80.0)), bright);
    }

    #[test]
    fn test_shadows_lift_dark_pixels() {
        let result = apply(&pixel(30, 30, 30), &with(|p| p.shadows = 100.0));
        assert!(result[0] > 30);
    }

    #[test]
    fn test_whites_clip_near_white() {
        let result = apply(&pixel(240, 240, 240), &with(|p| p.whites = 100.0));
        assert_eq!(result[0], 255);
    }

    #[test]
    fn test_blacks_affect_dark_only() {
        let params = with(|p| p.blacks = 50.0);
        assert!(apply(&pixel(20, 20, 20), &params)[0] > 20);
        assert_eq!(apply(&pixel(128, 128, 128), &params), pixel(128, 128, 128));
    }

    // ===== Colour Tests =====

    #[test]
    fn test_saturation_increase() {
        let result = apply(&pixel(200, 128, 100), &with(|p| p.saturation = 50.0));
        assert!(result[0] as i32 - result[2] as i32 > 100);
    }

    #[test]
    fn test_full_desaturation_is_gray() {
        let result = apply(&pixel(200, 128, 100), &with(|p| p.saturation = -100.0));
        assert_eq!(result[0], result[1]);
        assert_eq!(result[1], result[2]);
    }

    #[test]
    fn test_vibrance_leaves_saturated_colour() {
        let red = pixel(255, 0, 0);
        assert_eq!(apply(&red, &with(|p| p.vibrance = 100.0)), red);
    }

    #[test]
    fn test_vibrance_boosts_muted_colour() {
        let result = apply(&pixel(120, 130, 140), &with(|p| p.vibrance = 100.0));
        assert!(result[2] as i32 - result[0] as i32 > 20);
    }

    #[test]
    fn test_vibrance_is_gentler_on_skin() {
        let skin = pixel(200, 150, 120);
        let params = with(|p| p.vibrance = 100.0);
        let vib = apply(&skin, &params);
        let sat = apply(&skin, &with(|p| p.saturation = 100.0));
        assert!(vib[0] as i32 - vib[2] as i32 <= sat[0] as i32 - sat[2] as i32);
    }

    #[test]
    fn test_vibrance_after_contrast_does_not_desaturate() {
        // Contrast pushes red below zero before vibrance sees the pixel
        let source = pixel(20, 120, 140);
        let contrasted = apply(&source, &with(|p| p.contrast = 100.0));
        let vivid = apply(
            &source,
            &with(|p| {
                p.contrast = 100.0;
                p.vibrance = 100.0;
            }),
        );

        let spread = |px: &[u8]| px[..3].iter().max().unwrap() - px[..3].iter().min().unwrap();
        assert!(spread(&vivid) >= spread(&contrasted));
        assert!(vivid[2] as i32 - vivid[1] as i32 >= contrasted[2] as i32 - contrasted[1] as i32);
        assert!(vivid[0] <= contrasted[0]);
    }

    // ===== Ordering Tests =====

    #[test]
    fn test_exposure_runs_before_contrast() {
        // 2x then spread: 64 -> 128 -> ~128. The other order would give 0 -> 0.
        let params = with(|p| {
            p.exposure = 1.0;
            p.contrast = 100.0;
        });
        let result = apply(&pixel(64, 64, 64), &params);
        assert!((result[0] as i32 - 128).abs() <= 2);
    }

    #[test]
    fn test_pixels_are_independent() {
        let params = with(|p| {
            p.exposure = 0.7;
            p.shadows = 40.0;
            p.vibrance = 30.0;
        });
        let a = pixel(10, 80, 200);
        let b = pixel(250, 240, 5);
        let mut both = a.clone();
        both.extend_from_slice(&b);

        let together = apply(&both, &params);
        let mut separate = apply(&a, &params);
        separate.extend(apply(&b, &params));
        assert_eq!(together, separate);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let all_max = with(|p| {
            p.exposure = 5.0;
            p.contrast = 100.0;
            p.highlights = 100.0;
            p.shadows = 100.0;
            p.whites = 100.0;
            p.blacks = 100.0;
        });
        assert_eq!(apply(&pixel(128, 128, 128), &all_max), pixel(255, 255, 255));

        let all_min = with(|p| {
            p.exposure = -5.0;
            p.contrast = 100.0;
        });
        assert_eq!(apply(&pixel(128, 100, 60), &all_min), pixel(0, 0, 0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
