//! Owned RGBA8 raster images.
//!
//! Decoded source images and rendered results travel through the render and
//! export path as [`Raster`]s. The adjustment pipeline itself only ever sees
//! the borrowed pixel slice.

/// Bytes per pixel in every buffer this crate handles (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// Expected buffer length for an RGBA8 image of the given dimensions.
#[inline]
pub fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

/// An RGBA8 image with row-major pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from dimensions and pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            rgba_len(width, height),
            "Pixel buffer size mismatch for {width}x{height} RGBA image"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a raster filled with one colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(rgba_len(width, height))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Read one pixel. Returns `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.pixels[idx..idx + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }
}
