use std::num::NonZeroU32;

use fast_image_resize::{
    images::{Image, ImageRef},
    PixelType, ResizeOptions, Resizer,
};
use image::RgbaImage;

use crate::{
    definitions::{LUMA_B, LUMA_G, LUMA_R},
    EngineResult, Error,
};

/// Luminance of one pixel using the BT.601 luma weights. Range 0.0..=255.0
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b)
}

/// A decoded frame: `width * height` RGBA pixels in row-major order.
///
/// A raster always has a nonzero area and exactly `width * height * 4` bytes of pixel data;
/// this is checked when it is created and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from raw RGBA bytes.
    ///
    /// # Errors
    /// [`Error::InvalidRaster`] if either dimension is zero or `pixels` does not hold exactly
    /// `width * height` RGBA quadruples.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> EngineResult<Self> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));

        match expected_len {
            Some(len) if width > 0 && height > 0 && len == pixels.len() => Ok(Self {
                width,
                height,
                pixels,
            }),
            _ => Err(Error::InvalidRaster {
                width,
                height,
                len: pixels.len(),
            }),
        }
    }

    pub fn from_rgba_image(img: RgbaImage) -> EngineResult<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The raw RGBA bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// An iterator over the `[r, g, b, a]` quadruples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.pixels
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// The pixel at column `x`, row `y`. Coordinates must be inside the raster.
    #[must_use]
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }

    /// BT.601 luminance of every pixel, row-major, unrounded.
    #[must_use]
    pub fn luma_plane(&self) -> Vec<f64> {
        self.pixels().map(|[r, g, b, _a]| luma(r, g, b)).collect()
    }

    /// Resample to the given size. Returns a copy if the raster already has that size.
    pub fn resized(&self, new_width: NonZeroU32, new_height: NonZeroU32) -> EngineResult<Self> {
        let (new_width, new_height) = (new_width.get(), new_height.get());
        if self.dimensions() == (new_width, new_height) {
            return Ok(self.clone());
        }

        let src = ImageRef::new(self.width, self.height, &self.pixels, PixelType::U8x4)
            .map_err(|e| Error::Resize(format!("{e}")))?;

        let mut dst = Image::new(new_width, new_height, PixelType::U8x4);

        // metrics only read RGB, so alpha must not be multiplied into the colour channels
        let options = ResizeOptions::new().use_alpha(false);

        let mut resizer = Resizer::new();
        resizer
            .resize(&src, &mut dst, Some(&options))
            .map_err(|e| Error::Resize(format!("{e}")))?;

        Self::new(new_width, new_height, dst.into_vec())
    }
}

//Utilities for testing
#[doc(hidden)]
#[cfg(any(feature = "test-util", test))]
pub mod test_util {
    use rand::prelude::*;

    use super::Raster;

    /// A rectangle in pixel coordinates: left, top, width, height.
    pub type Rect = (u32, u32, u32, u32);

    #[doc(hidden)]
    impl Raster {
        pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
            let pixels = (0..width * height).flat_map(|_| rgba).collect();
            Self::new(width, height, pixels).expect("solid raster dimensions are valid")
        }

        /// A solid raster with a single filled rectangle drawn over it.
        pub fn with_rect(
            width: u32,
            height: u32,
            background: [u8; 4],
            rect: Rect,
            fill: [u8; 4],
        ) -> Self {
            let (left, top, rect_w, rect_h) = rect;
            let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
            for y in 0..height {
                for x in 0..width {
                    let inside =
                        x >= left && x < left + rect_w && y >= top && y < top + rect_h;
                    pixels.extend(if inside { fill } else { background });
                }
            }
            Self::new(width, height, pixels).expect("rect raster dimensions are valid")
        }

        pub fn random_noise(width: u32, height: u32, rng: &mut StdRng) -> Self {
            let mut pixels = vec![0u8; width as usize * height as usize * 4];
            rng.fill_bytes(&mut pixels);
            for alpha in pixels.iter_mut().skip(3).step_by(4) {
                *alpha = u8::MAX;
            }
            Self::new(width, height, pixels).expect("noise raster dimensions are valid")
        }
    }
}
