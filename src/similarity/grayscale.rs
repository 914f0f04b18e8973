use serde::{Deserialize, Serialize};

use crate::{raster::luma, EngineResult, Error, Raster};

/// An NxN grid of rounded luminance samples taken from a raster, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrayscaleGrid {
    size: u32,
    values: Vec<u8>,
}

impl GrayscaleGrid {
    /// Nearest-neighbour downsample of `raster` to a `size` x `size` grid. Cell `(x, y)` takes
    /// the source pixel at `(floor(x * width / size), floor(y * height / size))`.
    ///
    /// # Errors
    /// [`Error::InvalidOptions`] if `size` is less than 2.
    pub fn from_raster(raster: &Raster, size: u32) -> EngineResult<Self> {
        if size < 2 {
            return Err(Error::InvalidOptions(format!(
                "grayscale grid size must be at least 2, got {size}"
            )));
        }

        let (width, height) = raster.dimensions();
        let n = u64::from(size);

        let mut values = Vec::with_capacity(size as usize * size as usize);
        for y in 0..n {
            let src_y = (y * u64::from(height) / n) as u32;
            for x in 0..n {
                let src_x = (x * u64::from(width) / n) as u32;
                let [r, g, b, _a] = raster.rgba(src_x, src_y);
                values.push(luma(r, g, b).round().min(255.0) as u8);
            }
        }

        Ok(Self { size, values })
    }

    /// Build a grid from precomputed values.
    ///
    /// # Errors
    /// [`Error::InvalidOptions`] if `size` is less than 2 or `values.len() != size * size`.
    pub fn from_values(size: u32, values: Vec<u8>) -> EngineResult<Self> {
        if size < 2 || values.len() != size as usize * size as usize {
            return Err(Error::InvalidOptions(format!(
                "a {size}x{size} grid cannot hold {} values",
                values.len()
            )));
        }
        Ok(Self { size, values })
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.values.chunks_exact(self.size as usize)
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        let total: u64 = self.values.iter().map(|&v| u64::from(v)).sum();
        total as f64 / self.values.len() as f64
    }
}
