use serde::{Deserialize, Serialize};

use crate::{definitions::HISTOGRAM_BINS, raster::luma, Raster};

/// Luminance histogram with one bin per rounded luma value 0..=255.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Histogram {
    bins: Vec<u32>,
}

impl Histogram {
    #[must_use]
    pub fn from_raster(raster: &Raster) -> Self {
        let mut bins = vec![0u32; HISTOGRAM_BINS];
        for [r, g, b, _a] in raster.pixels() {
            let bin = (luma(r, g, b).round() as usize).min(HISTOGRAM_BINS - 1);
            bins[bin] += 1;
        }
        Self { bins }
    }

    #[must_use]
    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| u64::from(c)).sum()
    }

    /// The histogram as a probability distribution (sums to 1.0). An empty histogram
    /// normalizes to all zeros.
    #[must_use]
    pub fn normalized(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.bins.len()];
        }
        let total = total as f64;
        self.bins.iter().map(|&c| f64::from(c) / total).collect()
    }

    /// Histogram intersection of the two normalized distributions, scaled to 0..=100.
    #[must_use]
    pub fn intersection_similarity(&self, other: &Self) -> f64 {
        let intersection: f64 = self
            .normalized()
            .iter()
            .zip(other.normalized())
            .map(|(p, q)| p.min(q))
            .sum();

        (100.0 * intersection).clamp(0.0, 100.0)
    }
}
