use serde::{Deserialize, Serialize};

use crate::{
    definitions::{EDGE_DENSITY_SCALE, EMBEDDING_DIMS},
    Raster,
};

/// A small colour/edge descriptor of a raster:
/// `[mean_r, mean_g, mean_b, var_r, var_g, var_b, edge_density * 1000]`.
///
/// Variances are population variances. Edge density is the fraction of pixels whose luminance
/// differs from the left or the top neighbour by more than the edge threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; EMBEDDING_DIMS]);

impl FeatureVector {
    #[must_use]
    pub fn from_raster(raster: &Raster, edge_threshold: f64) -> Self {
        let n = raster.pixel_count() as f64;

        let mut sums = [0.0f64; 3];
        let mut squares = [0.0f64; 3];
        for px in raster.pixels() {
            for c in 0..3 {
                let v = f64::from(px[c]);
                sums[c] += v;
                squares[c] += v * v;
            }
        }

        let means = sums.map(|s| s / n);
        let mut vector = [0.0; EMBEDDING_DIMS];
        for c in 0..3 {
            vector[c] = means[c];
            // E[x^2] - E[x]^2 can dip just below zero from rounding
            vector[3 + c] = (squares[c] / n - means[c] * means[c]).max(0.0);
        }
        vector[6] = edge_density(raster, edge_threshold) * EDGE_DENSITY_SCALE;

        Self(vector)
    }

    #[must_use]
    pub const fn from_components(components: [f64; EMBEDDING_DIMS]) -> Self {
        Self(components)
    }

    #[must_use]
    pub const fn components(&self) -> &[f64; EMBEDDING_DIMS] {
        &self.0
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Cosine similarity scaled to 0..=100. If either vector has zero norm (an all-black raster)
    /// the similarity is 0, even against itself.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        let norms = self.norm() * other.norm();
        if norms == 0.0 {
            return 0.0;
        }

        let dot: f64 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
        (100.0 * dot / norms).clamp(0.0, 100.0)
    }
}

fn edge_density(raster: &Raster, edge_threshold: f64) -> f64 {
    let width = raster.width() as usize;
    let luma = raster.luma_plane();

    let edges = luma
        .iter()
        .enumerate()
        .filter(|&(idx, &value)| {
            let (x, y) = (idx % width, idx / width);
            let left = x > 0 && (value - luma[idx - 1]).abs() > edge_threshold;
            let top = y > 0 && (value - luma[idx - width]).abs() > edge_threshold;
            left || top
        })
        .count();

    edges as f64 / luma.len() as f64
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;
    use crate::definitions::DEFAULT_EDGE_THRESHOLD;

    #[test]
    fn test_solid_raster_components() {
        let raster = Raster::solid(10, 10, [10, 20, 30, 255]);
        let v = FeatureVector::from_raster(&raster, DEFAULT_EDGE_THRESHOLD);
        assert_eq!(v.components(), &[10.0, 20.0, 30.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_variance_is_population_variance() {
        // half 0, half 200 in the red channel: mean 100, variance 100^2
        let raster = Raster::with_rect(10, 10, [0, 0, 0, 255], (0, 0, 5, 10), [200, 0, 0, 255]);
        let v = FeatureVector::from_raster(&raster, DEFAULT_EDGE_THRESHOLD);
        assert!((v.components()[0] - 100.0).abs() < 1e-9);
        assert!((v.components()[3] - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_density() {
        // a vertical white line in a black 10x10 raster: the line and the column to its right
        // both differ from their left neighbour.
        let raster = Raster::with_rect(10, 10, [0, 0, 0, 255], (4, 0, 1, 10), [255, 255, 255, 255]);
        let v = FeatureVector::from_raster(&raster, DEFAULT_EDGE_THRESHOLD);
        assert!((v.components()[6] - 0.2 * EDGE_DENSITY_SCALE).abs() < 1e-9);
    }

    #[test]
    fn test_self_similarity_is_100() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let raster = Raster::random_noise(16, 16, &mut rng);
            let v = FeatureVector::from_raster(&raster, DEFAULT_EDGE_THRESHOLD);
            assert!((v.cosine_similarity(&v) - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_all_black_has_zero_similarity_even_with_itself() {
        let raster = Raster::solid(8, 8, [0, 0, 0, 255]);
        let v = FeatureVector::from_raster(&raster, DEFAULT_EDGE_THRESHOLD);
        assert_eq!(v.norm(), 0.0);
        assert_eq!(v.cosine_similarity(&v), 0.0);
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..200 {
            let a = FeatureVector::from_components(std::array::from_fn(|_| rng.gen_range(0.0..1000.0)));
            let b = FeatureVector::from_components(std::array::from_fn(|_| rng.gen_range(0.0..1000.0)));
            let ab = a.cosine_similarity(&b);
            assert!((0.0..=100.0).contains(&ab));
            assert!((ab - b.cosine_similarity(&a)).abs() < 1e-9);
        }
    }
}
