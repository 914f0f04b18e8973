use serde::{Deserialize, Serialize};

use crate::{
    similarity::{
        aggregator::perceptual_hash_similarity,
        embedding::FeatureVector,
        grayscale::GrayscaleGrid,
        hashing::{average_hash, difference_hash, hamming_similarity, perceptual_hash, HashBits},
        histogram::Histogram,
        scalar_metrics::{
            brightness, compare_brightness, compare_keypoints, compare_texture, keypoint_count,
            texture,
        },
    },
    ComparisonOptions, EngineResult, Metric, MetricSet, Raster,
};

/// Everything about a single raster that the pairwise metrics need, except SSIM (which is
/// computed from both rasters together).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaFingerprint {
    average_hash: HashBits,
    difference_hash: HashBits,
    perceptual_hash: HashBits,
    histogram: Histogram,
    brightness: f64,
    texture: f64,
    keypoints: u32,
    embedding: FeatureVector,
}

impl MediaFingerprint {
    /// # Errors
    /// [`crate::Error::InvalidOptions`] if `opts.grid_size` is less than 2.
    pub fn from_raster(raster: &Raster, opts: &ComparisonOptions) -> EngineResult<Self> {
        let grid = GrayscaleGrid::from_raster(raster, opts.grid_size)?;

        Ok(Self {
            average_hash: average_hash(&grid),
            difference_hash: difference_hash(&grid),
            perceptual_hash: perceptual_hash(&grid),
            histogram: Histogram::from_raster(raster),
            brightness: brightness(raster),
            texture: texture(raster),
            keypoints: keypoint_count(raster, opts.keypoint_threshold),
            embedding: FeatureVector::from_raster(raster, opts.edge_threshold),
        })
    }

    #[must_use]
    pub const fn average_hash(&self) -> &HashBits {
        &self.average_hash
    }

    #[must_use]
    pub const fn difference_hash(&self) -> &HashBits {
        &self.difference_hash
    }

    #[must_use]
    pub const fn perceptual_hash(&self) -> &HashBits {
        &self.perceptual_hash
    }

    #[must_use]
    pub const fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    #[must_use]
    pub const fn brightness(&self) -> f64 {
        self.brightness
    }

    #[must_use]
    pub const fn texture(&self) -> f64 {
        self.texture
    }

    #[must_use]
    pub const fn keypoints(&self) -> u32 {
        self.keypoints
    }

    #[must_use]
    pub const fn embedding(&self) -> &FeatureVector {
        &self.embedding
    }

    /// Compare two fingerprints, producing every single-raster metric: perceptualHash,
    /// colorHistogram, brightness, texture, keypoints and embedding.
    ///
    /// # Errors
    /// [`crate::Error::HashLengthMismatch`] if the fingerprints were built with different grid
    /// sizes.
    pub fn compare(&self, other: &Self, opts: &ComparisonOptions) -> EngineResult<MetricSet> {
        let hashes = perceptual_hash_similarity(
            hamming_similarity(&self.average_hash, &other.average_hash)?,
            hamming_similarity(&self.difference_hash, &other.difference_hash)?,
            hamming_similarity(&self.perceptual_hash, &other.perceptual_hash)?,
        );

        let mut metrics = MetricSet::new();
        metrics
            .insert(Metric::PerceptualHash, hashes)
            .insert(
                Metric::ColorHistogram,
                self.histogram.intersection_similarity(&other.histogram),
            )
            .insert(
                Metric::Brightness,
                compare_brightness(self.brightness, other.brightness),
            )
            .insert(
                Metric::Texture,
                compare_texture(self.texture, other.texture, opts.texture_normalization),
            )
            .insert(
                Metric::Keypoints,
                compare_keypoints(self.keypoints, other.keypoints),
            )
            .insert(
                Metric::Embedding,
                self.embedding.cosine_similarity(&other.embedding),
            );

        Ok(metrics)
    }
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;
    use crate::Error;

    #[test]
    fn test_self_comparison_is_100() {
        let mut rng = StdRng::seed_from_u64(41);
        let opts = ComparisonOptions::default();
        for _ in 0..10 {
            let raster = Raster::random_noise(32, 32, &mut rng);
            let fp = MediaFingerprint::from_raster(&raster, &opts).expect("valid options");
            let metrics = fp.compare(&fp, &opts).expect("same grid size");
            assert_eq!(metrics.len(), 6);
            for (metric, score) in metrics.iter() {
                assert!((score - 100.0).abs() < 1e-9, "{metric}: {score}");
            }
        }
    }

    #[test]
    fn test_comparison_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(42);
        let opts = ComparisonOptions::default();
        for _ in 0..10 {
            let a = MediaFingerprint::from_raster(&Raster::random_noise(24, 24, &mut rng), &opts)
                .expect("valid options");
            let b = MediaFingerprint::from_raster(&Raster::random_noise(24, 24, &mut rng), &opts)
                .expect("valid options");

            let ab = a.compare(&b, &opts).expect("same grid size");
            let ba = b.compare(&a, &opts).expect("same grid size");
            for ((m1, s1), (m2, s2)) in ab.iter().zip(ba.iter()) {
                assert_eq!(m1, m2);
                assert!((s1 - s2).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_different_grid_sizes_fail() {
        let raster = Raster::solid(16, 16, [50, 60, 70, 255]);
        let small = ComparisonOptions::default();
        let large = ComparisonOptions {
            grid_size: 16,
            ..ComparisonOptions::default()
        };

        let a = MediaFingerprint::from_raster(&raster, &small).expect("valid options");
        let b = MediaFingerprint::from_raster(&raster, &large).expect("valid options");
        assert!(matches!(
            a.compare(&b, &small),
            Err(Error::HashLengthMismatch { left: 64, right: 256 })
        ));
    }

    #[test]
    fn test_black_and_white_differ_only_outside_the_hashes() {
        let opts = ComparisonOptions::default();
        let black = MediaFingerprint::from_raster(&Raster::solid(16, 16, [0, 0, 0, 255]), &opts)
            .expect("valid options");
        let white =
            MediaFingerprint::from_raster(&Raster::solid(16, 16, [255, 255, 255, 255]), &opts)
                .expect("valid options");

        let metrics = black.compare(&white, &opts).expect("same grid size");
        assert_eq!(metrics.get(Metric::PerceptualHash), Some(100.0));
        assert_eq!(metrics.get(Metric::ColorHistogram), Some(0.0));
        assert_eq!(metrics.get(Metric::Brightness), Some(0.0));
        assert_eq!(metrics.get(Metric::Texture), Some(100.0));
        assert_eq!(metrics.get(Metric::Keypoints), Some(100.0));
        assert_eq!(metrics.get(Metric::Embedding), Some(0.0));
    }
}
