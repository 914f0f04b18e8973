use std::time::Instant;

use log::{debug, info};

use crate::{
    similarity::{
        aggregator::overall_similarity, identity::is_byte_identical, ssim::ssim_lite,
        temporal::placeholder_temporal_scores,
    },
    ComparisonOptions, EngineResult, Error, MediaFile, MediaFingerprint, MediaRasterSource,
    Metric, MetricSet, Profile, Raster, RasterSource, SimilarityResult,
};

/// Compares pairs of media files.
///
/// Use the default constructor [`SimilarityEngine::default`] unless
/// supplying custom options or a custom [`RasterSource`].
#[derive(Debug, Clone)]
pub struct SimilarityEngine<S = MediaRasterSource> {
    options: ComparisonOptions,
    source: S,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        let options = ComparisonOptions::default();
        Self {
            source: MediaRasterSource::from_options(&options),
            options,
        }
    }
}

impl SimilarityEngine {
    /// Create an engine with the selected [`ComparisonOptions`], decoding files with a
    /// [`MediaRasterSource`].
    ///
    /// # Errors
    /// [`Error::InvalidOptions`] if the options are not valid.
    pub fn from_options(options: ComparisonOptions) -> EngineResult<Self> {
        let source = MediaRasterSource::from_options(&options);
        Self::with_source(options, source)
    }
}

impl<S: RasterSource> SimilarityEngine<S> {
    /// Create an engine that decodes files with `source`.
    ///
    /// # Errors
    /// [`Error::InvalidOptions`] if the options are not valid.
    pub fn with_source(options: ComparisonOptions, source: S) -> EngineResult<Self> {
        options.validate()?;
        Ok(Self { options, source })
    }

    #[must_use]
    pub const fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Compare two files.
    ///
    /// Byte-identical files are reported as 100% similar on every metric without being decoded.
    /// Otherwise both files must be of the same media kind; `profile` selects the weights used
    /// to fuse the metrics and whether the temporal placeholder metrics are reported.
    ///
    /// # Errors
    /// * [`Error::UnsupportedMediaType`] / [`Error::UnsupportedMediaPair`] if the files cannot
    ///   be compared.
    /// * [`Error::Decode`] if either file cannot be decoded.
    pub fn compare(
        &self,
        first: &MediaFile,
        second: &MediaFile,
        profile: Profile,
    ) -> EngineResult<SimilarityResult> {
        let start = Instant::now();
        let weights = self.options.weights(profile);

        if is_byte_identical(first.bytes(), second.bytes()) {
            let metrics = MetricSet::uniform(profile, 100.0);
            let result = SimilarityResult {
                overall_similarity: overall_similarity(weights, &metrics),
                metrics,
                is_identical: true,
                processing_time_ms: elapsed_ms(start),
                profile,
                source_descriptors: (first.descriptor(), second.descriptor()),
            };
            info!(
                "{} and {} are byte-identical",
                first.name(),
                second.name()
            );
            return Ok(result);
        }

        let (first_kind, second_kind) = (first.kind()?, second.kind()?);
        if first_kind != second_kind {
            return Err(Error::UnsupportedMediaPair {
                first: first_kind,
                second: second_kind,
            });
        }

        let (first_raster, second_raster) = rayon::join(
            || self.source.decode(first, first_kind),
            || self.source.decode(second, second_kind),
        );
        let metrics = self.compare_rasters(&first_raster?, &second_raster?, profile)?;

        let result = SimilarityResult {
            overall_similarity: overall_similarity(weights, &metrics),
            metrics,
            is_identical: false,
            processing_time_ms: elapsed_ms(start),
            profile,
            source_descriptors: (first.descriptor(), second.descriptor()),
        };

        info!(
            "{} vs {}: {:.2}% similar ({profile} profile, {} ms)",
            first.name(),
            second.name(),
            result.overall_similarity,
            result.processing_time_ms
        );

        Ok(result)
    }

    /// Compute every metric of `profile` for two already-decoded rasters. The rasters need not
    /// have the same size.
    ///
    /// # Errors
    /// Only if the engine's options are inconsistent, which [`Self::with_source`] rules out.
    pub fn compare_rasters(
        &self,
        first: &Raster,
        second: &Raster,
        profile: Profile,
    ) -> EngineResult<MetricSet> {
        let opts = &self.options;

        let ((first_fp, second_fp), ssim) = rayon::join(
            || {
                rayon::join(
                    || MediaFingerprint::from_raster(first, opts),
                    || MediaFingerprint::from_raster(second, opts),
                )
            },
            || ssim_lite(first, second, opts.ssim_size),
        );

        let mut metrics = first_fp?.compare(&second_fp?, opts)?;
        metrics.insert(Metric::Ssim, 100.0 * ssim?);

        if profile.has_temporal_metrics() {
            let (repeated_frames, temporal_similarity) =
                placeholder_temporal_scores(opts.placeholder_seed);
            metrics
                .insert(Metric::RepeatedFrames, repeated_frames)
                .insert(Metric::TemporalSimilarity, temporal_similarity);
        }

        for (metric, score) in metrics.iter() {
            debug!("{metric}: {score:.2}");
        }

        Ok(metrics)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;

    #[test]
    fn test_invalid_options_are_rejected() {
        let opts = ComparisonOptions {
            grid_size: 0,
            ..ComparisonOptions::default()
        };
        assert!(matches!(
            SimilarityEngine::from_options(opts),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_raster_self_comparison() {
        let mut rng = StdRng::seed_from_u64(51);
        let engine = SimilarityEngine::default();
        let raster = Raster::random_noise(64, 64, &mut rng);

        let metrics = engine
            .compare_rasters(&raster, &raster, Profile::Image)
            .expect("valid options");
        assert_eq!(metrics.len(), Profile::Image.metrics().len());
        for (metric, score) in metrics.iter() {
            assert!((score - 100.0).abs() < 1e-6, "{metric}: {score}");
        }
    }

    #[test]
    fn test_video_profile_adds_placeholders() {
        let raster = Raster::solid(16, 16, [90, 90, 90, 255]);
        let engine = SimilarityEngine::default();

        let metrics = engine
            .compare_rasters(&raster, &raster, Profile::Video)
            .expect("valid options");
        assert_eq!(metrics.len(), 9);

        let (repeated, temporal) = placeholder_temporal_scores(0);
        assert_eq!(metrics.get(Metric::RepeatedFrames), Some(repeated));
        assert_eq!(metrics.get(Metric::TemporalSimilarity), Some(temporal));
    }

    #[test]
    fn test_rasters_of_different_sizes() {
        let small = Raster::solid(10, 10, [40, 80, 120, 255]);
        let large = Raster::solid(300, 200, [40, 80, 120, 255]);
        let engine = SimilarityEngine::default();

        let metrics = engine
            .compare_rasters(&small, &large, Profile::Image)
            .expect("valid options");
        assert_eq!(metrics.get(Metric::PerceptualHash), Some(100.0));
        assert_eq!(metrics.get(Metric::ColorHistogram), Some(100.0));
        assert_eq!(metrics.get(Metric::Brightness), Some(100.0));
    }
}
