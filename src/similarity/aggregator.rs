use crate::{MetricSet, WeightProfile};

/// Combined score of the three hash similarities: their arithmetic mean.
#[must_use]
pub fn perceptual_hash_similarity(average: f64, difference: f64, perceptual: f64) -> f64 {
    (average + difference + perceptual) / 3.0
}

/// Weighted sum of the metric scores, rounded to two decimal places. Metrics missing from
/// `metrics` contribute 0; metrics missing from `weights` have weight 0.
#[must_use]
pub fn overall_similarity(weights: &WeightProfile, metrics: &MetricSet) -> f64 {
    let weighted: f64 = weights
        .iter()
        .map(|(metric, weight)| weight * metrics.get(metric).unwrap_or(0.0))
        .sum();

    round_to_hundredths(weighted.clamp(0.0, 100.0))
}

#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;
    use crate::{Metric, Profile};

    #[test]
    fn test_all_hundred_gives_hundred() {
        for (profile, weights) in [
            (Profile::Image, WeightProfile::image_standard()),
            (Profile::Image, WeightProfile::image_structural()),
            (Profile::Video, WeightProfile::video_standard()),
        ] {
            let metrics = MetricSet::uniform(profile, 100.0);
            assert_eq!(overall_similarity(&weights, &metrics), 100.0);
        }
    }

    #[test]
    fn test_all_zero_gives_zero() {
        let metrics = MetricSet::uniform(Profile::Video, 0.0);
        assert_eq!(overall_similarity(&WeightProfile::video_standard(), &metrics), 0.0);
    }

    #[test]
    fn test_weighted_sum() {
        let mut metrics = MetricSet::uniform(Profile::Image, 0.0);
        metrics.insert(Metric::PerceptualHash, 100.0);
        metrics.insert(Metric::Ssim, 100.0);

        assert_eq!(overall_similarity(&WeightProfile::image_standard(), &metrics), 25.0);
        assert_eq!(overall_similarity(&WeightProfile::image_structural(), &metrics), 65.0);
    }

    #[test]
    fn test_missing_metric_counts_as_zero() {
        let mut metrics = MetricSet::new();
        metrics.insert(Metric::ColorHistogram, 50.0);
        assert_eq!(overall_similarity(&WeightProfile::image_standard(), &metrics), 10.0);
    }

    #[test]
    fn test_result_is_bounded_and_rounded() {
        let mut rng = StdRng::seed_from_u64(31);
        let weights = WeightProfile::video_standard();
        for _ in 0..1_000 {
            let mut metrics = MetricSet::new();
            for &metric in Profile::Video.metrics() {
                metrics.insert(metric, rng.gen_range(0.0..=100.0));
            }
            let overall = overall_similarity(&weights, &metrics);
            assert!((0.0..=100.0).contains(&overall));
            assert!(((overall * 100.0).round() - overall * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_perceptual_hash_mean() {
        assert_eq!(perceptual_hash_similarity(100.0, 100.0, 100.0), 100.0);
        assert_eq!(perceptual_hash_similarity(90.0, 60.0, 90.0), 80.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_hundredths(12.344), 12.34);
        assert_eq!(round_to_hundredths(12.346), 12.35);
        assert_eq!(round_to_hundredths(100.0), 100.0);
    }
}
