use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{definitions::WEIGHT_SUM_TOLERANCE, EngineResult, Error, MediaKind};

/// Selects the weight table used to fuse the metrics, and whether the temporal placeholder
/// metrics are reported.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, enum_utils::FromStr,
)]
#[serde(rename_all = "lowercase")]
#[enumeration(case_insensitive)]
pub enum Profile {
    Image,
    Video,
}

impl Profile {
    #[must_use]
    pub const fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::Image,
            MediaKind::Video => Self::Video,
        }
    }

    #[must_use]
    pub const fn has_temporal_metrics(self) -> bool {
        matches!(self, Self::Video)
    }

    /// Every metric reported under this profile, in display order.
    #[must_use]
    pub fn metrics(self) -> &'static [Metric] {
        use Metric::*;
        match self {
            Self::Image => &[
                PerceptualHash,
                ColorHistogram,
                Brightness,
                Texture,
                Keypoints,
                Ssim,
                Embedding,
            ],
            Self::Video => &[
                PerceptualHash,
                ColorHistogram,
                Brightness,
                Texture,
                Keypoints,
                Ssim,
                Embedding,
                RepeatedFrames,
                TemporalSimilarity,
            ],
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// One component of the similarity score.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PerceptualHash,
    ColorHistogram,
    Brightness,
    Texture,
    Keypoints,
    Ssim,
    Embedding,
    RepeatedFrames,
    TemporalSimilarity,
}

impl Metric {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PerceptualHash => "perceptualHash",
            Self::ColorHistogram => "colorHistogram",
            Self::Brightness => "brightness",
            Self::Texture => "texture",
            Self::Keypoints => "keypoints",
            Self::Ssim => "ssim",
            Self::Embedding => "embedding",
            Self::RepeatedFrames => "repeatedFrames",
            Self::TemporalSimilarity => "temporalSimilarity",
        }
    }

    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::RepeatedFrames | Self::TemporalSimilarity)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-metric scores, each in 0..=100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(BTreeMap<Metric, f64>);

impl MetricSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every metric of `profile` set to the same score.
    #[must_use]
    pub fn uniform(profile: Profile, score: f64) -> Self {
        let mut set = Self::new();
        for &metric in profile.metrics() {
            set.insert(metric, score);
        }
        set
    }

    /// Record a score, clamped to 0..=100. NaN is recorded as 0.
    pub fn insert(&mut self, metric: Metric, score: f64) -> &mut Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 100.0)
        };
        self.0.insert(metric, score);
        self
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(&m, &s)| (m, s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Non-negative per-metric weights summing to 1.0. Metrics without an entry have weight 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightProfile(BTreeMap<Metric, f64>);

impl WeightProfile {
    #[must_use]
    pub fn from_weights(weights: impl IntoIterator<Item = (Metric, f64)>) -> Self {
        Self(weights.into_iter().collect())
    }

    /// The default image weights. SSIM is reported but not weighted.
    #[must_use]
    pub fn image_standard() -> Self {
        use Metric::*;
        Self::from_weights([
            (PerceptualHash, 0.25),
            (ColorHistogram, 0.20),
            (Brightness, 0.15),
            (Texture, 0.15),
            (Keypoints, 0.10),
            (Embedding, 0.15),
        ])
    }

    /// Image weights dominated by the hashes and SSIM.
    #[must_use]
    pub fn image_structural() -> Self {
        use Metric::*;
        Self::from_weights([
            (PerceptualHash, 0.30),
            (Ssim, 0.35),
            (Brightness, 0.15),
            (ColorHistogram, 0.20),
        ])
    }

    #[must_use]
    pub fn video_standard() -> Self {
        use Metric::*;
        Self::from_weights([
            (PerceptualHash, 0.20),
            (ColorHistogram, 0.15),
            (Brightness, 0.10),
            (Texture, 0.10),
            (Keypoints, 0.10),
            (Embedding, 0.10),
            (RepeatedFrames, 0.10),
            (TemporalSimilarity, 0.15),
        ])
    }

    #[must_use]
    pub fn weight(&self, metric: Metric) -> f64 {
        self.0.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(&m, &w)| (m, w))
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Check that the weights can be used under `profile`.
    ///
    /// # Errors
    /// [`Error::InvalidOptions`] if a weight is negative or not finite, the weights do not sum to
    /// 1.0, or a metric that `profile` does not report has a nonzero weight.
    pub fn validate(&self, profile: Profile) -> EngineResult<()> {
        if let Some((metric, weight)) = self.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidOptions(format!(
                "{profile} weight for {metric} must be a non-negative number, got {weight}"
            )));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidOptions(format!(
                "{profile} weights must sum to 1.0, got {sum}"
            )));
        }

        let reported = profile.metrics();
        if let Some((metric, _)) = self.iter().find(|(m, w)| *w > 0.0 && !reported.contains(m)) {
            let reason = if metric.is_temporal() {
                "only the video profile reports temporal metrics"
            } else {
                "it is not computed for this profile"
            };
            return Err(Error::InvalidOptions(format!(
                "{metric} cannot be weighted under the {profile} profile: {reason}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        assert_eq!(WeightProfile::image_standard().validate(Profile::Image), Ok(()));
        assert_eq!(WeightProfile::image_structural().validate(Profile::Image), Ok(()));
        assert_eq!(WeightProfile::video_standard().validate(Profile::Video), Ok(()));
    }

    #[test]
    fn test_ssim_is_unweighted_in_standard_image_profile() {
        assert_eq!(WeightProfile::image_standard().weight(Metric::Ssim), 0.0);
        assert_eq!(WeightProfile::image_structural().weight(Metric::Ssim), 0.35);
    }

    #[test]
    fn test_bad_sum_is_rejected() {
        let weights = WeightProfile::from_weights([
            (Metric::PerceptualHash, 0.30),
            (Metric::ColorHistogram, 0.20),
            (Metric::Brightness, 0.15),
            (Metric::Texture, 0.15),
            (Metric::Keypoints, 0.10),
            (Metric::Embedding, 0.15),
        ]);
        assert!(matches!(
            weights.validate(Profile::Image),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let weights =
            WeightProfile::from_weights([(Metric::PerceptualHash, 1.5), (Metric::Ssim, -0.5)]);
        assert!(weights.validate(Profile::Image).is_err());
    }

    #[test]
    fn test_temporal_weights_need_video_profile() {
        let video = WeightProfile::video_standard();
        assert!(matches!(
            video.validate(Profile::Image),
            Err(Error::InvalidOptions(msg)) if msg.contains("only the video profile")
        ));

        let temporal = Profile::Video
            .metrics()
            .iter()
            .filter(|m| m.is_temporal())
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(temporal, [Metric::RepeatedFrames, Metric::TemporalSimilarity]);
        assert!(Profile::Image.metrics().iter().all(|m| !m.is_temporal()));
    }

    #[test]
    fn test_metric_set_clamps_scores() {
        let mut set = MetricSet::new();
        set.insert(Metric::Brightness, 120.0)
            .insert(Metric::Texture, -3.0)
            .insert(Metric::Ssim, f64::NAN);
        assert_eq!(set.get(Metric::Brightness), Some(100.0));
        assert_eq!(set.get(Metric::Texture), Some(0.0));
        assert_eq!(set.get(Metric::Ssim), Some(0.0));
        assert_eq!(set.get(Metric::Keypoints), None);
    }

    #[test]
    fn test_uniform_covers_profile() {
        assert_eq!(MetricSet::uniform(Profile::Image, 100.0).len(), 7);
        let video = MetricSet::uniform(Profile::Video, 100.0);
        assert_eq!(video.len(), 9);
        assert!(video.iter().all(|(_, s)| s == 100.0));
    }

    #[test]
    fn test_metric_names_match_serde() {
        for &metric in Profile::Video.metrics() {
            let json = serde_json::to_string(&metric).expect("serializable");
            assert_eq!(json, format!("\"{metric}\""));
        }
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("image".parse::<Profile>(), Ok(Profile::Image));
        assert_eq!("VIDEO".parse::<Profile>(), Ok(Profile::Video));
        assert!("audio".parse::<Profile>().is_err());
    }

    #[test]
    fn test_weight_profile_json_is_a_plain_map() {
        let json = serde_json::to_string(&WeightProfile::image_structural()).expect("serializable");
        assert_eq!(
            json,
            r#"{"perceptualHash":0.3,"colorHistogram":0.2,"brightness":0.15,"ssim":0.35}"#
        );
    }
}
