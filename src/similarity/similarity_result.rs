use serde::{Deserialize, Serialize};

use crate::{MetricSet, Profile};

/// Identifies one of the two compared files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
}

/// The outcome of comparing two files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    pub(crate) overall_similarity: f64,
    pub(crate) metrics: MetricSet,
    pub(crate) is_identical: bool,
    pub(crate) processing_time_ms: u64,
    pub(crate) profile: Profile,
    pub(crate) source_descriptors: (SourceDescriptor, SourceDescriptor),
}

impl SimilarityResult {
    /// Weighted overall score in 0..=100, rounded to two decimal places.
    #[must_use]
    pub const fn overall_similarity(&self) -> f64 {
        self.overall_similarity
    }

    #[must_use]
    pub const fn metrics(&self) -> &MetricSet {
        &self.metrics
    }

    /// True if the two files were byte-for-byte identical, in which case nothing was decoded.
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.is_identical
    }

    #[must_use]
    pub const fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }

    #[must_use]
    pub const fn profile(&self) -> Profile {
        self.profile
    }

    #[must_use]
    pub const fn source_descriptors(&self) -> &(SourceDescriptor, SourceDescriptor) {
        &self.source_descriptors
    }

    /// Whether the overall score reaches `threshold` (0..=100).
    #[must_use]
    pub fn is_duplicate(&self, threshold: f64) -> bool {
        self.is_identical || self.overall_similarity >= threshold
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Metric;

    fn descriptor(name: &str) -> SourceDescriptor {
        SourceDescriptor {
            name: name.to_string(),
            byte_size: 10,
            mime_type: "image/png".to_string(),
        }
    }

    fn result(overall: f64, identical: bool) -> SimilarityResult {
        SimilarityResult {
            overall_similarity: overall,
            metrics: MetricSet::uniform(Profile::Image, overall),
            is_identical: identical,
            processing_time_ms: 3,
            profile: Profile::Image,
            source_descriptors: (descriptor("a.png"), descriptor("b.png")),
        }
    }

    #[test]
    fn test_is_duplicate() {
        assert!(result(90.0, false).is_duplicate(90.0));
        assert!(!result(89.99, false).is_duplicate(90.0));
        assert!(result(100.0, true).is_duplicate(100.0));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(result(50.0, false)).expect("serializable");
        assert_eq!(json["overallSimilarity"], 50.0);
        assert_eq!(json["isIdentical"], false);
        assert_eq!(json["processingTimeMs"], 3);
        assert_eq!(json["profile"], "image");
        assert_eq!(json["metrics"][Metric::PerceptualHash.name()], 50.0);
        assert_eq!(json["sourceDescriptors"][0]["byteSize"], 10);
        assert_eq!(json["sourceDescriptors"][1]["mimeType"], "image/png");
    }
}
