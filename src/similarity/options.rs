use serde::{Deserialize, Serialize};

use crate::{
    definitions::{
        DEFAULT_DECODE_TIMEOUT_SECS, DEFAULT_EDGE_THRESHOLD, DEFAULT_FRAME_OFFSET_SECS,
        DEFAULT_GRID_SIZE, DEFAULT_KEYPOINT_THRESHOLD, DEFAULT_RASTER_SIZE, DEFAULT_SSIM_SIZE,
        DEFAULT_TEXTURE_NORMALIZATION,
    },
    EngineResult, Error, Profile, WeightProfile,
};

/// The two built-in image weight tables.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, enum_utils::FromStr,
)]
#[serde(rename_all = "lowercase")]
#[enumeration(case_insensitive)]
pub enum ImageWeightPreset {
    /// Hashes, histogram, brightness, texture, keypoints and embedding. SSIM is reported but
    /// carries no weight.
    Standard,
    /// Hashes, SSIM, brightness and histogram only.
    Structural,
}

impl ImageWeightPreset {
    #[must_use]
    pub fn weights(self) -> WeightProfile {
        match self {
            Self::Standard => WeightProfile::image_standard(),
            Self::Structural => WeightProfile::image_structural(),
        }
    }
}

/// Options controlling how files are decoded and how the metrics are computed and fused.
///
/// Every field has a default, so a partial JSON document is a valid set of options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Side length of the grayscale grid the hashes are built from. Larger grids give longer
    /// hashes that are more sensitive to small changes.
    ///
    /// Minimum: 2
    pub grid_size: u32,

    /// Decoded frames are resampled to a square of this side length before any metric is
    /// computed.
    pub raster_size: u32,

    /// Both rasters are resampled to a square of this side length before SSIM is computed.
    pub ssim_size: u32,

    /// Gradient magnitude above which a pixel counts as a keypoint.
    pub keypoint_threshold: f64,

    /// Luminance step above which a pixel counts as an edge in the embedding vector.
    pub edge_threshold: f64,

    /// Divisor applied to the texture difference. Texture differences larger than this score 0.
    pub texture_normalization: f64,

    /// Where in a video the compared frame is taken from. Videos shorter than this are sampled
    /// from their first frame instead.
    ///
    /// Unit: Seconds
    pub frame_offset_secs: f64,

    /// Maximum time a single video frame extraction may take.
    ///
    /// Unit: Seconds
    pub decode_timeout_secs: u64,

    /// Seed for the placeholder temporal metrics of the video profile.
    pub placeholder_seed: u64,

    pub image_weights: WeightProfile,

    pub video_weights: WeightProfile,
}

impl std::default::Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            raster_size: DEFAULT_RASTER_SIZE,
            ssim_size: DEFAULT_SSIM_SIZE,
            keypoint_threshold: DEFAULT_KEYPOINT_THRESHOLD,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            texture_normalization: DEFAULT_TEXTURE_NORMALIZATION,
            frame_offset_secs: DEFAULT_FRAME_OFFSET_SECS,
            decode_timeout_secs: DEFAULT_DECODE_TIMEOUT_SECS,
            placeholder_seed: 0,
            image_weights: WeightProfile::image_standard(),
            video_weights: WeightProfile::video_standard(),
        }
    }
}

impl ComparisonOptions {
    /// Replace the image weights with one of the built-in tables.
    pub fn with_image_preset(&mut self, preset: ImageWeightPreset) -> &mut Self {
        self.image_weights = preset.weights();
        self
    }

    #[must_use]
    pub const fn weights(&self, profile: Profile) -> &WeightProfile {
        match profile {
            Profile::Image => &self.image_weights,
            Profile::Video => &self.video_weights,
        }
    }

    /// # Errors
    /// [`Error::InvalidOptions`] describing the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |msg: String| Err(Error::InvalidOptions(msg));

        if self.grid_size < 2 {
            return invalid(format!("grid_size must be at least 2, got {}", self.grid_size));
        }
        if self.raster_size == 0 {
            return invalid("raster_size must be nonzero".to_string());
        }
        if self.ssim_size == 0 {
            return invalid("ssim_size must be nonzero".to_string());
        }
        if !(self.texture_normalization.is_finite() && self.texture_normalization > 0.0) {
            return invalid(format!(
                "texture_normalization must be positive, got {}",
                self.texture_normalization
            ));
        }
        for (name, value) in [
            ("keypoint_threshold", self.keypoint_threshold),
            ("edge_threshold", self.edge_threshold),
            ("frame_offset_secs", self.frame_offset_secs),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if self.decode_timeout_secs == 0 {
            return invalid("decode_timeout_secs must be nonzero".to_string());
        }

        self.image_weights.validate(Profile::Image)?;
        self.video_weights.validate(Profile::Video)?;

        Ok(())
    }
}
