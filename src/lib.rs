#![allow(clippy::let_and_return)]
#![allow(clippy::len_without_is_empty)]
#![warn(clippy::cast_lossless)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::todo)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::unimplemented)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![allow(clippy::doc_markdown)]

//! # Overview
//! `media_similarity_lib` estimates how visually similar two media files are. Both files are
//! reduced to a single RGBA raster (an image is decoded directly, a video contributes one frame
//! sampled one second in), a set of independent metrics is computed on the two rasters, and the
//! metrics are fused into one overall score between 0 and 100.
//!
//! # High Level API
//! ```rust,no_run
//! use media_similarity_lib::{MediaFile, Profile, SimilarityEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let first = MediaFile::new("cat.png", "image/png", std::fs::read("cat.png")?);
//! let second = MediaFile::new("cat_edited.jpg", "image/jpeg", std::fs::read("cat_edited.jpg")?);
//!
//! let engine = SimilarityEngine::default();
//! let result = engine.compare(&first, &second, Profile::Image)?;
//!
//! println!("{:.2}% similar", result.overall_similarity());
//! for (metric, score) in result.metrics().iter() {
//!     println!("{metric}: {score:.2}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # How it works
//! If both files are byte-for-byte identical no decoding is done at all and every metric is
//! reported as 100. Otherwise each file is decoded to a square raster (256x256 by default) and the
//! following metrics are computed, in parallel:
//!
//! * **perceptualHash**: the mean Hamming similarity of an average hash, a difference hash and a
//!   "perceptual" hash of an 8x8 grayscale thumbnail. The perceptual hash is the average hash:
//!   no DCT is performed.
//! * **colorHistogram**: intersection of the normalized 256-bin luminance histograms.
//! * **brightness**, **texture** and **keypoints**: scalar statistics of each raster, compared by
//!   relative difference.
//! * **ssim**: a single global structural similarity index (not the windowed SSIM).
//! * **embedding**: cosine similarity of a 7-dimensional colour/edge feature vector.
//!
//! The video profile additionally reports **repeatedFrames** and **temporalSimilarity**. Only a
//! single frame of each video is decoded, so these two are placeholder values and carry no
//! information about the videos.
//!
//! Each profile has a fixed set of weights summing to 1.0; the overall score is the weighted sum
//! of the metrics, rounded to two decimal places.
//!
//! # Prerequisites
//! Comparing videos calls Ffmpeg from the command line. You must make Ffmpeg available on the
//! command line, for example:
//!
//! * Debian-based systems: ```# apt-get install ffmpeg```
//! * Yum-based systems: ```# yum install ffmpeg```
//!
//! Images are decoded in-process and do not need Ffmpeg.
//!
//! # Limitations
//! The metrics are simplified versions of their textbook counterparts and are only intended to
//! rank "how alike" two files look. Rotations, mirroring and heavy crops will reduce every score.

mod definitions;
mod raster;
mod similarity;

pub use raster::{luma, Raster};

pub use similarity::{
    engine::SimilarityEngine,
    fingerprint::MediaFingerprint,
    options::{ComparisonOptions, ImageWeightPreset},
    raster_source::{MediaFile, MediaRasterSource, RasterSource},
    similarity_result::{SimilarityResult, SourceDescriptor},
    weights::{Metric, MetricSet, Profile, WeightProfile},
    Error, MediaKind,
};

pub use definitions::{
    DEFAULT_DECODE_TIMEOUT_SECS, DEFAULT_EDGE_THRESHOLD, DEFAULT_FRAME_OFFSET_SECS,
    DEFAULT_GRID_SIZE, DEFAULT_KEYPOINT_THRESHOLD, DEFAULT_RASTER_SIZE, DEFAULT_SSIM_SIZE,
    DEFAULT_TEXTURE_NORMALIZATION,
};

/// The individual metric components. Most callers only need [`SimilarityEngine`], but each
/// component is usable on its own.
pub mod metrics {
    pub use crate::similarity::{
        aggregator::{overall_similarity, perceptual_hash_similarity, round_to_hundredths},
        embedding::FeatureVector,
        grayscale::GrayscaleGrid,
        hashing::{
            average_hash, difference_hash, hamming_distance, hamming_similarity, perceptual_hash,
            HashBits,
        },
        histogram::Histogram,
        identity::is_byte_identical,
        scalar_metrics::{
            brightness, compare_brightness, compare_keypoints, compare_texture, keypoint_count,
            texture,
        },
        ssim::{global_ssim, ssim_lite},
        temporal::placeholder_temporal_scores,
    };
}

#[cfg(any(feature = "test-util", test))]
pub use raster::test_util;

type EngineResult<T> = Result<T, crate::Error>;
