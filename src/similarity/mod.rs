pub mod aggregator;
pub mod embedding;
pub mod engine;
pub mod fingerprint;
pub mod grayscale;
pub mod hashing;
pub mod histogram;
pub mod identity;
pub mod options;
pub mod raster_source;
pub mod scalar_metrics;
pub mod similarity_result;
pub mod ssim;
pub mod temporal;
pub mod weights;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error that prevented two files from being compared. Every error is terminal for the
/// comparison: no partial result is produced.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Error {
    /// A raster had a zero dimension, or its pixel buffer did not match its dimensions.
    #[error("Invalid raster: {width}x{height} with {len} bytes of pixel data")]
    InvalidRaster { width: u32, height: u32, len: usize },

    /// The file could not be turned into a raster (corrupt image, ffmpeg failure, timeout...).
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Resize error: {0}")]
    Resize(String),

    /// Two hashes of different lengths were compared. Hashes built with the same options always
    /// have the same length, so this indicates a programming error.
    #[error("Hash length mismatch: {left} bits vs {right} bits")]
    HashLengthMismatch { left: usize, right: usize },

    /// The two files are not the same kind of media (e.g. an image and a video).
    #[error("Cannot compare {first} with {second}: both files must be the same kind of media")]
    UnsupportedMediaPair { first: MediaKind, second: MediaKind },

    /// The mime type is neither `image/*` nor `video/*`.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid comparison options: {0}")]
    InvalidOptions(String),
}

/// Whether a file is a still image or a video, as given by its mime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// # Errors
    /// [`Error::UnsupportedMediaType`] unless the mime type starts with `image/` or `video/`.
    pub fn from_mime_type(mime_type: &str) -> Result<Self, Error> {
        let lowered = mime_type.trim().to_ascii_lowercase();
        if lowered.starts_with("image/") {
            Ok(Self::Image)
        } else if lowered.starts_with("video/") {
            Ok(Self::Video)
        } else {
            Err(Error::UnsupportedMediaType(mime_type.to_string()))
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_media_kind_from_mime_type() {
        assert_eq!(MediaKind::from_mime_type("image/png"), Ok(MediaKind::Image));
        assert_eq!(MediaKind::from_mime_type("Video/MP4"), Ok(MediaKind::Video));
        assert_eq!(
            MediaKind::from_mime_type("application/pdf"),
            Err(Error::UnsupportedMediaType("application/pdf".to_string()))
        );
        assert!(MediaKind::from_mime_type("").is_err());
    }

    #[test]
    fn test_error_round_trips_through_json() {
        let err = Error::UnsupportedMediaPair {
            first: MediaKind::Image,
            second: MediaKind::Video,
        };
        let json = serde_json::to_string(&err).expect("serializable");
        let back: Error = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(err, back);
    }
}
