use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Various causes of failure when grabbing a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FfmpegError {
    /// Ffmpeg command was not found. Make sure Ffmpeg is installed and can be found on the command line.
    #[error("ffmpeg not found. Make sure ffmpeg is installed and visible on the command line")]
    FfmpegNotFound,

    /// Io error occurred while executing Ffmpeg, or while spooling video bytes to a temporary file.
    #[error("Ffmpeg IO error: {0}")]
    Io(String),

    /// Ffmpeg returned a nonzero exit code, or produced output of an unexpected size. Because
    /// ffmpeg sometimes prints long error strings to stderr, the string contains only the first
    /// few hundred characters of the error message.
    #[error("Internal Ffmpeg Failure: {0}")]
    FfmpegInternal(String),

    /// Ffmpeg did not finish within the timeout and was killed.
    #[error("Ffmpeg did not finish within {0:?}")]
    Timeout(Duration),

    /// Ffmpeg ran successfully but produced no frame (e.g. the offset is past the end of the
    /// video, or the file has no video stream).
    #[error("Ffmpeg decoded no frames from the video")]
    NoFrameDecoded,

    /// The requested output resolution has a zero dimension.
    #[error("Invalid output resolution: {0}x{1}")]
    InvalidResolution(u32, u32),
}
