#![warn(clippy::unwrap_used)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::dbg_macro)]

//! Extracts a single frame from a video by running `ffmpeg` on the command line. The frame is
//! scaled by ffmpeg itself and returned as an [`image::RgbaImage`].
//!
//! ```rust,no_run
//! use ffmpeg_frame_grab::FrameGrabBuilder;
//!
//! let frame = FrameGrabBuilder::new(256, 256)
//!     .offset_secs(1.0)
//!     .timeout_secs(30)
//!     .grab_from_path("video.mp4")
//!     .unwrap();
//! assert_eq!(frame.dimensions(), (256, 256));
//! ```

mod ffmpeg_error_kind;
mod ffmpeg_ops;

pub use ffmpeg_error_kind::FfmpegError;
pub use ffmpeg_ops::{ffmpeg_is_callable, FrameGrabBuilder};
