/// Side length of the grayscale grid the hashes are built from.
pub const DEFAULT_GRID_SIZE: u32 = 8;

/// Decoded images and video frames are resampled to a square of this side length before any
/// metric is computed.
pub const DEFAULT_RASTER_SIZE: u32 = 256;

/// Both rasters are resampled to a square of this side length before SSIM is computed.
pub const DEFAULT_SSIM_SIZE: u32 = 256;

/// Gradient magnitude above which a pixel counts as a keypoint.
pub const DEFAULT_KEYPOINT_THRESHOLD: f64 = 50.0;

/// Luminance step (to the left or top neighbour) above which a pixel counts as an edge in the
/// embedding vector.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 30.0;

/// Divisor used when comparing texture values. Empirical: texture values can exceed it, in which
/// case the comparison floors at 0.
pub const DEFAULT_TEXTURE_NORMALIZATION: f64 = 100.0;

/// Where in a video the single compared frame is taken from.
///
/// Unit: Seconds
pub const DEFAULT_FRAME_OFFSET_SECS: f64 = 1.0;

/// Maximum time a single video frame extraction may take before ffmpeg is killed.
///
/// Unit: Seconds
pub const DEFAULT_DECODE_TIMEOUT_SECS: u64 = 30;

pub const HISTOGRAM_BINS: usize = 256;

pub const EMBEDDING_DIMS: usize = 7;

// edge density is a ratio in 0..=1; scale it up so it is not swamped by the channel variances.
pub const EDGE_DENSITY_SCALE: f64 = 1000.0;

// ITU-R BT.601 luma weights
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

// SSIM stabilization constants: (K * L)^2 with L = 255
pub const SSIM_C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
pub const SSIM_C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// Range of the placeholder temporal metrics.
pub const PLACEHOLDER_MIN: f64 = 85.0;
pub const PLACEHOLDER_MAX: f64 = 100.0;
