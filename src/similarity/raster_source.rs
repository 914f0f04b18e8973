use std::num::NonZeroU32;

use ffmpeg_frame_grab::FrameGrabBuilder;
use log::debug;

use crate::{ComparisonOptions, EngineResult, Error, MediaKind, Raster, SourceDescriptor};

/// A file to compare: its name, its declared mime type and its full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// # Errors
    /// [`Error::UnsupportedMediaType`] if the mime type is neither `image/*` nor `video/*`.
    pub fn kind(&self) -> EngineResult<MediaKind> {
        MediaKind::from_mime_type(&self.mime_type)
    }

    #[must_use]
    pub fn descriptor(&self) -> SourceDescriptor {
        SourceDescriptor {
            name: self.name.clone(),
            byte_size: self.bytes.len() as u64,
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Turns a file into a single raster: the image itself, or one frame of a video.
pub trait RasterSource: Send + Sync {
    /// # Errors
    /// [`Error::Decode`] if the file cannot be decoded.
    fn decode(&self, file: &MediaFile, kind: MediaKind) -> EngineResult<Raster>;
}

/// The default [`RasterSource`]. Images are decoded in-process; videos are handed to ffmpeg on
/// the command line. Every raster is resampled to `raster_size` x `raster_size`.
#[derive(Debug, Clone)]
pub struct MediaRasterSource {
    raster_size: NonZeroU32,
    frame_offset_secs: f64,
    decode_timeout_secs: u64,
}

impl Default for MediaRasterSource {
    fn default() -> Self {
        Self::from_options(&ComparisonOptions::default())
    }
}

impl MediaRasterSource {
    #[must_use]
    pub fn from_options(opts: &ComparisonOptions) -> Self {
        Self {
            raster_size: NonZeroU32::new(opts.raster_size).unwrap_or(NonZeroU32::MIN),
            frame_offset_secs: opts.frame_offset_secs,
            decode_timeout_secs: opts.decode_timeout_secs,
        }
    }

    fn decode_image(&self, file: &MediaFile) -> EngineResult<Raster> {
        let img = image::load_from_memory(file.bytes())
            .map_err(|e| Error::Decode(format!("{}: {e}", file.name())))?;

        Raster::from_rgba_image(img.to_rgba8())?.resized(self.raster_size, self.raster_size)
    }

    fn decode_video(&self, file: &MediaFile) -> EngineResult<Raster> {
        let side = self.raster_size.get();
        let frame = FrameGrabBuilder::new(side, side)
            .offset_secs(self.frame_offset_secs)
            .timeout_secs(self.decode_timeout_secs)
            .grab_from_bytes(file.bytes())
            .map_err(|e| Error::Decode(format!("{}: {e}", file.name())))?;

        Raster::from_rgba_image(frame)
    }
}

impl RasterSource for MediaRasterSource {
    fn decode(&self, file: &MediaFile, kind: MediaKind) -> EngineResult<Raster> {
        debug!("Decoding {} ({kind}, {} bytes)", file.name(), file.bytes().len());
        match kind {
            MediaKind::Image => self.decode_image(file),
            MediaKind::Video => self.decode_video(file),
        }
    }
}
