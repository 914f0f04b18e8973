use std::{
    ffi::{OsStr, OsString},
    io::prelude::*,
    path::Path,
    process::{Child, Command, Stdio},
    thread::JoinHandle,
    time::Duration,
};

#[cfg(target_family = "windows")]
use std::os::windows::process::CommandExt;

use image::RgbaImage;
use log::{trace, warn};
use wait_timeout::ChildExt;
use FfmpegError::*;

use crate::FfmpegError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ffmpeg can print very long error messages. Only this many characters are kept.
const MAX_ERR_MSG_CHARS: usize = 500;

/// Grabs one frame of a video, scaled to a fixed resolution, as RGBA.
#[derive(Clone, Debug)]
pub struct FrameGrabBuilder {
    width: u32,
    height: u32,
    offset_secs: f64,
    timeout: Duration,
    fallback_to_start: bool,
}

impl FrameGrabBuilder {
    /// A builder producing frames of `width` x `height`, taken from the start of the video.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offset_secs: 0.0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fallback_to_start: true,
        }
    }

    /// Where in the video to take the frame from. Negative values are treated as 0.
    pub fn offset_secs(&mut self, offset_secs: f64) -> &mut Self {
        self.offset_secs = offset_secs.max(0.0);
        self
    }

    /// Ffmpeg is killed if it has not finished after this long.
    pub fn timeout_secs(&mut self, timeout_secs: u64) -> &mut Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }

    /// If no frame exists at the offset (the video is shorter than the offset), retry once from
    /// the start of the video. Enabled by default.
    pub fn fallback_to_start(&mut self, val: bool) -> &mut Self {
        self.fallback_to_start = val;
        self
    }

    /// Grab a frame from a video held in memory. The bytes are spooled to a temporary file which
    /// is removed afterwards.
    pub fn grab_from_bytes(&self, bytes: &[u8]) -> Result<RgbaImage, FfmpegError> {
        let mut spool = tempfile::NamedTempFile::new().map_err(|e| Io(e.to_string()))?;
        spool.write_all(bytes).map_err(|e| Io(e.to_string()))?;
        spool.flush().map_err(|e| Io(e.to_string()))?;

        self.grab_from_path(spool.path())
    }

    pub fn grab_from_path(&self, src_path: impl AsRef<Path>) -> Result<RgbaImage, FfmpegError> {
        if self.width == 0 || self.height == 0 {
            return Err(InvalidResolution(self.width, self.height));
        }

        let src_path = src_path.as_ref();
        match self.grab_at(src_path, self.offset_secs) {
            Err(NoFrameDecoded) if self.fallback_to_start && self.offset_secs > 0.0 => {
                warn!(
                    "No frame at {:.3}s in {}, retrying from the start of the video",
                    self.offset_secs,
                    src_path.display()
                );
                self.grab_at(src_path, 0.0)
            }
            res => res,
        }
    }

    fn grab_at(&self, src_path: &Path, offset_secs: f64) -> Result<RgbaImage, FfmpegError> {
        let args = self.args(src_path, offset_secs);
        let args = args.iter().map(OsString::as_os_str).collect::<Vec<_>>();

        let output = run_ffmpeg_command(FfmpegCommandName::Ffmpeg, &args, self.timeout)?;
        trace!(
            "ffmpeg produced {} bytes from {} at {offset_secs:.3}s",
            output.stdout.len(),
            src_path.display()
        );

        if output.stdout.is_empty() {
            return Err(NoFrameDecoded);
        }

        let expected_len = self.width as usize * self.height as usize * 4;
        if output.stdout.len() != expected_len {
            return Err(FfmpegInternal(format!(
                "expected {expected_len} bytes of frame data, got {}",
                output.stdout.len()
            )));
        }

        RgbaImage::from_raw(self.width, self.height, output.stdout)
            .ok_or_else(|| FfmpegInternal("frame buffer has the wrong size".to_string()))
    }

    /// The ffmpeg arguments used to grab a frame from `src_path` at `offset_secs`.
    pub fn args(&self, src_path: &Path, offset_secs: f64) -> Vec<OsString> {
        let offset = format!("{offset_secs:.3}");
        let scale = format!("scale={}:{}", self.width, self.height);

        #[rustfmt::skip]
        let args: Vec<&OsStr> = vec![
            OsStr::new("-hide_banner"),
            OsStr::new("-loglevel"), OsStr::new("error"),
            OsStr::new("-nostats"),
            OsStr::new("-ss"),       OsStr::new(&offset),
            OsStr::new("-i"),        src_path.as_os_str(),
            OsStr::new("-an"),
            OsStr::new("-frames:v"), OsStr::new("1"),
            OsStr::new("-vf"),       OsStr::new(&scale),
            OsStr::new("-pix_fmt"),  OsStr::new("rgba"),
            OsStr::new("-f"),        OsStr::new("rawvideo"),
            OsStr::new("-"),
        ];

        args.into_iter().map(OsStr::to_os_string).collect()
    }
}

/// True if `ffmpeg -version` can be run.
#[must_use]
pub fn ffmpeg_is_callable() -> bool {
    run_ffmpeg_command(
        FfmpegCommandName::Ffmpeg,
        &[OsStr::new("-version")],
        Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    )
    .is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FfmpegCommandName {
    Ffmpeg,
}

impl FfmpegCommandName {
    pub fn as_os_str(&self) -> &'static OsStr {
        match self {
            Self::Ffmpeg => OsStr::new("ffmpeg"),
        }
    }
}

struct CommandOutput {
    stdout: Vec<u8>,
}

fn run_ffmpeg_command(
    name: FfmpegCommandName,
    args: &[&OsStr],
    timeout: Duration,
) -> Result<CommandOutput, FfmpegError> {
    run_command(name.as_os_str(), args, timeout)
}

fn spawn_command(program: &OsStr, args: &[&OsStr]) -> Result<Child, FfmpegError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    //do not spawn a command window on windows when when in a gui application
    #[cfg(target_family = "windows")]
    command.creation_flags(winapi::um::winbase::CREATE_NO_WINDOW);

    command.spawn().map_err(|e| match e.kind() {
        //by far the most likely cause is ffmpeg is not installed.
        std::io::ErrorKind::NotFound => FfmpegNotFound,
        _ => Io(format!("{:?}", e.kind())),
    })
}

// Drain a pipe on its own thread so that a full stderr can never block ffmpeg while we are
// waiting on stdout (or vice versa).
fn spawn_reader(pipe: Option<impl Read + Send + 'static>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = vec![];
        if let Some(mut pipe) = pipe {
            let _read_error = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn run_command(
    program: &OsStr,
    args: &[&OsStr],
    timeout: Duration,
) -> Result<CommandOutput, FfmpegError> {
    fn truncate_err_msg(stderr: &[u8]) -> FfmpegError {
        let error_text = String::from_utf8_lossy(stderr);
        FfmpegInternal(error_text.trim().chars().take(MAX_ERR_MSG_CHARS).collect())
    }

    let mut child = spawn_command(program, args)?;

    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            // the reader threads finish once the killed process closes its pipes.
            let _kill_error = child.kill();
            let _wait_error = child.wait();
            return Err(Timeout(timeout));
        }
        Err(e) => {
            let _kill_error = child.kill();
            let _wait_error = child.wait();
            return Err(Io(format!("{:?}", e.kind())));
        }
    };

    let stdout = stdout_reader
        .join()
        .map_err(|_| Io("stdout reader panicked".to_string()))?;
    let stderr = stderr_reader
        .join()
        .map_err(|_| Io("stderr reader panicked".to_string()))?;

    if status.success() {
        Ok(CommandOutput { stdout })
    } else {
        Err(truncate_err_msg(&stderr))
    }
}
