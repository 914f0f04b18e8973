use std::path::PathBuf;

use media_similarity_lib::{ImageWeightPreset, Profile};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportVerbosity {
    Quiet,
    Default,
    Verbose,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    Normal,
    Json,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) enum ProfileArg {
    Image,
    Video,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Image => Self::Image,
            ProfileArg::Video => Self::Video,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) enum ImageWeightsArg {
    Standard,
    Structural,
}

impl From<ImageWeightsArg> for ImageWeightPreset {
    fn from(arg: ImageWeightsArg) -> Self {
        match arg {
            ImageWeightsArg::Standard => Self::Standard,
            ImageWeightsArg::Structural => Self::Structural,
        }
    }
}

/// Command line overrides applied on top of the defaults (or the options file).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionOverrides {
    pub options_file: Option<PathBuf>,
    pub image_weights: Option<ImageWeightPreset>,
    pub grid_size: Option<u32>,
    pub frame_offset_secs: Option<f64>,
    pub decode_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputCfg {
    pub format: OutputFormat,
    pub verbosity: ReportVerbosity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppCfg {
    pub first: PathBuf,
    pub second: PathBuf,

    /// When absent the profile follows the media kind of the first file.
    pub profile: Option<Profile>,

    pub overrides: OptionOverrides,

    /// Exit with code 2 when the overall similarity is below this value.
    pub threshold: Option<f64>,

    pub output_cfg: OutputCfg,
}
