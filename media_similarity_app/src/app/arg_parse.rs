use std::{ffi::OsString, path::PathBuf};

use clap::{value_parser, ArgAction::*};
use media_similarity_lib::*;

use crate::app::*;

// files
const FIRST_PATH: &str = "First file";
const SECOND_PATH: &str = "Second file";

// comparison configuration
const PROFILE: &str = "Profile";
const IMAGE_WEIGHTS: &str = "Image weights";
const OPTIONS_FILE: &str = "Options file";
const GRID_SIZE: &str = "Grid size";
const FRAME_OFFSET: &str = "Frame offset";
const DECODE_TIMEOUT: &str = "Decode timeout";

// output settings
const THRESHOLD: &str = "Duplicate threshold";
const OUTPUT_FORMAT: &str = "Format";

//Verbosity
const VERBOSITY_QUIET: &str = "Quiet";
const VERBOSITY_VERBOSE: &str = "Verbose";

const DISPLAY_ORDERING: [&str; 12] = [
    //
    // files
    FIRST_PATH,
    SECOND_PATH,
    //
    // comparison
    PROFILE,
    IMAGE_WEIGHTS,
    OPTIONS_FILE,
    GRID_SIZE,
    FRAME_OFFSET,
    DECODE_TIMEOUT,
    //
    //outputs
    THRESHOLD,
    OUTPUT_FORMAT,
    //
    //verbosity
    VERBOSITY_QUIET,
    VERBOSITY_VERBOSE,
];

fn parse_threshold(s: &str) -> Result<f64, String> {
    let val = s
        .parse::<f64>()
        .map_err(|_| format!("{s:?} is not a number"))?;
    if (0.0..=100.0).contains(&val) {
        Ok(val)
    } else {
        Err(format!("threshold must be between 0 and 100, got {val}"))
    }
}

fn parse_non_negative_secs(s: &str) -> Result<f64, String> {
    let val = s
        .parse::<f64>()
        .map_err(|_| format!("{s:?} is not a number"))?;
    if val.is_finite() && val >= 0.0 {
        Ok(val)
    } else {
        Err(format!("expected a non-negative number of seconds, got {val}"))
    }
}

fn build_app() -> clap::Command {
    let get_ordering = |arg_name: &str| -> usize {
        match DISPLAY_ORDERING.iter().position(|x| *x == arg_name) {
            Some(idx) => idx,
            None => {
                panic!("argument not assigned a display order: {arg_name:?}");
            }
        }
    };

    //args are not added through method chaining because rustfmt struggles with very long expressions.
    let mut clap_app = clap::Command::new("Media similarity")
        .version(clap::crate_version!())
        .about("Estimate how visually similar two images or two videos are");

    clap_app = clap_app.arg(
        clap::Arg::new(FIRST_PATH)
            .long("first")
            .required(true)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("The first file to compare")
            .display_order(get_ordering(FIRST_PATH)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(SECOND_PATH)
            .long("second")
            .required(true)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("The second file to compare. Must be the same kind of media as the first file")
            .display_order(get_ordering(SECOND_PATH)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(PROFILE)
            .long("profile")
            .num_args(1)
            .value_parser(value_parser!(ProfileArg))
            .help("Which set of metric weights to use. Defaults to the kind of media of the first file")
            .display_order(get_ordering(PROFILE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(IMAGE_WEIGHTS)
            .long("image-weights")
            .num_args(1)
            .value_parser(value_parser!(ImageWeightsArg))
            .help("Built-in weights for the image profile. 'structural' gives most of the weight to the hashes and SSIM")
            .display_order(get_ordering(IMAGE_WEIGHTS)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(OPTIONS_FILE)
            .long("options-file")
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("Read comparison options from a JSON file. Options given on the command line take precedence")
            .display_order(get_ordering(OPTIONS_FILE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(GRID_SIZE)
            .long("grid-size")
            .num_args(1)
            .value_parser(value_parser!(u32).range(2..))
            .help(format!("Side length of the grayscale grid the hashes are built from. [default: {DEFAULT_GRID_SIZE}]"))
            .display_order(get_ordering(GRID_SIZE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(FRAME_OFFSET)
            .long("frame-offset")
            .num_args(1)
            .value_parser(parse_non_negative_secs)
            .help(format!("Seconds into each video at which the compared frame is taken. [default: {DEFAULT_FRAME_OFFSET_SECS}]"))
            .display_order(get_ordering(FRAME_OFFSET)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(DECODE_TIMEOUT)
            .long("decode-timeout")
            .num_args(1)
            .value_parser(value_parser!(u64).range(1..))
            .help(format!("Give up decoding a video after this many seconds. [default: {DEFAULT_DECODE_TIMEOUT_SECS}]"))
            .display_order(get_ordering(DECODE_TIMEOUT)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(THRESHOLD)
            .long("threshold")
            .num_args(1)
            .value_parser(parse_threshold)
            .help("Exit with code 2 if the overall similarity is below this percentage")
            .display_order(get_ordering(THRESHOLD)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(OUTPUT_FORMAT)
            .long("output-format")
            .num_args(1)
            .value_parser(value_parser!(OutputFormat))
            .default_value("normal")
            .help("Print results as human-readable text or as JSON")
            .display_order(get_ordering(OUTPUT_FORMAT)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_QUIET)
            .long("quiet")
            .help("Reduced verbosity")
            .conflicts_with(VERBOSITY_VERBOSE)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_QUIET)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_VERBOSE)
            .long("verbose")
            .help("Increased verbosity")
            .conflicts_with(VERBOSITY_QUIET)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_VERBOSE)),
    );

    clap_app
}

pub fn parse_args() -> AppCfg {
    match parse_args_from(std::env::args_os()) {
        Ok(cfg) => cfg,
        Err(e) => e.exit(),
    }
}

pub(super) fn parse_args_from<I, T>(itr: I) -> Result<AppCfg, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = build_app().try_get_matches_from(itr)?;

    let required_path = |name: &str| {
        args.get_one::<PathBuf>(name)
            .cloned()
            .ok_or_else(|| clap::Error::new(clap::error::ErrorKind::MissingRequiredArgument))
    };

    let verbosity = if args.get_flag(VERBOSITY_QUIET) {
        ReportVerbosity::Quiet
    } else if args.get_flag(VERBOSITY_VERBOSE) {
        ReportVerbosity::Verbose
    } else {
        ReportVerbosity::Default
    };

    let overrides = OptionOverrides {
        options_file: args.get_one::<PathBuf>(OPTIONS_FILE).cloned(),
        image_weights: args
            .get_one::<ImageWeightsArg>(IMAGE_WEIGHTS)
            .map(|&w| ImageWeightPreset::from(w)),
        grid_size: args.get_one::<u32>(GRID_SIZE).copied(),
        frame_offset_secs: args.get_one::<f64>(FRAME_OFFSET).copied(),
        decode_timeout_secs: args.get_one::<u64>(DECODE_TIMEOUT).copied(),
    };

    Ok(AppCfg {
        first: required_path(FIRST_PATH)?,
        second: required_path(SECOND_PATH)?,
        profile: args.get_one::<ProfileArg>(PROFILE).map(|&p| Profile::from(p)),
        overrides,
        threshold: args.get_one::<f64>(THRESHOLD).copied(),
        output_cfg: OutputCfg {
            format: args
                .get_one::<OutputFormat>(OUTPUT_FORMAT)
                .copied()
                .unwrap_or(OutputFormat::Normal),
            verbosity,
        },
    })
}
