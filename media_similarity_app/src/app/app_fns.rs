use std::{
    error::Error,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use media_similarity_lib::*;

use crate::app::*;

// * read cfg
// * build options
// * read both files
// * compare
// * output results

const EXIT_OK: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_BELOW_THRESHOLD: i32 = 2;

// Extensions the image crate does not know about. Checked before the image format table.
const VIDEO_EXTENSIONS: [(&str, &str); 13] = [
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("ogv", "video/ogg"),
    ("ts", "video/mp2t"),
];

pub fn run_app() -> i32 {
    let cfg = arg_parse::parse_args();
    configure_logs(cfg.output_cfg.verbosity);

    let ret = match run_app_inner(&cfg) {
        Ok(true) => EXIT_OK,
        Ok(false) => EXIT_BELOW_THRESHOLD,
        Err(fatal_error) => {
            print_fatal_err(fatal_error, cfg.output_cfg.verbosity);
            EXIT_ERROR
        }
    };

    ret
}

// Returns whether the comparison met the threshold (always true when no threshold was given).
fn run_app_inner(cfg: &AppCfg) -> eyre::Result<bool> {
    let output = compare_files(cfg)?;

    let stdout = BufWriter::new(std::io::stdout());
    output.write(cfg.output_cfg.format, stdout)?;

    let meets_threshold = output.meets_threshold();
    if !meets_threshold {
        info!(
            "overall similarity {:.2}% is below the threshold",
            output.result().overall_similarity()
        );
    }

    Ok(meets_threshold)
}

fn compare_files(cfg: &AppCfg) -> eyre::Result<CompareOutput> {
    let engine = SimilarityEngine::from_options(load_options(&cfg.overrides)?)
        .map_err(AppError::from)?;

    let first = read_media_file(&cfg.first)?;
    let second = read_media_file(&cfg.second)?;

    let profile = match cfg.profile {
        Some(profile) => profile,
        None => Profile::for_kind(first.kind().map_err(AppError::from)?),
    };
    debug!("comparing with the {profile} profile");

    let result = engine
        .compare(&first, &second, profile)
        .map_err(AppError::from)?;

    Ok(CompareOutput::new(result, cfg.threshold))
}

/// Options are taken from the options file if one is given (otherwise the defaults), then any
/// values given on the command line replace them.
fn load_options(overrides: &OptionOverrides) -> Result<ComparisonOptions, AppError> {
    let mut opts = match &overrides.options_file {
        Some(path) => read_options_file(path).map_err(|source| AppError::OptionsFile {
            path: path.clone(),
            source,
        })?,
        None => ComparisonOptions::default(),
    };

    if let Some(preset) = overrides.image_weights {
        opts.with_image_preset(preset);
    }
    if let Some(grid_size) = overrides.grid_size {
        opts.grid_size = grid_size;
    }
    if let Some(frame_offset_secs) = overrides.frame_offset_secs {
        opts.frame_offset_secs = frame_offset_secs;
    }
    if let Some(decode_timeout_secs) = overrides.decode_timeout_secs {
        opts.decode_timeout_secs = decode_timeout_secs;
    }

    trace!("comparison options: {opts:?}");
    Ok(opts)
}

fn read_options_file(path: &Path) -> Result<ComparisonOptions, OptionsFileError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn read_media_file(path: &Path) -> Result<MediaFile, AppError> {
    let mime_type =
        guess_mime_type(path).ok_or_else(|| AppError::UnknownFileType(path.to_path_buf()))?;

    let bytes = std::fs::read(path).map_err(|source| AppError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("read {} ({mime_type}, {} bytes)", path.display(), bytes.len());
    Ok(MediaFile::new(display_name(path), mime_type, bytes))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();

    if let Some((_, mime)) = VIDEO_EXTENSIONS.iter().find(|(e, _)| *e == ext) {
        return Some(*mime);
    }

    image::ImageFormat::from_extension(&ext).map(|f| f.to_mime_type())
}

fn print_fatal_err(fatal_err: eyre::Report, verbosity: ReportVerbosity) {
    error!(target: "app-errorlog", "{}", fatal_err);

    if verbosity == ReportVerbosity::Verbose {
        let mut source: Option<&(dyn Error + 'static)> = fatal_err.source();
        while let Some(e) = source {
            error!(target: "app-errorlog", "    caused by: {}", e);
            source = e.source();
        }
    }
}

pub fn configure_logs(verbosity: ReportVerbosity) {
    use simplelog::*;

    let mut cfg = simplelog::ConfigBuilder::new();

    let min_loglevel = match verbosity {
        ReportVerbosity::Quiet => LevelFilter::Warn,
        ReportVerbosity::Default => LevelFilter::Info,
        ReportVerbosity::Verbose => LevelFilter::Trace,
    };

    // Only fails if a logger is already set, in which case that logger is kept.
    let _ = TermLogger::init(
        min_loglevel,
        cfg.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
