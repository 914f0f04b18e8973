use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /////////////////////////////////
    //input files
    #[error("Failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot determine the media type of {}: unrecognised file extension", .0.display())]
    UnknownFileType(PathBuf),

    /////////////////////////////////
    //options file
    #[error("Failed to load options from {}", path.display())]
    OptionsFile {
        path: PathBuf,
        #[source]
        source: OptionsFileError,
    },

    /////////////////////////////////
    //comparison
    #[error("Comparison failed: {0}")]
    Compare(#[from] media_similarity_lib::Error),
}

#[derive(Error, Debug)]
pub enum OptionsFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
