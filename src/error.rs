use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the survey library.
///
/// `Decode` is recovered per image by the batch runner. Calibration,
/// parameter and empty-batch errors end the run before any report is written.
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no .jpg, .jpeg or .png images found in {}", .dir.display())]
    EmptyBatch { dir: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("report error: {0}")]
    Report(String),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
