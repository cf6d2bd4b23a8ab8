//! Error types for the tiffmerge library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tiffmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion and merging.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as TIFF.
    #[error("Unknown file format: not a valid TIFF")]
    UnknownFormat,

    /// The source file does not exist at conversion time.
    #[error("Source file not found: {0}")]
    NotFound(PathBuf),

    /// The path lacks a `.tif`/`.tiff` suffix to derive an output path from.
    #[error("Path has no .tif/.tiff suffix: {0}")]
    InvalidPath(PathBuf),

    /// Frame decode or PDF-write failure while converting one source file.
    #[error("Conversion of {path} failed: {reason}")]
    Conversion { path: PathBuf, reason: String },

    /// Failure while appending an intermediate or writing the merged output.
    #[error("Merge error: {0}")]
    Merge(String),

    /// Filtering left no convertible files in the batch.
    #[error("No valid TIFF files matched the batch manifest")]
    EmptyBatch,
}

impl Error {
    /// Tag a conversion failure with the source path it belongs to.
    pub fn conversion(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Conversion {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
