//! Custom error types for patchblend.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the patchblend library.
#[derive(Error, Debug)]
pub enum Error {
    /// Two images expected to share dimensions do not.
    #[error("image shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Batch sequences of differing length.
    #[error("batch length mismatch: {left} images vs {right} fills")]
    LengthMismatch { left: usize, right: usize },

    /// Dataset loader received an identifier outside the known key set.
    #[error("unknown dataset key: {name}")]
    UnknownDataset { name: String },

    /// Dataset directory contained no loadable images.
    #[error("no images found under {path}")]
    EmptyDataset { path: PathBuf },

    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to walk a dataset directory.
    #[error("failed to scan dataset directory {path}: {source}")]
    DatasetScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for patchblend operations.
pub type Result<T> = std::result::Result<T, Error>;
