//! Frame store error types.

use std::path::PathBuf;

use gem_core::GemError;
use thiserror::Error;

/// Errors that can occur while addressing or persisting a frame store.
#[derive(Error, Debug)]
pub enum PixError {
    /// The index is outside `[0, capacity)`.
    #[error("index {index} out of range (0..{capacity})")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// The store's capacity.
        capacity: usize,
    },

    /// A write was requested without an image.
    #[error("no image to store")]
    NoImage,

    /// `save` was called without a file name.
    #[error("no filename given")]
    NoFilename,

    /// `save` found nothing to write.
    #[error("index {index} out of range (0..{capacity}) or slot empty")]
    SlotEmpty {
        /// The requested index.
        index: i64,
        /// The store's capacity.
        capacity: usize,
    },

    /// Reallocation parameters are unusable.
    #[error("init-specs out of range: {0}")]
    InvalidGeometry(String),

    /// The file could not be decoded as an image.
    #[error("no valid image in '{path}': {source}")]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// The image could not be encoded.
    #[error("image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    /// The file extension names no supported format.
    #[error("unsupported image format: '{0}'")]
    UnsupportedFormat(String),

    /// Writing the encoded file failed.
    #[error("failed to write '{path}': {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The name is already bound to another store.
    #[error("name '{0}' is already bound to a frame store")]
    BindingConflict(String),

    /// No store is bound under the name.
    #[error("no frame store named '{0}'")]
    UnknownStore(String),

    /// A control message was malformed.
    #[error(transparent)]
    Message(#[from] GemError),
}

/// A specialized Result type for frame store operations.
pub type PixResult<T> = std::result::Result<T, PixError>;
