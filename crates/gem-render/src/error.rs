//! Bridge error types.

use thiserror::Error;

/// Errors that can occur while translating render state for the GPU.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The value is not a known comparison function.
    #[error("unknown comparison function 0x{0:04x}")]
    UnknownCompareFunction(u32),

    /// The value is not a known primitive mode.
    #[error("unknown primitive mode {0}")]
    UnknownPrimitive(u32),

    /// The image has no pixels to upload.
    #[error("cannot create a texture from an empty image")]
    EmptyImage,
}

/// A specialized Result type for bridge operations.
pub type Result<T> = std::result::Result<T, RenderError>;
