use gem_core::GemError;
use gem_pixes::PixError;
use gem_render::RenderError;
use thiserror::Error;

/// Any error a [`Patch`](crate::Patch) can report.
#[derive(Error, Debug)]
pub enum Error {
    /// A node rejected its construction arguments or a control message.
    #[error(transparent)]
    Node(#[from] GemError),

    /// A frame store operation failed.
    #[error(transparent)]
    Store(#[from] PixError),

    /// The frame could not be translated for the GPU.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A specialized Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
