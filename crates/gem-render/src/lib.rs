//! wgpu bridge for gem-rs.
//!
//! Nodes only describe graphics calls. This crate turns the state a traversal
//! leaves behind into wgpu descriptors: depth and primitive state, blend
//! state, vertex batches and texture uploads. It never touches a device.

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod texture;

pub use batch::{batches, expand, DrawBatch, Vertex};
pub use error::{RenderError, Result};
pub use frame::FramePlan;
pub use pipeline::{blend_state, compare_function, depth_stencil_state, primitive_state};
pub use texture::TextureUpload;
