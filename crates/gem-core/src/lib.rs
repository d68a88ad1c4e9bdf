//! Core abstractions for gem-rs.
//!
//! This crate provides the substrate every rendering node runs on:
//! - [`RenderState`], the shared graphics state threaded through a traversal
//! - [`StatefulNode`], the contract each node implements, and the modified flag
//! - [`RenderChain`] and [`RenderCache`] for traversal and call reuse
//! - [`PixelImage`] for pixel data flowing between nodes and frame stores
//! - [`Settings`], the layered process-wide configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod atom;
pub mod chain;
pub mod config_file;
pub mod error;
pub mod gl;
pub mod node;
pub mod paths;
pub mod pixels;
pub mod settings;
pub mod state;

pub use atom::{parse_numeric, truncate_i16, truncate_i32, Atom};
pub use chain::{CacheStats, RenderCache, RenderChain};
pub use error::{GemError, Result};
pub use gl::GlKind;
pub use node::{Arity, Modified, NodeId, StatefulNode};
pub use pixels::{PixelFormat, PixelImage};
pub use settings::{ConfigSource, Settings};
pub use state::{GlCall, HAlign, RenderState, StateCategory, TextDraw, VAlign};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
