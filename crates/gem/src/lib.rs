//! gem-rs: render-state nodes, named frame stores and layered settings for
//! real-time patching hosts.
//!
//! A host instantiates nodes by class name, routes control messages to them
//! and traverses them once per frame. Each node folds its parameters into the
//! shared [`RenderState`]; a backend reads the resulting call log, or hands
//! it to [`FramePlan`] for wgpu descriptors.
//!
//! # Quick Start
//!
//! ```no_run
//! use gem::*;
//!
//! fn main() -> Result<()> {
//!     init();
//!
//!     let mut patch = Patch::with_globals();
//!     let depth = patch.create("GEMglDepthFunc", &["GL_GREATER".into()])?;
//!     patch.create("GEMglEnable", &["GL_DEPTH_TEST".into()])?;
//!     let store = patch.create("pix_buffer", &["frames".into(), Atom::Float(10.0)])?;
//!
//!     patch.send(&depth, "func", &["GL_LEQUAL".into()])?;
//!     patch.send(&store, "allocate", &[Atom::Float(320.0), Atom::Float(240.0)])?;
//!
//!     let state = patch.render();
//!     assert_eq!(state.depth_func(), gl::GL_LEQUAL);
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `gem-core`: atoms, render state, the [`StatefulNode`] contract, the
//!   render cache and the settings registry
//! - `gem-nodes`: the concrete nodes
//! - `gem-pixes`: frame stores and the `pix_buffer` family
//! - `gem-render`: the wgpu bridge

mod error;
mod factory;
mod init;
mod patch;

pub use error::{Error, Result};
pub use factory::{create_node, create_store, is_known_class, NODE_CLASSES, STORE_CLASSES};
pub use init::{init, is_initialized};
pub use patch::{Handle, Patch};

// Re-export core types
pub use gem_core::{
    gl, settings, Arity, Atom, CacheStats, ConfigSource, GemError, GlCall, GlKind, HAlign, Mat4,
    Modified, NodeId, PixelFormat, PixelImage, RenderCache, RenderChain, RenderState, Settings,
    StateCategory, StatefulNode, TextDraw, VAlign, Vec3, Vec4,
};

// Re-export nodes
pub use gem_nodes::{Capability, Color4f, DepthFunc, LineWidth, ScopeXyz, TexCoord4sv, Text3d};

// Re-export frame stores
pub use gem_pixes::{
    FrameStore, PixBuffer, PixBufferRead, PixBufferWrite, PixError, StoreId, StoreRegistry,
};

// Re-export the GPU bridge
pub use gem_render::{DrawBatch, FramePlan, RenderError, TextureUpload, Vertex};
