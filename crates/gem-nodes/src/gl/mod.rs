//! Nodes wrapping a single graphics call.

mod capability;
mod color;
mod depth_func;
mod line_width;
mod tex_coord;

pub use capability::Capability;
pub use color::Color4f;
pub use depth_func::DepthFunc;
pub use line_width::LineWidth;
pub use tex_coord::TexCoord4sv;
