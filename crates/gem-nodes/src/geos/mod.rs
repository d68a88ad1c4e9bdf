//! Nodes that emit geometry.

mod scope_xyz;
mod text3d;

pub use scope_xyz::ScopeXyz;
pub use text3d::Text3d;
