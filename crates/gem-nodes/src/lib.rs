//! Concrete render-state nodes for gem-rs.
//!
//! - [`gl`]: one-call wrappers (`GEMglDepthFunc`, `GEMglTexCoord4sv`,
//!   `GEMglEnable`, `GEMglDisable`, `GEMglColor4f`, `GEMglLineWidth`)
//! - [`geos`]: geometry generators (`scopeXYZ~`, `text3d`)

// Graphics code intentionally uses casts for indices and sample counts
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

/// Implements the bookkeeping half of [`gem_core::StatefulNode`].
///
/// Expects `id: NodeId` and `modified: Modified` fields and the associated
/// constants `CLASS` and `ARITY`.
macro_rules! node_common {
    () => {
        fn id(&self) -> gem_core::NodeId {
            self.id
        }

        fn class_name(&self) -> &'static str {
            Self::CLASS
        }

        fn arity(&self) -> gem_core::Arity {
            Self::ARITY
        }

        fn is_modified(&self) -> bool {
            self.modified.is_set()
        }

        fn take_modified(&mut self) -> bool {
            self.modified.take()
        }
    };
}

pub mod geos;
pub mod gl;

pub use geos::{ScopeXyz, Text3d};
pub use gl::{Capability, Color4f, DepthFunc, LineWidth, TexCoord4sv};
