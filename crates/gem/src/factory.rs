//! Class-name based construction, the way a host instantiates objects.

use gem_core::{Atom, GemError, Settings, StatefulNode};
use gem_nodes::{Capability, Color4f, DepthFunc, LineWidth, ScopeXyz, TexCoord4sv, Text3d};
use gem_pixes::{PixBuffer, PixBufferRead, PixBufferWrite, PixResult, StoreRegistry};

/// Class names accepted by [`create_node`].
pub const NODE_CLASSES: &[&str] = &[
    DepthFunc::CLASS,
    TexCoord4sv::CLASS,
    Capability::ENABLE_CLASS,
    Capability::DISABLE_CLASS,
    Color4f::CLASS,
    LineWidth::CLASS,
    ScopeXyz::CLASS,
    Text3d::CLASS,
    PixBufferWrite::CLASS,
    PixBufferRead::CLASS,
];

/// Class names accepted by [`create_store`].
pub const STORE_CLASSES: &[&str] = &[PixBuffer::CLASS, PixBuffer::ALIAS];

/// Creates a render node from its class name and constructor arguments.
///
/// Frame store nodes bind to stores in `registry`; `text3d` reads its default
/// font from `settings`.
pub fn create_node(
    class: &str,
    args: &[Atom],
    settings: &Settings,
    registry: &StoreRegistry,
) -> gem_core::Result<Box<dyn StatefulNode>> {
    let node: Box<dyn StatefulNode> = match class {
        DepthFunc::CLASS => Box::new(DepthFunc::new(args)?),
        TexCoord4sv::CLASS => Box::new(TexCoord4sv::new(args)?),
        Capability::ENABLE_CLASS => Box::new(Capability::enable(args)?),
        Capability::DISABLE_CLASS => Box::new(Capability::disable(args)?),
        Color4f::CLASS => Box::new(Color4f::new(args)?),
        LineWidth::CLASS => Box::new(LineWidth::new(args)?),
        ScopeXyz::CLASS => Box::new(ScopeXyz::new(args)?),
        Text3d::CLASS => Box::new(Text3d::new(args, settings)?),
        PixBufferWrite::CLASS => Box::new(PixBufferWrite::new(registry, args)?),
        PixBufferRead::CLASS => Box::new(PixBufferRead::new(registry, args)?),
        _ => return Err(GemError::UnknownClass(class.to_string())),
    };
    log::debug!("created {class} {}", node.id());
    Ok(node)
}

/// Creates a frame store owner (`pix_buffer` or `pix_depot`).
pub fn create_store(class: &str, args: &[Atom], registry: &StoreRegistry) -> PixResult<PixBuffer> {
    if !STORE_CLASSES.contains(&class) {
        return Err(GemError::UnknownClass(class.to_string()).into());
    }
    PixBuffer::from_args(registry, args)
}

/// Returns whether `class` names a node or a store.
#[must_use]
pub fn is_known_class(class: &str) -> bool {
    NODE_CLASSES.contains(&class) || STORE_CLASSES.contains(&class)
}
