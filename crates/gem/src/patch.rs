//! A minimal host: one render chain, its cache, and the stores it owns.

use gem_core::{Atom, NodeId, RenderCache, RenderChain, RenderState, Settings, StatefulNode};
use gem_pixes::{PixBuffer, StoreRegistry};
use gem_render::FramePlan;

use crate::error::{Error, Result};
use crate::factory;

/// Refers to an object created in a [`Patch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handle {
    /// A node in the render chain.
    Node(NodeId),
    /// A frame store owner, by bound name.
    Store(String),
}

/// Objects and state for one render context.
///
/// Nodes are traversed in creation order. With caching on, unmodified nodes
/// replay last frame's calls instead of being applied.
pub struct Patch {
    settings: Settings,
    registry: StoreRegistry,
    chain: RenderChain,
    cache: RenderCache,
    state: RenderState,
    stores: Vec<PixBuffer>,
    caching: bool,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new(settings: Settings, registry: StoreRegistry) -> Self {
        Self {
            settings,
            registry,
            chain: RenderChain::new(),
            cache: RenderCache::new(),
            state: RenderState::new(),
            stores: Vec::new(),
            caching: true,
        }
    }

    /// Creates a patch on the process-wide settings and store registry.
    pub fn with_globals() -> Self {
        let settings = gem_core::settings::with_settings(Clone::clone);
        Self::new(settings, StoreRegistry::global().clone())
    }

    /// Enables or disables the render cache.
    pub fn set_caching(&mut self, caching: bool) {
        self.caching = caching;
        if !caching {
            self.cache.clear();
        }
    }

    /// Instantiates an object by class name.
    pub fn create(&mut self, class: &str, args: &[Atom]) -> Result<Handle> {
        if factory::STORE_CLASSES.contains(&class) {
            let store = factory::create_store(class, args, &self.registry)?;
            let handle = Handle::Store(store.name().to_string());
            self.stores.push(store);
            return Ok(handle);
        }
        let node = factory::create_node(class, args, &self.settings, &self.registry)?;
        Ok(Handle::Node(self.chain.push(node)))
    }

    /// Appends an already constructed node.
    pub fn push(&mut self, node: Box<dyn StatefulNode>) -> Handle {
        Handle::Node(self.chain.push(node))
    }

    /// Sends a control message. Only stores answer with a value.
    pub fn send(&mut self, handle: &Handle, selector: &str, args: &[Atom]) -> Result<Option<f32>> {
        match handle {
            Handle::Node(id) => {
                self.chain.send(*id, selector, args)?;
                Ok(None)
            }
            Handle::Store(name) => {
                let store = self
                    .stores
                    .iter()
                    .find(|s| s.name() == name)
                    .ok_or_else(|| gem_pixes::PixError::UnknownStore(name.clone()))?;
                Ok(store.message(selector, args)?)
            }
        }
    }

    /// Deletes an object. Dropping a store releases its name.
    pub fn remove(&mut self, handle: &Handle) -> bool {
        match handle {
            Handle::Node(id) => {
                self.cache.invalidate(*id);
                self.chain.remove(*id).is_some()
            }
            Handle::Store(name) => {
                let before = self.stores.len();
                self.stores.retain(|s| s.name() != name);
                self.stores.len() != before
            }
        }
    }

    /// Runs one frame and returns the resulting state.
    pub fn render(&mut self) -> &RenderState {
        self.render_with(|_| {})
    }

    /// Runs one frame, letting `prepare` seed the fresh state (modelview,
    /// incoming pixel block) before the traversal.
    pub fn render_with(&mut self, prepare: impl FnOnce(&mut RenderState)) -> &RenderState {
        self.state.begin_frame();
        prepare(&mut self.state);
        if self.caching {
            self.cache.render(&mut self.chain, &mut self.state);
        } else {
            self.chain.render(&mut self.state);
        }
        &self.state
    }

    /// Translates the last frame for a wgpu backend.
    pub fn plan(&self, depth_format: wgpu::TextureFormat) -> Result<FramePlan> {
        FramePlan::from_state(&self.state, depth_format).map_err(Error::from)
    }

    /// Returns the state left by the last frame.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Returns the nodes in traversal order.
    pub fn chain(&self) -> &RenderChain {
        &self.chain
    }

    /// Returns the render cache's hit and miss counters.
    pub fn cache_stats(&self) -> gem_core::CacheStats {
        self.cache.stats()
    }

    /// Returns the registry stores are bound in.
    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }
}
