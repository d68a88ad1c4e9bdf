//! Render chains and the call cache built on the modified flag.

use std::collections::HashMap;

use crate::atom::Atom;
use crate::error::{GemError, Result};
use crate::node::{NodeId, StatefulNode};
use crate::state::{GlCall, RenderState};

/// An ordered list of nodes traversed once per frame.
#[derive(Default)]
pub struct RenderChain {
    nodes: Vec<Box<dyn StatefulNode>>,
}

impl RenderChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its id.
    pub fn push(&mut self, node: Box<dyn StatefulNode>) -> NodeId {
        let id = node.id();
        log::debug!("chain: appending {} {id}", node.class_name());
        self.nodes.push(node);
        id
    }

    /// Removes a node by id.
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn StatefulNode>> {
        let index = self.nodes.iter().position(|n| n.id() == id)?;
        Some(self.nodes.remove(index))
    }

    /// Gets a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&dyn StatefulNode> {
        self.nodes.iter().find(|n| n.id() == id).map(|n| n.as_ref())
    }

    /// Gets a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Box<dyn StatefulNode>> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    /// Routes a control message to a node.
    pub fn send(&mut self, id: NodeId, selector: &str, args: &[Atom]) -> Result<()> {
        let node = self.get_mut(id).ok_or(GemError::UnknownNode(id))?;
        let result = node.update(selector, args);
        if let Err(e) = &result {
            log::warn!("{e}");
        }
        result
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the chain has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the nodes in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn StatefulNode> {
        self.nodes.iter().map(|n| n.as_ref())
    }

    /// Applies every node in order.
    pub fn render(&self, state: &mut RenderState) {
        for node in &self.nodes {
            node.apply(state);
        }
    }
}

/// Hit/miss counters of a [`RenderCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Nodes whose previous calls were replayed.
    pub hits: u64,
    /// Nodes that were applied afresh.
    pub misses: u64,
}

/// Replays the previous frame's calls for nodes that have not been modified.
///
/// This is the consumer of the modified flag: a node that is modified,
/// volatile, or not yet seen is applied and its calls captured, and its flag
/// is cleared. Otherwise its captured calls are issued again in its name.
#[derive(Debug, Default)]
pub struct RenderCache {
    captured: HashMap<NodeId, Vec<GlCall>>,
    stats: CacheStats,
}

impl RenderCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Traverses `chain`, reusing captured calls where allowed.
    pub fn render(&mut self, chain: &mut RenderChain, state: &mut RenderState) {
        for node in &mut chain.nodes {
            let id = node.id();
            let reusable = !node.is_volatile() && !node.is_modified();
            if reusable {
                if let Some(calls) = self.captured.get(&id) {
                    for call in calls {
                        state.issue(id, call.clone());
                    }
                    self.stats.hits += 1;
                    continue;
                }
            }

            node.take_modified();
            let start = state.calls().len();
            node.apply(state);
            self.captured.insert(id, state.calls()[start..].to_vec());
            self.stats.misses += 1;
        }

        self.captured
            .retain(|id, _| chain.nodes.iter().any(|n| n.id() == *id));
    }

    /// Drops the captured calls of one node.
    pub fn invalidate(&mut self, id: NodeId) {
        self.captured.remove(&id);
    }

    /// Drops everything captured.
    pub fn clear(&mut self) {
        self.captured.clear();
    }

    /// Returns the hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
