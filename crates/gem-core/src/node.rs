//! The stateful node contract.
//!
//! A [`StatefulNode`] owns typed parameters, accepts control messages that
//! update them, and applies them to the [`RenderState`] once per traversal.
//!
//! # Modified flag
//!
//! Every successful parameter update marks the node [`Modified`]. The node
//! itself never clears the flag; whoever consumes it (typically the
//! [`RenderCache`](crate::chain::RenderCache)) calls
//! [`StatefulNode::take_modified`] after deciding what to do with it.
//! `apply` ignores the flag entirely and always issues its calls.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::atom::Atom;
use crate::error::{GemError, Result};
use crate::state::RenderState;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How many constructor arguments a node class accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Minimum argument count.
    pub min: usize,
    /// Maximum argument count.
    pub max: usize,
}

impl Arity {
    /// Accepts between `min` and `max` arguments inclusive.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Accepts zero up to `max` arguments.
    #[must_use]
    pub const fn up_to(max: usize) -> Self {
        Self { min: 0, max }
    }

    /// Validates an argument list for `class`.
    pub fn check(self, class: &'static str, args: &[Atom]) -> Result<()> {
        if args.len() < self.min || args.len() > self.max {
            return Err(GemError::invalid_configuration(
                class,
                format!(
                    "invalid number of arguments: got {}, expected {}..={}",
                    args.len(),
                    self.min,
                    self.max
                ),
            ));
        }
        Ok(())
    }
}

/// The "modified since last examined" flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modified(bool);

impl Modified {
    /// A flag that starts set, so the first consumer sees fresh parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self(true)
    }

    /// Sets the flag.
    pub fn mark(&mut self) {
        self.0 = true;
    }

    /// Returns the flag.
    #[must_use]
    pub fn is_set(self) -> bool {
        self.0
    }

    /// Returns the flag and clears it.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

/// A render-graph node that mutates the shared render state.
pub trait StatefulNode: Send {
    /// Returns this instance's id.
    fn id(&self) -> NodeId;

    /// Returns the host-visible class name (e.g. `"GEMglDepthFunc"`).
    fn class_name(&self) -> &'static str;

    /// Returns how many constructor arguments the class accepts.
    fn arity(&self) -> Arity;

    /// Handles a control message.
    ///
    /// On error, every parameter keeps its previous value and the modified
    /// flag is untouched.
    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()>;

    /// Applies the node's current parameters to the state.
    fn apply(&self, state: &mut RenderState);

    /// Returns the modified flag without clearing it.
    fn is_modified(&self) -> bool;

    /// Returns the modified flag and clears it.
    fn take_modified(&mut self) -> bool;

    /// Whether `apply` depends on something besides the node's parameters.
    ///
    /// Volatile nodes are re-applied every frame by caching layers.
    fn is_volatile(&self) -> bool {
        false
    }
}

/// Reads an optional float argument, falling back to `default` when absent.
pub fn float_arg(
    class: &'static str,
    param: &str,
    args: &[Atom],
    index: usize,
    default: f32,
) -> Result<f32> {
    match args.get(index) {
        None => Ok(default),
        Some(Atom::Float(f)) => Ok(*f),
        Some(Atom::Symbol(s)) => Err(GemError::invalid_argument(
            class,
            param,
            format!("expected a number, got '{s}'"),
        )),
    }
}

/// Reads a required symbol argument.
pub fn symbol_arg<'a>(
    class: &'static str,
    param: &str,
    args: &'a [Atom],
    index: usize,
) -> Result<&'a str> {
    args.get(index)
        .and_then(Atom::as_symbol)
        .ok_or_else(|| GemError::invalid_argument(class, param, "expected a symbol"))
}

/// Checks a control message's argument count.
pub fn expect_args(
    class: &'static str,
    selector: &str,
    args: &[Atom],
    min: usize,
    max: usize,
) -> Result<()> {
    if args.len() < min || args.len() > max {
        return Err(GemError::invalid_argument(
            class,
            selector,
            format!("expected {min}..={max} arguments, got {}", args.len()),
        ));
    }
    Ok(())
}
