use gem_core::gl::{self, GlKind};
use gem_core::node::expect_args;
use gem_core::{Arity, Atom, GemError, GlCall, Modified, NodeId, RenderState, Result, StatefulNode};

/// `GEMglDepthFunc`: sets the depth comparison function.
pub struct DepthFunc {
    id: NodeId,
    modified: Modified,
    func: u32,
}

impl DepthFunc {
    pub const CLASS: &'static str = "GEMglDepthFunc";
    pub const ARITY: Arity = Arity::up_to(1);

    /// Creates the node from `[func]`, defaulting to `GL_LESS`.
    pub fn new(args: &[Atom]) -> Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        let func = match args.first() {
            Some(atom) => gl::resolve(atom, GlKind::CompareFunc)?,
            None => gl::GL_LESS,
        };
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            func,
        })
    }

    #[must_use]
    pub fn func(&self) -> u32 {
        self.func
    }

    pub fn set_func(&mut self, atom: &Atom) -> Result<()> {
        self.func = gl::resolve(atom, GlKind::CompareFunc)?;
        self.modified.mark();
        Ok(())
    }
}

impl StatefulNode for DepthFunc {
    node_common!();

    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()> {
        match selector {
            "func" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                self.set_func(&args[0])
            }
            _ => Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
    }

    fn apply(&self, state: &mut RenderState) {
        state.issue(self.id, GlCall::DepthFunc(self.func));
    }
}
