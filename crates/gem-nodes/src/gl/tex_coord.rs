use gem_core::node::{expect_args, float_arg};
use gem_core::{
    truncate_i16, Arity, Atom, GemError, GlCall, Modified, NodeId, RenderState, Result,
    StatefulNode,
};

/// `GEMglTexCoord4sv`: sets the current texture coordinate from a short vector.
///
/// Values are truncated toward zero and saturate at the `i16` range.
pub struct TexCoord4sv {
    id: NodeId,
    modified: Modified,
    v: [i16; 4],
}

fn parse_vector(class: &'static str, args: &[Atom]) -> Result<[i16; 4]> {
    let mut v = [0i16; 4];
    for (i, slot) in v.iter_mut().enumerate() {
        *slot = truncate_i16(float_arg(class, "v", args, i, 0.0)?);
    }
    Ok(v)
}

impl TexCoord4sv {
    pub const CLASS: &'static str = "GEMglTexCoord4sv";
    pub const ARITY: Arity = Arity::up_to(4);

    pub fn new(args: &[Atom]) -> Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            v: parse_vector(Self::CLASS, args)?,
        })
    }

    #[must_use]
    pub fn v(&self) -> [i16; 4] {
        self.v
    }

    /// Missing components become zero.
    pub fn set_v(&mut self, args: &[Atom]) -> Result<()> {
        expect_args(Self::CLASS, "v", args, 0, 4)?;
        self.v = parse_vector(Self::CLASS, args)?;
        self.modified.mark();
        Ok(())
    }
}

impl StatefulNode for TexCoord4sv {
    node_common!();

    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()> {
        match selector {
            "v" => self.set_v(args),
            _ => Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
    }

    fn apply(&self, state: &mut RenderState) {
        state.issue(self.id, GlCall::TexCoord4s(self.v));
    }
}
