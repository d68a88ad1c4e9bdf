use gem_core::node::{expect_args, float_arg};
use gem_core::{Arity, Atom, GemError, GlCall, Modified, NodeId, RenderState, Result, StatefulNode};
use glam::Vec4;

/// `GEMglColor4f`: sets the current color.
pub struct Color4f {
    id: NodeId,
    modified: Modified,
    color: Vec4,
}

const COMPONENTS: [&str; 4] = ["red", "green", "blue", "alpha"];

fn parse_color(class: &'static str, args: &[Atom]) -> Result<Vec4> {
    let mut c = [0.0f32; 4];
    for (i, (slot, name)) in c.iter_mut().zip(COMPONENTS).enumerate() {
        *slot = float_arg(class, name, args, i, 0.0)?;
    }
    Ok(Vec4::from_array(c))
}

impl Color4f {
    pub const CLASS: &'static str = "GEMglColor4f";
    pub const ARITY: Arity = Arity::up_to(4);

    /// Creates the node from `[r g b a]`. Missing components are zero.
    pub fn new(args: &[Atom]) -> Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            color: parse_color(Self::CLASS, args)?,
        })
    }

    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.modified.mark();
    }
}

impl StatefulNode for Color4f {
    node_common!();

    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()> {
        if let Some(i) = COMPONENTS.iter().position(|c| *c == selector) {
            expect_args(Self::CLASS, selector, args, 1, 1)?;
            let value = float_arg(Self::CLASS, selector, args, 0, 0.0)?;
            let mut color = self.color;
            color[i] = value;
            self.set_color(color);
            return Ok(());
        }
        match selector {
            "color" => {
                expect_args(Self::CLASS, selector, args, 0, 4)?;
                self.set_color(parse_color(Self::CLASS, args)?);
                Ok(())
            }
            _ => Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
    }

    fn apply(&self, state: &mut RenderState) {
        state.issue(self.id, GlCall::Color4f(self.color));
    }
}
