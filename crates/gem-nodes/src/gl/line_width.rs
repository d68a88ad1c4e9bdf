use gem_core::node::{expect_args, float_arg};
use gem_core::{Arity, Atom, GemError, GlCall, Modified, NodeId, RenderState, Result, StatefulNode};

/// `GEMglLineWidth`: sets the rasterized line width.
pub struct LineWidth {
    id: NodeId,
    modified: Modified,
    width: f32,
}

fn parse_width(class: &'static str, args: &[Atom]) -> Result<f32> {
    let width = float_arg(class, "width", args, 0, 1.0)?;
    if width > 0.0 && width.is_finite() {
        Ok(width)
    } else {
        Err(GemError::invalid_argument(
            class,
            "width",
            format!("must be positive, got {width}"),
        ))
    }
}

impl LineWidth {
    pub const CLASS: &'static str = "GEMglLineWidth";
    pub const ARITY: Arity = Arity::up_to(1);

    pub fn new(args: &[Atom]) -> Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            width: parse_width(Self::CLASS, args)?,
        })
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }
}

impl StatefulNode for LineWidth {
    node_common!();

    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()> {
        match selector {
            "width" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                self.width = parse_width(Self::CLASS, args)?;
                self.modified.mark();
                Ok(())
            }
            _ => Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
    }

    fn apply(&self, state: &mut RenderState) {
        state.issue(self.id, GlCall::LineWidth(self.width));
    }
}
