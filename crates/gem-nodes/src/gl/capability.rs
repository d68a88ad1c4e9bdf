use gem_core::gl::{self, GlKind};
use gem_core::node::expect_args;
use gem_core::{Arity, Atom, GemError, GlCall, Modified, NodeId, RenderState, Result, StatefulNode};

/// `GEMglEnable` / `GEMglDisable`: toggles one server-side capability.
///
/// Until a capability is set the node issues nothing.
pub struct Capability {
    id: NodeId,
    modified: Modified,
    enable: bool,
    cap: Option<u32>,
}

impl Capability {
    pub const ENABLE_CLASS: &'static str = "GEMglEnable";
    pub const DISABLE_CLASS: &'static str = "GEMglDisable";
    pub const ARITY: Arity = Arity::up_to(1);

    fn with_mode(enable: bool, args: &[Atom]) -> Result<Self> {
        let class = if enable {
            Self::ENABLE_CLASS
        } else {
            Self::DISABLE_CLASS
        };
        Self::ARITY.check(class, args)?;
        let cap = args
            .first()
            .map(|atom| gl::resolve(atom, GlKind::Capability))
            .transpose()?;
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            enable,
            cap,
        })
    }

    /// Creates a `GEMglEnable` node.
    pub fn enable(args: &[Atom]) -> Result<Self> {
        Self::with_mode(true, args)
    }

    /// Creates a `GEMglDisable` node.
    pub fn disable(args: &[Atom]) -> Result<Self> {
        Self::with_mode(false, args)
    }

    #[must_use]
    pub fn cap(&self) -> Option<u32> {
        self.cap
    }

    #[must_use]
    pub fn is_enable(&self) -> bool {
        self.enable
    }

    fn class(&self) -> &'static str {
        if self.enable {
            Self::ENABLE_CLASS
        } else {
            Self::DISABLE_CLASS
        }
    }
}

impl StatefulNode for Capability {
    fn id(&self) -> NodeId {
        self.id
    }

    fn class_name(&self) -> &'static str {
        self.class()
    }

    fn arity(&self) -> Arity {
        Self::ARITY
    }

    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()> {
        let class = self.class();
        match selector {
            "cap" => {
                expect_args(class, selector, args, 1, 1)?;
                self.cap = Some(gl::resolve(&args[0], GlKind::Capability)?);
                self.modified.mark();
                Ok(())
            }
            _ => Err(GemError::unknown_selector(class, selector)),
        }
    }

    fn apply(&self, state: &mut RenderState) {
        let Some(cap) = self.cap else {
            return;
        };
        let call = if self.enable {
            GlCall::Enable(cap)
        } else {
            GlCall::Disable(cap)
        };
        state.issue(self.id, call);
    }

    fn is_modified(&self) -> bool {
        self.modified.is_set()
    }

    fn take_modified(&mut self) -> bool {
        self.modified.take()
    }
}
