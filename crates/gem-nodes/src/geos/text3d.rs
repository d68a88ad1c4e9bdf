//! Outline text.

use gem_core::node::{expect_args, float_arg, symbol_arg};
use gem_core::{
    Arity, Atom, GemError, GlCall, HAlign, Modified, NodeId, RenderState, Result, Settings,
    StatefulNode, TextDraw, VAlign,
};

/// Font used when the `font.face` setting is absent.
pub const FALLBACK_FONT: &str = "vera.ttf";
/// Default font size in points.
pub const DEFAULT_SIZE: f32 = 20.0;
/// Default outline tessellation precision.
pub const DEFAULT_PRECISION: f32 = 1.0;

fn positive(class: &'static str, param: &str, value: f32) -> Result<f32> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(GemError::invalid_argument(
            class,
            param,
            format!("must be positive, got {value}"),
        ))
    }
}

fn parse_halign(name: &str) -> Option<HAlign> {
    match name.to_ascii_lowercase().as_str() {
        "left" => Some(HAlign::Left),
        "center" | "centre" => Some(HAlign::Center),
        "right" => Some(HAlign::Right),
        _ => None,
    }
}

fn parse_valign(name: &str) -> Option<VAlign> {
    match name.to_ascii_lowercase().as_str() {
        "top" => Some(VAlign::Top),
        "middle" | "center" | "centre" => Some(VAlign::Middle),
        "bottom" => Some(VAlign::Bottom),
        "base" | "baseline" => Some(VAlign::Baseline),
        _ => None,
    }
}

/// `text3d`: draws a string with an outline font.
///
/// The node only describes the draw; glyph rasterization is up to whatever
/// backend consumes [`GlCall::DrawText`].
pub struct Text3d {
    id: NodeId,
    modified: Modified,
    text: String,
    font: String,
    size: f32,
    precision: f32,
    halign: HAlign,
    valign: VAlign,
}

impl Text3d {
    pub const CLASS: &'static str = "text3d";
    pub const ARITY: Arity = Arity::up_to(2);

    /// Creates the node from `[size] [precision]`, taking the font from
    /// `font.face`.
    pub fn new(args: &[Atom], settings: &Settings) -> Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        let size = positive(
            Self::CLASS,
            "size",
            float_arg(Self::CLASS, "size", args, 0, DEFAULT_SIZE)?,
        )?;
        let precision = positive(
            Self::CLASS,
            "precision",
            float_arg(Self::CLASS, "precision", args, 1, DEFAULT_PRECISION)?,
        )?;
        let font = settings
            .get_symbol("font.face")
            .unwrap_or(FALLBACK_FONT)
            .to_string();
        log::debug!("{}: using font '{font}'", Self::CLASS);

        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            text: String::new(),
            font,
            size,
            precision,
            halign: HAlign::default(),
            valign: VAlign::default(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn font(&self) -> &str {
        &self.font
    }

    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[must_use]
    pub fn justify(&self) -> (HAlign, VAlign) {
        (self.halign, self.valign)
    }

    /// Sets the text from message atoms, separated by single spaces.
    pub fn set_text(&mut self, atoms: &[Atom]) {
        self.text = atoms
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        self.modified.mark();
    }

    fn set_justify(&mut self, args: &[Atom]) -> Result<()> {
        expect_args(Self::CLASS, "justify", args, 1, 2)?;
        let bad = |param: &str| {
            GemError::invalid_argument(Self::CLASS, param, "unknown alignment")
        };
        let h = parse_halign(symbol_arg(Self::CLASS, "justify", args, 0)?)
            .ok_or_else(|| bad("justify"))?;
        let v = match args.get(1) {
            Some(_) => parse_valign(symbol_arg(Self::CLASS, "justify", args, 1)?)
                .ok_or_else(|| bad("justify"))?,
            None => self.valign,
        };
        self.halign = h;
        self.valign = v;
        self.modified.mark();
        Ok(())
    }
}

impl StatefulNode for Text3d {
    node_common!();

    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()> {
        match selector {
            "text" => {
                self.set_text(args);
                Ok(())
            }
            "font" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                self.font = symbol_arg(Self::CLASS, selector, args, 0)?.to_string();
                self.modified.mark();
                Ok(())
            }
            "size" | "precision" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                let value = positive(
                    Self::CLASS,
                    selector,
                    float_arg(Self::CLASS, selector, args, 0, 0.0)?,
                )?;
                if selector == "size" {
                    self.size = value;
                } else {
                    self.precision = value;
                }
                self.modified.mark();
                Ok(())
            }
            "justify" => self.set_justify(args),
            _ => Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
    }

    fn apply(&self, state: &mut RenderState) {
        if self.text.is_empty() {
            return;
        }
        let draw = TextDraw {
            text: self.text.clone(),
            font: self.font.clone(),
            size: self.size,
            precision: self.precision,
            halign: self.halign,
            valign: self.valign,
            transform: state.modelview(),
        };
        state.issue(self.id, GlCall::DrawText(draw));
    }

    // the draw captures the current modelview
    fn is_volatile(&self) -> bool {
        true
    }
}
