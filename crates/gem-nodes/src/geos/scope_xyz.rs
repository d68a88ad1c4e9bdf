//! A three-dimensional oscilloscope.
//!
//! Three signals drive the x, y and z coordinates of a ring of vertices. The
//! host feeds each signal block through [`ScopeXyz::feed`]; every traversal
//! draws the ring starting at the oldest sample, so the newest sample is
//! always the last vertex.

use gem_core::gl::{self, GlKind};
use gem_core::node::{expect_args, float_arg};
use gem_core::{
    truncate_i32, Arity, Atom, GemError, GlCall, Modified, NodeId, RenderState, Result,
    StatefulNode,
};
use glam::Vec3;

/// Ring length used when none (or zero) is given.
pub const DEFAULT_LENGTH: usize = 64;
/// Longest ring accepted.
pub const MAX_LENGTH: usize = 1 << 20;

fn alloc_ring(length: usize) -> Option<Vec<Vec3>> {
    if length > MAX_LENGTH {
        return None;
    }
    let mut samples = Vec::new();
    samples.try_reserve_exact(length).ok()?;
    samples.resize(length, Vec3::ZERO);
    Some(samples)
}

const DRAW_MODES: &[(&str, u32)] = &[
    ("line", gl::GL_LINE_STRIP),
    ("linestrip", gl::GL_LINE_STRIP),
    ("lines", gl::GL_LINES),
    ("lineloop", gl::GL_LINE_LOOP),
    ("point", gl::GL_POINTS),
    ("points", gl::GL_POINTS),
    ("tri", gl::GL_TRIANGLES),
    ("triangles", gl::GL_TRIANGLES),
    ("tristrip", gl::GL_TRIANGLE_STRIP),
    ("trifan", gl::GL_TRIANGLE_FAN),
    ("quad", gl::GL_QUADS),
    ("quads", gl::GL_QUADS),
    ("quadstrip", gl::GL_QUAD_STRIP),
    ("fill", gl::GL_POLYGON),
    ("polygon", gl::GL_POLYGON),
];

fn draw_mode(class: &'static str, atom: &Atom) -> Result<u32> {
    if let Some(name) = atom.as_symbol() {
        let lower = name.to_ascii_lowercase();
        if let Some(&(_, mode)) = DRAW_MODES.iter().find(|(n, _)| *n == lower) {
            return Ok(mode);
        }
    }
    gl::resolve(atom, GlKind::Primitive).map_err(|_| {
        GemError::invalid_argument(class, "draw", format!("unknown draw style '{atom}'"))
    })
}

/// `scopeXYZ~`
pub struct ScopeXyz {
    id: NodeId,
    modified: Modified,
    samples: Vec<Vec3>,
    position: usize,
    line_width: f32,
    draw: u32,
}

impl ScopeXyz {
    pub const CLASS: &'static str = "scopeXYZ~";
    pub const ARITY: Arity = Arity::up_to(1);

    /// Creates a scope from `[length]`.
    pub fn new(args: &[Atom]) -> Result<Self> {
        Self::ARITY.check(Self::CLASS, args)?;
        let requested = truncate_i32(float_arg(Self::CLASS, "length", args, 0, 0.0)?);
        let length = match requested {
            0 => DEFAULT_LENGTH,
            n if n < 0 => {
                return Err(GemError::invalid_configuration(
                    Self::CLASS,
                    format!("length must be positive, got {n}"),
                ))
            }
            n => n as usize,
        };
        let samples = alloc_ring(length).ok_or_else(|| {
            GemError::invalid_configuration(
                Self::CLASS,
                format!("length {length} exceeds {MAX_LENGTH}"),
            )
        })?;
        Ok(Self {
            id: NodeId::next(),
            modified: Modified::new(),
            samples,
            position: 0,
            line_width: 1.0,
            draw: gl::GL_LINE_STRIP,
        })
    }

    /// Returns the ring length.
    #[must_use]
    pub fn length(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Returns the primitive mode used to draw the ring.
    #[must_use]
    pub fn draw_mode(&self) -> u32 {
        self.draw
    }

    /// Pushes one block of samples. Only as many samples as the shortest
    /// signal holds are taken.
    pub fn feed(&mut self, x: &[f32], y: &[f32], z: &[f32]) {
        let len = self.samples.len();
        for ((&sx, &sy), &sz) in x.iter().zip(y).zip(z) {
            self.samples[self.position] = Vec3::new(sx, sy, sz);
            self.position = (self.position + 1) % len;
        }
        self.modified.mark();
    }

    /// Returns the samples from oldest to newest.
    #[must_use]
    pub fn vertices(&self) -> Vec<Vec3> {
        let (newer, older) = self.samples.split_at(self.position);
        older.iter().chain(newer).copied().collect()
    }

    /// Resizes the ring, keeping the most recent samples.
    pub fn set_length(&mut self, length: usize) -> Result<()> {
        if length == 0 {
            return Err(GemError::invalid_argument(
                Self::CLASS,
                "length",
                "must be at least 1",
            ));
        }
        let mut samples = alloc_ring(length).ok_or_else(|| {
            GemError::invalid_argument(
                Self::CLASS,
                "length",
                format!("{length} exceeds {MAX_LENGTH}"),
            )
        })?;
        let ordered = self.vertices();
        let keep = ordered.len().min(length);
        samples[length - keep..].copy_from_slice(&ordered[ordered.len() - keep..]);
        self.samples = samples;
        self.position = 0;
        self.modified.mark();
        Ok(())
    }
}

impl StatefulNode for ScopeXyz {
    node_common!();

    fn update(&mut self, selector: &str, args: &[Atom]) -> Result<()> {
        match selector {
            "length" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                let n = truncate_i32(float_arg(Self::CLASS, selector, args, 0, 0.0)?);
                self.set_length(usize::try_from(n).unwrap_or(0))
            }
            "linewidth" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                let w = float_arg(Self::CLASS, selector, args, 0, 1.0)?;
                if !(w > 0.0 && w.is_finite()) {
                    return Err(GemError::invalid_argument(
                        Self::CLASS,
                        selector,
                        format!("must be positive, got {w}"),
                    ));
                }
                self.line_width = w;
                self.modified.mark();
                Ok(())
            }
            "draw" => {
                expect_args(Self::CLASS, selector, args, 1, 1)?;
                self.draw = draw_mode(Self::CLASS, &args[0])?;
                self.modified.mark();
                Ok(())
            }
            "bang" => {
                expect_args(Self::CLASS, selector, args, 0, 0)?;
                log::info!(
                    "{}: {} samples, draw {}",
                    Self::CLASS,
                    self.samples.len(),
                    gl::name_of(self.draw, GlKind::Primitive).unwrap_or("?")
                );
                Ok(())
            }
            _ => Err(GemError::unknown_selector(Self::CLASS, selector)),
        }
    }

    fn apply(&self, state: &mut RenderState) {
        state.issue(self.id, GlCall::LineWidth(self.line_width));
        state.issue(
            self.id,
            GlCall::Draw {
                mode: self.draw,
                vertices: self.vertices(),
            },
        );
        state.issue(self.id, GlCall::LineWidth(1.0));
    }
}
