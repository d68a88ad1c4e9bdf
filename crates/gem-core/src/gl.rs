//! Graphics-API constant table.
//!
//! Nodes that take enumerated parameters resolve them here. A symbol must name
//! a known constant (`GL_LESS`, `less`, `gl_less` all work) and a number must
//! equal the value of a known constant. Anything else is rejected; there is no
//! fallback to zero.

use crate::atom::Atom;
use crate::error::{GemError, Result};

// Comparison functions.
pub const GL_NEVER: u32 = 0x0200;
pub const GL_LESS: u32 = 0x0201;
pub const GL_EQUAL: u32 = 0x0202;
pub const GL_LEQUAL: u32 = 0x0203;
pub const GL_GREATER: u32 = 0x0204;
pub const GL_NOTEQUAL: u32 = 0x0205;
pub const GL_GEQUAL: u32 = 0x0206;
pub const GL_ALWAYS: u32 = 0x0207;

// Primitive modes.
pub const GL_POINTS: u32 = 0x0000;
pub const GL_LINES: u32 = 0x0001;
pub const GL_LINE_LOOP: u32 = 0x0002;
pub const GL_LINE_STRIP: u32 = 0x0003;
pub const GL_TRIANGLES: u32 = 0x0004;
pub const GL_TRIANGLE_STRIP: u32 = 0x0005;
pub const GL_TRIANGLE_FAN: u32 = 0x0006;
pub const GL_QUADS: u32 = 0x0007;
pub const GL_QUAD_STRIP: u32 = 0x0008;
pub const GL_POLYGON: u32 = 0x0009;

// Capabilities for enable/disable.
pub const GL_POINT_SMOOTH: u32 = 0x0B10;
pub const GL_LINE_SMOOTH: u32 = 0x0B20;
pub const GL_CULL_FACE: u32 = 0x0B44;
pub const GL_LIGHTING: u32 = 0x0B50;
pub const GL_FOG: u32 = 0x0B60;
pub const GL_DEPTH_TEST: u32 = 0x0B71;
pub const GL_STENCIL_TEST: u32 = 0x0B90;
pub const GL_NORMALIZE: u32 = 0x0BA1;
pub const GL_ALPHA_TEST: u32 = 0x0BC0;
pub const GL_BLEND: u32 = 0x0BE2;
pub const GL_TEXTURE_2D: u32 = 0x0DE1;
pub const GL_TEXTURE_RECTANGLE_EXT: u32 = 0x84F5;

/// Which family a constant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlKind {
    /// Depth/alpha/stencil comparison function.
    CompareFunc,
    /// Primitive assembly mode for draw calls.
    Primitive,
    /// Server-side capability toggled by enable/disable.
    Capability,
}

const TABLE: &[(&str, u32, GlKind)] = &[
    ("GL_NEVER", GL_NEVER, GlKind::CompareFunc),
    ("GL_LESS", GL_LESS, GlKind::CompareFunc),
    ("GL_EQUAL", GL_EQUAL, GlKind::CompareFunc),
    ("GL_LEQUAL", GL_LEQUAL, GlKind::CompareFunc),
    ("GL_GREATER", GL_GREATER, GlKind::CompareFunc),
    ("GL_NOTEQUAL", GL_NOTEQUAL, GlKind::CompareFunc),
    ("GL_GEQUAL", GL_GEQUAL, GlKind::CompareFunc),
    ("GL_ALWAYS", GL_ALWAYS, GlKind::CompareFunc),
    ("GL_POINTS", GL_POINTS, GlKind::Primitive),
    ("GL_LINES", GL_LINES, GlKind::Primitive),
    ("GL_LINE_LOOP", GL_LINE_LOOP, GlKind::Primitive),
    ("GL_LINE_STRIP", GL_LINE_STRIP, GlKind::Primitive),
    ("GL_TRIANGLES", GL_TRIANGLES, GlKind::Primitive),
    ("GL_TRIANGLE_STRIP", GL_TRIANGLE_STRIP, GlKind::Primitive),
    ("GL_TRIANGLE_FAN", GL_TRIANGLE_FAN, GlKind::Primitive),
    ("GL_QUADS", GL_QUADS, GlKind::Primitive),
    ("GL_QUAD_STRIP", GL_QUAD_STRIP, GlKind::Primitive),
    ("GL_POLYGON", GL_POLYGON, GlKind::Primitive),
    ("GL_POINT_SMOOTH", GL_POINT_SMOOTH, GlKind::Capability),
    ("GL_LINE_SMOOTH", GL_LINE_SMOOTH, GlKind::Capability),
    ("GL_CULL_FACE", GL_CULL_FACE, GlKind::Capability),
    ("GL_LIGHTING", GL_LIGHTING, GlKind::Capability),
    ("GL_FOG", GL_FOG, GlKind::Capability),
    ("GL_DEPTH_TEST", GL_DEPTH_TEST, GlKind::Capability),
    ("GL_STENCIL_TEST", GL_STENCIL_TEST, GlKind::Capability),
    ("GL_NORMALIZE", GL_NORMALIZE, GlKind::Capability),
    ("GL_ALPHA_TEST", GL_ALPHA_TEST, GlKind::Capability),
    ("GL_BLEND", GL_BLEND, GlKind::Capability),
    ("GL_TEXTURE_2D", GL_TEXTURE_2D, GlKind::Capability),
    ("GL_TEXTURE_RECTANGLE_EXT", GL_TEXTURE_RECTANGLE_EXT, GlKind::Capability),
];

/// Looks up a constant by name.
///
/// Matching is case-insensitive and the `GL_` prefix is optional.
#[must_use]
pub fn lookup(name: &str) -> Option<(u32, GlKind)> {
    let upper = name.trim().to_ascii_uppercase();
    let full = if upper.starts_with("GL_") {
        upper
    } else {
        format!("GL_{upper}")
    };
    TABLE
        .iter()
        .find(|(n, _, _)| *n == full)
        .map(|&(_, v, k)| (v, k))
}

/// Returns the canonical name of a constant of the given kind.
#[must_use]
pub fn name_of(value: u32, kind: GlKind) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|&&(_, v, k)| v == value && k == kind)
        .map(|&(n, _, _)| n)
}

/// Resolves an atom to a constant of the requested kind.
///
/// Floats are truncated toward zero before lookup. Negative numbers, unknown
/// names, and constants of a different kind are all [`GemError::UnknownToken`].
pub fn resolve(atom: &Atom, kind: GlKind) -> Result<u32> {
    match atom {
        Atom::Symbol(name) => match lookup(name) {
            Some((value, k)) if k == kind => Ok(value),
            _ => Err(GemError::UnknownToken(name.clone())),
        },
        Atom::Float(f) => {
            if *f < 0.0 || !f.is_finite() {
                return Err(GemError::UnknownToken(f.to_string()));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = *f as u32;
            name_of(value, kind)
                .map(|_| value)
                .ok_or_else(|| GemError::UnknownToken(f.to_string()))
        }
    }
}
