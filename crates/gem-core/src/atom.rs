//! Message atoms: the typed arguments a host hands to nodes.
//!
//! Every constructor argument, control message argument and settings value is
//! an [`Atom`]: either a number or a symbol.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single message argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Atom {
    /// A numeric argument. Hosts send all numbers as single-precision floats.
    Float(f32),
    /// A symbolic argument.
    Symbol(String),
}

impl Atom {
    /// Creates a symbol atom.
    pub fn symbol(s: impl Into<String>) -> Self {
        Atom::Symbol(s.into())
    }

    /// Interprets a raw token: numeric if [`parse_numeric`] accepts the whole
    /// token, symbolic otherwise.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match parse_numeric(token) {
            #[allow(clippy::cast_possible_truncation)]
            Some(value) => Atom::Float(value as f32),
            None => Atom::Symbol(token.to_string()),
        }
    }

    /// Returns the numeric value, if this is a float.
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Atom::Float(f) => Some(*f),
            Atom::Symbol(_) => None,
        }
    }

    /// Returns the symbol text, if this is a symbol.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Atom::Float(_) => None,
            Atom::Symbol(s) => Some(s),
        }
    }

    /// Returns true if this atom is a float.
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, Atom::Float(_))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Float(v) => write!(f, "{v}"),
            Atom::Symbol(s) => f.write_str(s),
        }
    }
}

impl From<f32> for Atom {
    fn from(value: f32) -> Self {
        Atom::Float(value)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Atom::Symbol(value.to_string())
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Atom::Symbol(value)
    }
}

/// Parses a token as a number, accepting only when the whole token is numeric.
///
/// Accepted forms: decimal integers, `0x`/`0X` hexadecimal integers (with an
/// optional sign), and finite decimal floats. Partial matches such as `3abc`,
/// empty strings and non-finite spellings (`inf`, `nan`) are rejected.
#[must_use]
pub fn parse_numeric(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let (negative, unsigned) = match token.as_bytes()[0] {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        return i64::from_str_radix(hex, 16)
            .ok()
            .map(|v| if negative { -(v as f64) } else { v as f64 });
    }

    if let Ok(int) = token.parse::<i64>() {
        #[allow(clippy::cast_precision_loss)]
        return Some(int as f64);
    }

    // Rust's float grammar also admits "inf"/"nan"; those stay symbols.
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Narrows a float to `i16`, truncating toward zero.
///
/// Values beyond the `i16` range saturate; NaN becomes 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn truncate_i16(value: f32) -> i16 {
    value as i16
}

/// Narrows a float to `i32`, truncating toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn truncate_i32(value: f32) -> i32 {
    value as i32
}
