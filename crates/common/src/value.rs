//! Runtime value representation for the Imperivm executor.
//!
//! Values are what live in bindings, on the shared stack, and in heap cells.

use std::fmt;

/// Runtime value representation.
///
/// This is the evaluated form of an [`Operand`](crate::Operand): identifiers
/// have already been resolved through the scope chain.
#[derive(Debug, Clone)]
pub enum Value {
    /// Signed 64-bit integer.
    Integer(i64),
    /// IEEE 754 64-bit float.
    Float(f64),
    /// Text, kept exactly as written between the quotes.
    String(String),
    /// Contents of a heap cell that was grown into but never stored to.
    Empty,
}

// Floats compare bitwise so that Value can implement Eq. Arithmetic never
// relies on this; it only matters for tests and heap inspection.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Empty, Value::Empty) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Truthiness used by `if`, `elif`, `while` and `not`.
    ///
    /// Nonzero numbers and non-empty strings are true. An empty heap cell is
    /// false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Empty => false,
        }
    }

    /// Short name of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Empty => "empty",
        }
    }

    /// Returns the integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write_float(f, *x),
            Value::String(s) => f.write_str(s),
            Value::Empty => f.write_str("None"),
        }
    }
}

/// Shortest round-trip digits; scientific notation outside `1e-4 <= |x| < 1e16`
/// with a signed two-digit exponent (`1e+20`, `2.5e-07`). Whole numbers keep
/// a trailing `.0`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x < 0.0 { "-inf" } else { "inf" });
    }

    let sci = format!("{x:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let fixed = x.to_string();
        if fixed.contains('.') {
            f.write_str(&fixed)
        } else {
            write!(f, "{fixed}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
