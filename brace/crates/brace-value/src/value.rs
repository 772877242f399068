//! The run-time value and provenance types.

use std::fmt;

/// A run-time value produced by evaluating an expression.
///
/// This is the typed replacement for the untyped payload/offset/tag tuples
/// the coercion rules were originally specified against: the numeric,
/// string, and boolean cases are distinct variants instead of one loosely
/// typed slot, while [`Origin`] carries the provenance bit the coercion
/// rules still need.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The raw payload these values coerce and compare against: numbers
    /// render in their canonical decimal form, booleans render as PHP-style
    /// `"1"`/`""`, and null renders as the empty string.
    pub fn payload(&self) -> String {
        match self {
            Value::Num(n) => format_number(*n),
            Value::Str(s) => s.clone(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Where a value's textual form came from. Load-bearing for coercion: two
/// numeric-ish operands are compared as strings rather than numbers when
/// either one originated from a quoted literal (see [`crate::coerce`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Number,
    String,
    DqString,
    SqString,
    Word,
}

impl Origin {
    /// Whether this origin forces numeric-ish operands into string mode.
    pub fn is_quoted(self) -> bool {
        matches!(self, Origin::DqString | Origin::SqString | Origin::String)
    }
}

/// Canonical decimal rendering for a run-time number: integral values
/// render without a decimal point, others render with the minimum digits
/// needed to round-trip, matching how the host's numeric-to-string
/// coercion reads in the test scenarios (`1+2` renders as `3`, not `3.0`).
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let mut s = format!("{n}");
        if !s.contains(['e', 'E']) && s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_decimal_point() {
        assert_eq!(Value::Num(3.0).payload(), "3");
        assert_eq!(Value::Num(-12.0).payload(), "-12");
    }

    #[test]
    fn fractional_numbers_trim_trailing_zeros() {
        assert_eq!(Value::Num(1.5).payload(), "1.5");
        assert_eq!(Value::Num(0.1).payload(), "0.1");
    }

    #[test]
    fn bool_renders_php_style() {
        assert_eq!(Value::Bool(true).payload(), "1");
        assert_eq!(Value::Bool(false).payload(), "");
    }

    #[test]
    fn null_renders_empty() {
        assert_eq!(Value::Null.payload(), "");
    }
}
