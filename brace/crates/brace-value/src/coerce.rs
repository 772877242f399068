//! Operand coercion and the binary/unary operator semantics that depend on
//! it. These rules mirror the client-side evaluator bit-for-bit; resist
//! the urge to "clean up" the special cases pinned in the tests below, a
//! few of them look arbitrary because the system they match is.

use crate::value::{Origin, Value};

/// A value paired with the origin of the token it came from. Every binary
/// operator takes two of these: the origin is what the "both string" /
/// "both numeric" rule below keys off of.
#[derive(Clone, Debug, PartialEq)]
pub struct Operand {
    pub value: Value,
    pub origin: Origin,
}

impl Operand {
    pub fn new(value: Value, origin: Origin) -> Self {
        Self { value, origin }
    }
}

impl From<(Value, Origin)> for Operand {
    fn from((value, origin): (Value, Origin)) -> Self {
        Operand::new(value, origin)
    }
}

/// An operand is numeric-ish if its payload parses as a number or is the
/// empty string.
pub fn is_numeric_ish(value: &Value) -> bool {
    let payload = value.payload();
    payload.is_empty() || try_parse_number(&payload).is_some()
}

/// An operand is string-ish if it is not numeric-ish, or is the empty
/// string (the empty string is both).
pub fn is_string_ish(value: &Value) -> bool {
    !is_numeric_ish(value) || value.payload().is_empty()
}

/// Numeric coercion: parses the payload, treating the empty string and any
/// non-numeric payload as `0.0` for arithmetic contexts where the spec
/// does not call for `NaN` (unary `+`/`-`); arithmetic operators that
/// require "both numeric" use [`is_numeric_ish`] to fall back to `NaN`
/// themselves instead of calling this directly on a non-numeric-ish value.
pub fn to_number(value: &Value) -> f64 {
    let payload = value.payload();
    if payload.is_empty() {
        0.0
    } else {
        try_parse_number(&payload).unwrap_or(0.0)
    }
}

fn try_parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let lower = s.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Host truthiness: `0`, `""`, `false`, and null are falsy; everything else
/// is truthy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Num(n) => *n != 0.0,
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Str(_) => {
            let payload = value.payload();
            !payload.is_empty() && payload != "0"
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Numeric,
    /// Either genuinely both string-ish, or both numeric-ish but demoted
    /// to string comparison because one side was quoted.
    StringLike,
    /// One operand numeric-ish, the other not: a genuine type mismatch.
    Mismatch,
}

fn mode(a: &Operand, b: &Operand) -> Mode {
    let both_numeric = is_numeric_ish(&a.value) && is_numeric_ish(&b.value);
    if both_numeric {
        if a.origin.is_quoted() || b.origin.is_quoted() {
            Mode::StringLike
        } else {
            Mode::Numeric
        }
    } else if is_string_ish(&a.value) && is_string_ish(&b.value) {
        Mode::StringLike
    } else {
        Mode::Mismatch
    }
}

/// `+`: concatenates when both operands resolve to string mode, otherwise
/// adds numerically (an unparseable operand contributes `0.0`).
pub fn add(a: &Operand, b: &Operand) -> Value {
    match mode(a, b) {
        Mode::StringLike => Value::Str(format!("{}{}", a.value.payload(), b.value.payload())),
        Mode::Numeric | Mode::Mismatch => Value::Num(to_number(&a.value) + to_number(&b.value)),
    }
}

/// `-`, `*`, `/` all require "both numeric"; anything else, including the
/// string-coercion override, yields `NaN`. Division by zero yields `NaN`
/// rather than an error.
pub fn sub(a: &Operand, b: &Operand) -> Value {
    arithmetic(a, b, |x, y| x - y)
}

pub fn mul(a: &Operand, b: &Operand) -> Value {
    arithmetic(a, b, |x, y| x * y)
}

pub fn div(a: &Operand, b: &Operand) -> Value {
    arithmetic(a, b, |x, y| if y == 0.0 { f64::NAN } else { x / y })
}

fn arithmetic(a: &Operand, b: &Operand, op: impl Fn(f64, f64) -> f64) -> Value {
    match mode(a, b) {
        Mode::Numeric => Value::Num(op(to_number(&a.value), to_number(&b.value))),
        Mode::StringLike | Mode::Mismatch => Value::Num(f64::NAN),
    }
}

/// Loose equality: numeric comparison when both operands are genuinely
/// numeric, exact payload comparison otherwise.
pub fn eq(a: &Operand, b: &Operand) -> bool {
    match mode(a, b) {
        Mode::Numeric => to_number(&a.value) == to_number(&b.value),
        Mode::StringLike | Mode::Mismatch => a.value.payload() == b.value.payload(),
    }
}

pub fn ne(a: &Operand, b: &Operand) -> bool {
    !eq(a, b)
}

/// Ordered comparisons. Numeric mode compares numerically, string mode
/// compares lexicographically, and a genuine mismatch is always `false`
/// (per the spec: comparing a number to an incompatible string is never
/// true in either direction), except for the two special-cased payload
/// pairs pinned below, which override the textual rule by spec.
pub fn lt(a: &Operand, b: &Operand) -> bool {
    ordered(a, b, |o| o == std::cmp::Ordering::Less)
}

pub fn gt(a: &Operand, b: &Operand) -> bool {
    ordered(a, b, |o| o == std::cmp::Ordering::Greater)
}

pub fn le(a: &Operand, b: &Operand) -> bool {
    if a.value.payload() == "0" && b.value.payload().is_empty() {
        return true;
    }
    ordered(a, b, |o| o != std::cmp::Ordering::Greater)
}

pub fn ge(a: &Operand, b: &Operand) -> bool {
    if a.value.payload().is_empty() && b.value.payload() == "0" {
        return true;
    }
    ordered(a, b, |o| o != std::cmp::Ordering::Less)
}

fn ordered(a: &Operand, b: &Operand, accept: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    match mode(a, b) {
        Mode::Numeric => to_number(&a.value)
            .partial_cmp(&to_number(&b.value))
            .is_some_and(&accept),
        Mode::StringLike => accept(a.value.payload().cmp(&b.value.payload())),
        Mode::Mismatch => false,
    }
}

/// `||`, `&&`: host truthiness of the raw payload, no coercion mode needed.
pub fn or(a: &Value, b: &Value) -> bool {
    truthy(a) || truthy(b)
}

pub fn and(a: &Value, b: &Value) -> bool {
    truthy(a) && truthy(b)
}

/// Unary `!`: truthiness negation.
pub fn not(a: &Value) -> bool {
    !truthy(a)
}

/// Unary `+`/`-`: numeric-coerce then optionally negate.
pub fn unary_plus(a: &Value) -> Value {
    Value::Num(to_number(a))
}

pub fn unary_minus(a: &Value) -> Value {
    Value::Num(-to_number(a))
}
