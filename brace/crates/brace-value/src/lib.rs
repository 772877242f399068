//! brace-value - The run-time value type and its coercion rules.
//!
//! Values here are a small typed sum (`Num`/`Str`/`Bool`/`Null`) rather than
//! the untyped payload tuples the coercion rules were originally specified
//! against, but [`coerce`] reproduces those rules exactly, including the
//! handful of special cases the tests pin rather than rationalize.

mod coerce;
mod value;

pub use coerce::{
    add, and, div, eq, ge, gt, is_numeric_ish, is_string_ish, le, lt, mul, ne, not, or, sub,
    to_number, truthy, unary_minus, unary_plus, Operand,
};
pub use value::{Origin, Value};
