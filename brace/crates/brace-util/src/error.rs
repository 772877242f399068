//! Shared error-kind taxonomy.
//!
//! Every `brace-*` crate that can fail defines its own `thiserror` error
//! enum at its own seam (`brace-par::EvalError`, `brace-registry::RegistryError`,
//! ...), but they all classify into the same five kinds the host cares about.
//! `ErrorKind` is that shared classification, so a host can group or filter
//! errors without matching on crate-specific variants.

use std::fmt;

/// The five error kinds the expression engine can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized token, unbalanced parentheses, unterminated expression,
    /// extra tokens after a full parse, undefined function, undefined
    /// variable.
    Syntax,
    /// Wrong number of arguments for a known function.
    Arity,
    /// Assignment to a read-only variable, or an attempt to assign to
    /// something other than a variable.
    Type,
    /// An underlying function implementation or resolver call failed.
    Runtime,
    /// An invariant the parser is supposed to guarantee didn't hold (e.g.
    /// the value stack wasn't exactly 1 deep after a successful parse).
    /// Never expected to surface outside of a bug, but recorded rather than
    /// panicked so a host embedding the engine stays in control.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Arity => "arity error",
            ErrorKind::Type => "type error",
            ErrorKind::Runtime => "runtime error",
            ErrorKind::Internal => "internal error",
        };
        write!(f, "{s}")
    }
}
