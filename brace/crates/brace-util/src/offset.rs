//! Source location tracking.
//!
//! Unlike a full compiler, the engine never needs multi-file spans: every
//! expression is evaluated against its own source string, so a single
//! 0-based character offset is enough to point back at the offending
//! lexeme.

use std::fmt;

/// A 0-based character offset into an expression or host string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceOffset(pub usize);

impl SourceOffset {
    pub const ZERO: SourceOffset = SourceOffset(0);

    #[inline]
    pub const fn new(offset: usize) -> Self {
        Self(offset)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for SourceOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for SourceOffset {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_numeric_ordering() {
        assert!(SourceOffset::new(3) < SourceOffset::new(4));
        assert_eq!(SourceOffset::ZERO, SourceOffset::new(0));
    }
}
