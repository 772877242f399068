//! The five error kinds from §7, each carrying the source offset of the
//! token that triggered it.

use std::cmp::Ordering;

use thiserror::Error;

use brace_util::{ErrorKind, SourceOffset};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("{message}")]
    Syntax { message: String, offset: SourceOffset },

    #[error("{message}")]
    Arity { message: String, offset: SourceOffset },

    #[error("{message}")]
    Type { message: String, offset: SourceOffset },

    #[error("{message}")]
    Runtime { message: String, offset: SourceOffset },

    /// The stack held something other than exactly one value after a
    /// production that should have left exactly one. Never expected to
    /// surface from a correct parse; kept as a checked invariant rather
    /// than an unreachable!().
    #[error("internal evaluator error: {message}")]
    Internal { message: String, offset: SourceOffset },
}

impl EvalError {
    pub fn syntax(message: impl Into<String>, offset: SourceOffset) -> Self {
        EvalError::Syntax { message: message.into(), offset }
    }

    pub fn arity(message: impl Into<String>, offset: SourceOffset) -> Self {
        EvalError::Arity { message: message.into(), offset }
    }

    pub fn type_error(message: impl Into<String>, offset: SourceOffset) -> Self {
        EvalError::Type { message: message.into(), offset }
    }

    pub fn runtime(message: impl Into<String>, offset: SourceOffset) -> Self {
        EvalError::Runtime { message: message.into(), offset }
    }

    pub fn internal(message: impl Into<String>, offset: SourceOffset) -> Self {
        EvalError::Internal { message: message.into(), offset }
    }

    pub fn offset(&self) -> SourceOffset {
        match self {
            EvalError::Syntax { offset, .. }
            | EvalError::Arity { offset, .. }
            | EvalError::Type { offset, .. }
            | EvalError::Runtime { offset, .. }
            | EvalError::Internal { offset, .. } => *offset,
        }
    }

    /// The shared cross-crate classification a host can group/filter on
    /// without matching against this crate's own variants.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Syntax { .. } => ErrorKind::Syntax,
            EvalError::Arity { .. } => ErrorKind::Arity,
            EvalError::Type { .. } => ErrorKind::Type,
            EvalError::Runtime { .. } => ErrorKind::Runtime,
            EvalError::Internal { .. } => ErrorKind::Internal,
        }
    }
}

/// Orders a batch of errors for display by the source offset of the
/// triggering token, earliest first.
pub fn sort_by_offset(errors: &mut [EvalError]) {
    errors.sort_by(|a, b| compare_by_offset(a, b));
}

fn compare_by_offset(a: &EvalError, b: &EvalError) -> Ordering {
    a.offset().cmp(&b.offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_orders_earliest_offset_first() {
        let mut errors = vec![
            EvalError::syntax("late", SourceOffset::new(10)),
            EvalError::syntax("early", SourceOffset::new(2)),
        ];
        sort_by_offset(&mut errors);
        assert_eq!(errors[0].offset(), SourceOffset::new(2));
    }

    #[test]
    fn kind_classifies_each_variant() {
        assert_eq!(EvalError::syntax("x", SourceOffset::ZERO).kind(), ErrorKind::Syntax);
        assert_eq!(EvalError::arity("x", SourceOffset::ZERO).kind(), ErrorKind::Arity);
        assert_eq!(EvalError::type_error("x", SourceOffset::ZERO).kind(), ErrorKind::Type);
        assert_eq!(EvalError::runtime("x", SourceOffset::ZERO).kind(), ErrorKind::Runtime);
        assert_eq!(EvalError::internal("x", SourceOffset::ZERO).kind(), ErrorKind::Internal);
    }
}
