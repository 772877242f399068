//! The recursive-descent evaluator: turns a token stream from `brace-lex`
//! into a [`Value`], dispatching function calls through a `brace-registry`
//! [`Registry`] and variable reads/writes through a host-provided
//! [`VariableResolver`].

mod attrs;
mod error;
mod parser;
mod resolver;
mod state;

use std::collections::HashSet;

use brace_registry::Registry;
use brace_value::Value;

pub use attrs::{split_variable, ALLOWED_ATTRS};
pub use brace_util::ErrorKind;
pub use error::{sort_by_offset, EvalError};
pub use resolver::{AssignOp, MapResolver, VariableResolver};

use parser::Parser;

/// Everything a caller needs out of one evaluation: the result, every
/// error collected along the way (ordered earliest-offset-first), and the
/// set of variable names the expression referenced (the host needs this
/// to know which questions to re-evaluate on a later change).
#[derive(Debug, Clone)]
pub struct EvalOutcome {
    pub value: Value,
    pub errors: Vec<EvalError>,
    pub vars_used: HashSet<String>,
}

impl EvalOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Evaluates `source` as a single brace expression (the text already
/// stripped of its surrounding `{`/`}` delimiters).
///
/// `parse_only` validates syntax and collects `vars_used` without reading
/// or writing any variable or calling any function for effect (every
/// read/write/call is short-circuited to a placeholder). `group_seq` and
/// `question_seq` are threaded through to the resolver for `GID`/`QID`
/// style lookups.
pub fn evaluate(
    source: &str,
    registry: &Registry,
    resolver: &mut dyn VariableResolver,
    parse_only: bool,
    group_seq: i64,
    question_seq: i64,
) -> EvalOutcome {
    let tokens = brace_lex::tokenize(source, false);

    if tokens.is_empty() {
        return EvalOutcome {
            value: Value::Null,
            errors: Vec::new(),
            vars_used: HashSet::new(),
        };
    }

    let mut parser = Parser::new(tokens, registry, resolver, parse_only, group_seq, question_seq);
    let value = parser.run();
    let mut state = parser.into_state();
    sort_by_offset(&mut state.errors);

    EvalOutcome {
        value,
        errors: state.errors,
        vars_used: state.vars_used,
    }
}

/// Convenience entry point for a boolean-only context (relevance
/// equations, condition expressions): evaluates `source` and applies the
/// host truthiness rule to the result. A failed parse is never relevant.
pub fn evaluate_boolean(
    source: &str,
    registry: &Registry,
    resolver: &mut dyn VariableResolver,
    group_seq: i64,
    question_seq: i64,
) -> bool {
    let outcome = evaluate(source, registry, resolver, false, group_seq, question_seq);
    outcome.is_ok() && brace_value::truthy(&outcome.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brace_value::Value;

    fn eval(source: &str, resolver: &mut dyn VariableResolver) -> EvalOutcome {
        let registry = Registry::with_defaults();
        evaluate(source, &registry, resolver, false, 0, 0)
    }

    #[test]
    fn arithmetic_precedence() {
        let mut resolver = MapResolver::new();
        let outcome = eval("1+2*3", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Num(7.0));
    }

    #[test]
    fn parenthesized_grouping_overrides_precedence() {
        let mut resolver = MapResolver::new();
        let outcome = eval("(1+2)*3", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Num(9.0));
    }

    #[test]
    fn if_function_selects_branch() {
        let mut resolver = MapResolver::new();
        let outcome = eval("if(1 lt 2,'y','n')", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Str("y".to_string()));
    }

    #[test]
    fn assignment_writes_through_resolver_and_records_variable() {
        let mut resolver = MapResolver::new().with("q1", Value::Num(0.0)).with("q1.readWrite", Value::Str("Y".to_string()));
        let outcome = eval("q1=5", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Num(5.0));
        assert_eq!(resolver.values.get("q1"), Some(&Value::Num(5.0)));
        assert!(outcome.vars_used.contains("q1"));
    }

    #[test]
    fn assignment_to_read_only_variable_is_a_type_error() {
        let mut resolver = MapResolver::new().with("q1", Value::Num(0.0)).with("q1.readWrite", Value::Str("N".to_string()));
        let outcome = eval("q1=5", &mut resolver);
        assert!(matches!(outcome.errors.as_slice(), [EvalError::Type { .. }]));
    }

    #[test]
    fn undefined_variable_is_a_syntax_error() {
        let mut resolver = MapResolver::new();
        let outcome = eval("missing_var + 1", &mut resolver);
        assert!(matches!(outcome.errors.as_slice(), [EvalError::Syntax { .. }]));
    }

    #[test]
    fn unknown_function_is_a_syntax_error() {
        let mut resolver = MapResolver::new();
        let outcome = eval("not_a_real_function(1)", &mut resolver);
        assert!(matches!(outcome.errors.as_slice(), [EvalError::Syntax { .. }]));
    }

    #[test]
    fn wrong_arity_is_an_arity_error() {
        let mut resolver = MapResolver::new();
        let outcome = eval("pi(1)", &mut resolver);
        assert!(matches!(outcome.errors.as_slice(), [EvalError::Arity { .. }]));
    }

    #[test]
    fn comma_sequence_keeps_last_value_but_records_every_error() {
        let mut resolver = MapResolver::new();
        let outcome = eval("missing_one, missing_two, 42", &mut resolver);
        assert_eq!(outcome.value, Value::Num(42.0));
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn comma_sequence_errors_are_sorted_by_offset() {
        let mut resolver = MapResolver::new();
        let outcome = eval("missing_b, missing_a", &mut resolver);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].offset() <= outcome.errors[1].offset());
    }

    #[test]
    fn inactive_variable_reads_as_null() {
        let mut resolver = MapResolver::new().with("q1", Value::Num(7.0)).with("q1.relevanceStatus", Value::Bool(false));
        let outcome = eval("q1", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Null);
    }

    #[test]
    fn parse_only_never_calls_into_the_resolver() {
        let registry = Registry::with_defaults();
        let mut resolver = MapResolver::new();
        let outcome = evaluate("missing_var + abs(-1)", &registry, &mut resolver, true, 0, 0);
        assert!(outcome.is_ok());
        assert!(outcome.vars_used.contains("missing_var"));
    }

    #[test]
    fn unbalanced_parenthesis_is_reported() {
        let mut resolver = MapResolver::new();
        let outcome = eval("(1+2", &mut resolver);
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn boolean_entry_point_applies_truthiness() {
        let registry = Registry::with_defaults();
        let mut resolver = MapResolver::new();
        assert!(evaluate_boolean("1 lt 2", &registry, &mut resolver, 0, 0));
        assert!(!evaluate_boolean("1 gt 2", &registry, &mut resolver, 0, 0));
    }
}
