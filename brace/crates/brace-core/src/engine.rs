//! The public facade tying the lexer, value model, function registry,
//! parser/evaluator, splitter, and `self`/`that` expansion together into
//! the one type a host embeds (§6).

use brace_lex::Token;
use brace_par::{EvalError, EvalOutcome, VariableResolver};
use brace_registry::{FunctionSpec, Registry};
use brace_value::Value;
use tracing::debug;

use crate::emitter;
use crate::expand::{self, ExpansionCache};
use crate::question::QuestionResolver;
use crate::splitter::{self, SegmentKind};

/// The engine instance a host creates once and reuses across evaluations.
/// Not safe to share across threads while evaluating concurrently (§5);
/// create one per thread if that's needed.
pub struct Engine {
    registry: Registry,
    expansion_cache: ExpansionCache,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            registry: Registry::with_defaults(),
            expansion_cache: ExpansionCache::new(),
        }
    }

    /// Merges `functions` into the function registry, overriding any
    /// default entries with the same name.
    pub fn register_functions(&mut self, functions: impl IntoIterator<Item = FunctionSpec>) {
        self.registry.register(functions);
    }

    /// Diagnostic/edit tokenization entry point; `edit_mode` retains
    /// `Space` tokens.
    pub fn tokenize(&self, src: &str, edit_mode: bool) -> Vec<Token> {
        brace_lex::tokenize(src, edit_mode)
    }

    /// Expands `self`/`that` references, then parses and evaluates `expr`
    /// as a single expression (already stripped of its surrounding braces).
    pub fn evaluate(
        &self,
        expr: &str,
        resolver: &mut dyn VariableResolver,
        questions: &dyn QuestionResolver,
        parse_only: bool,
        group_seq: i64,
        question_seq: i64,
    ) -> EvalOutcome {
        let expanded = expand::expand(expr, questions, &self.expansion_cache);
        debug!(%expr, %expanded, "evaluating expression");
        brace_par::evaluate(&expanded, &self.registry, resolver, parse_only, group_seq, question_seq)
    }

    /// Splits `source` into text/expression segments, evaluates each
    /// expression segment and substitutes its result, then re-runs the
    /// whole pass up to `recursion_levels` times (an expression's result
    /// may itself contain `{...}` markup). Finally unescapes `\{`/`\}`.
    ///
    /// A segment that fails to evaluate is substituted back verbatim,
    /// braces included, rather than aborting the whole string (§7).
    pub fn process_string(
        &self,
        source: &str,
        resolver: &mut dyn VariableResolver,
        questions: &dyn QuestionResolver,
        recursion_levels: u32,
        group_seq: i64,
        question_seq: i64,
    ) -> String {
        let mut current = source.to_string();
        let levels = recursion_levels.max(1);

        for _ in 0..levels {
            let segments = splitter::split(&current);
            let mut changed = false;
            let mut out = String::new();

            for segment in segments {
                match segment.kind {
                    SegmentKind::Str => out.push_str(&segment.text),
                    SegmentKind::Expr => {
                        let outcome = self.evaluate(&segment.text, resolver, questions, false, group_seq, question_seq);
                        if outcome.is_ok() {
                            out.push_str(&outcome.value.payload());
                            changed = true;
                        } else {
                            out.push('{');
                            out.push_str(&segment.text);
                            out.push('}');
                        }
                    }
                }
            }

            current = out;
            if !changed {
                break;
            }
        }

        unescape_braces(&current)
    }

    /// `true` unless evaluation errored, the result is null, or any
    /// referenced variable (other than a `.NAOK`/`.relevanceStatus`
    /// attribute read) is currently irrelevant.
    pub fn boolean_evaluate(
        &self,
        expr: &str,
        resolver: &mut dyn VariableResolver,
        questions: &dyn QuestionResolver,
        group_seq: i64,
        question_seq: i64,
    ) -> bool {
        let outcome = self.evaluate(expr, resolver, questions, false, group_seq, question_seq);
        if !outcome.is_ok() || outcome.value.is_null() {
            return false;
        }

        for reference in &outcome.vars_used {
            if reference.ends_with(".NAOK") || reference.ends_with(".relevanceStatus") {
                continue;
            }
            let (root, _attr) = brace_par::split_variable(reference);
            let relevant = resolver
                .read(root, Some("relevanceStatus"), Some(&Value::Bool(true)), group_seq, question_seq)
                .map(|v| brace_value::truthy(&v))
                .unwrap_or(true);
            if !relevant {
                return false;
            }
        }

        brace_value::truthy(&outcome.value)
    }

    /// Renders `expr` in the client-side target surface (§4.7).
    pub fn to_target_expression(&self, expr: &str) -> Result<String, EvalError> {
        emitter::to_target_expression(expr, &self.registry)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates the two escape sequences the splitter preserves verbatim
/// back into literal braces; applied once, after all recursion levels.
fn unescape_braces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('{') => {
                    out.push('{');
                    chars.next();
                }
                Some('}') => {
                    out.push('}');
                    chars.next();
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brace_par::MapResolver;
    use crate::question::MapQuestionResolver;

    fn questions() -> MapQuestionResolver {
        MapQuestionResolver::new()
    }

    #[test]
    fn string_with_no_braces_is_unchanged() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new();
        let qr = questions();
        assert_eq!(engine.process_string("plain text", &mut resolver, &qr, 1, 0, 0), "plain text");
    }

    #[test]
    fn simple_arithmetic_expression_is_substituted() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new();
        let qr = questions();
        assert_eq!(engine.process_string("sum is {1+2}", &mut resolver, &qr, 1, 0, 0), "sum is 3");
    }

    #[test]
    fn space_after_open_brace_is_literal() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new();
        let qr = questions();
        assert_eq!(engine.process_string("{ 1+2 }", &mut resolver, &qr, 1, 0, 0), "{ 1+2 }");
    }

    #[test]
    fn escaped_braces_round_trip_as_literal_braces() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new();
        let qr = questions();
        assert_eq!(engine.process_string(r"\{kept\}", &mut resolver, &qr, 1, 0, 0), "{kept}");
    }

    #[test]
    fn failed_segment_substitutes_original_text_back() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new();
        let qr = questions();
        assert_eq!(
            engine.process_string("{undefined_var}", &mut resolver, &qr, 1, 0, 0),
            "{undefined_var}"
        );
    }

    #[test]
    fn boolean_evaluate_false_on_error() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new();
        let qr = questions();
        assert!(!engine.boolean_evaluate("undefined_var", &mut resolver, &qr, 0, 0));
    }

    #[test]
    fn boolean_evaluate_false_when_referenced_variable_is_irrelevant() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new()
            .with("q1", Value::Num(1.0))
            .with("q1.relevanceStatus", Value::Bool(false));
        let qr = questions();
        assert!(!engine.boolean_evaluate("q1", &mut resolver, &qr, 0, 0));
    }

    #[test]
    fn boolean_evaluate_true_for_true_relation() {
        let engine = Engine::new();
        let mut resolver = MapResolver::new();
        let qr = questions();
        assert!(engine.boolean_evaluate("1 lt 2", &mut resolver, &qr, 0, 0));
    }
}
