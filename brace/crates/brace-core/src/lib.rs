//! brace-core - The host-facing facade: curly-brace splitting, `self`/
//! `that` expansion, the target-surface emitter, and the [`Engine`] type
//! that ties them to `brace-par`'s evaluator and `brace-registry`'s
//! function table.

mod emitter;
mod engine;
mod expand;
mod question;
mod splitter;

pub use emitter::to_target_expression;
pub use engine::Engine;
pub use expand::{expand, ExpansionCache};
pub use question::{Field, MapQuestionResolver, Question, QuestionResolver};
pub use splitter::{split, Segment, SegmentKind};

pub use brace_par::{split_variable, ErrorKind, EvalError, EvalOutcome, MapResolver, VariableResolver, ALLOWED_ATTRS};
pub use brace_registry::{FunctionSpec, Registry};
pub use brace_value::Value;

#[cfg(test)]
mod scenarios {
    //! Table-driven scenarios exercising the whole pipeline end to end,
    //! each grounded in a documented example of the host's expression
    //! behavior rather than an isolated unit.

    use super::*;

    struct Scenario {
        name: &'static str,
        expr: &'static str,
        expect: Value,
    }

    fn run(expr: &str, resolver: &mut dyn VariableResolver) -> EvalOutcome {
        let engine = Engine::new();
        let questions = MapQuestionResolver::new();
        engine.evaluate(expr, resolver, &questions, false, 0, 0)
    }

    #[test]
    fn arithmetic_and_string_scenarios() {
        let scenarios = [
            Scenario { name: "simple addition", expr: "1+2", expect: Value::Num(3.0) },
            Scenario { name: "precedence", expr: "2+3*4", expect: Value::Num(14.0) },
            Scenario { name: "parenthesized grouping", expr: "(2+3)*4", expect: Value::Num(20.0) },
            Scenario { name: "string concatenation via quoted origin", expr: "'a'+'b'", expect: Value::Str("ab".to_string()) },
            Scenario { name: "string origin forces concat even with a numeric literal", expr: "'1'+1", expect: Value::Str("11".to_string()) },
            Scenario { name: "word-form comparison", expr: "1 lt 2", expect: Value::Bool(true) },
            Scenario { name: "symbolic comparison", expr: "2 == 2", expect: Value::Bool(true) },
        ];

        for scenario in scenarios {
            let mut resolver = MapResolver::new();
            let outcome = run(scenario.expr, &mut resolver);
            assert!(outcome.is_ok(), "scenario '{}' failed to evaluate: {:?}", scenario.name, outcome.errors);
            assert_eq!(outcome.value, scenario.expect, "scenario '{}'", scenario.name);
        }
    }

    #[test]
    fn if_function_with_word_and_symbolic_operators() {
        let mut resolver = MapResolver::new();
        let outcome = run("if(1 lt 2, 'y', 'n')", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Str("y".to_string()));

        let mut resolver = MapResolver::new();
        let outcome = run("if(1 > 2, 'y', 'n')", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Str("n".to_string()));
    }

    #[test]
    fn assignment_success_and_type_error() {
        let mut resolver = MapResolver::new().with("q1", Value::Num(0.0)).with("q1.readWrite", Value::Str("Y".to_string()));
        let outcome = run("q1 = 9", &mut resolver);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Num(9.0));

        let mut resolver = MapResolver::new().with("q1", Value::Num(0.0)).with("q1.readWrite", Value::Str("N".to_string()));
        let outcome = run("q1 = 9", &mut resolver);
        assert!(!outcome.is_ok());
    }

    #[test]
    fn undefined_variable_reports_syntax_error_but_process_string_keeps_original_text() {
        let engine = Engine::new();
        let questions = MapQuestionResolver::new();
        let mut resolver = MapResolver::new();
        let rendered = engine.process_string("value: {missing_var}", &mut resolver, &questions, 1, 0, 0);
        assert_eq!(rendered, "value: {missing_var}");
    }

    #[test]
    fn splitter_preserves_quoted_closing_brace() {
        let segs = split("{'}'}");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind, SegmentKind::Expr);
        assert_eq!(segs[0].text, "'}'");
    }

    #[test]
    fn emitter_wraps_variable_reference_in_any_na_guard_and_maps_operators() {
        let registry = Registry::with_defaults();
        let rendered = to_target_expression("q1 eq 1 and q2 eq 2", &registry).unwrap();
        assert!(rendered.starts_with("IF(ANY_NA(["));
        assert!(rendered.contains("=="));
        assert!(rendered.contains("&&"));
    }

    #[test]
    fn self_expansion_resolves_to_concrete_field_list() {
        let question = Question {
            sgqa: "q1".to_string(),
            fields: vec![
                Field { name: "q1_1".to_string(), code: "q1_1".to_string() },
                Field { name: "q1_2".to_string(), code: "q1_2".to_string() },
            ],
        };
        let resolver = MapQuestionResolver::new().with_question("q1", question).with_current("q1");
        let cache = ExpansionCache::new();
        assert_eq!(expand("self.nocomments", &resolver, &cache), "q1_1,q1_2");
    }

    #[test]
    fn boolean_evaluate_treats_irrelevant_variable_as_false_unless_naok_suffixed() {
        let engine = Engine::new();
        let questions = MapQuestionResolver::new();

        let mut resolver = MapResolver::new().with("q1", Value::Num(1.0)).with("q1.relevanceStatus", Value::Bool(false));
        assert!(!engine.boolean_evaluate("q1", &mut resolver, &questions, 0, 0));

        let mut resolver = MapResolver::new()
            .with("q1", Value::Num(1.0))
            .with("q1.relevanceStatus", Value::Bool(false))
            .with("q1.NAOK", Value::Bool(true));
        assert!(engine.boolean_evaluate("q1.NAOK", &mut resolver, &questions, 0, 0));
    }
}
