//! Evaluate command: evaluates a single expression against an in-memory
//! resolver built from `--var` arguments and prints the result.

use brace_core::{Engine, MapQuestionResolver};

use crate::error::Result;
use crate::vars::build_resolver;

#[derive(Debug, Clone)]
pub struct EvaluateArgs {
    pub expression: String,
    pub vars: Vec<String>,
    pub parse_only: bool,
    pub group_seq: i64,
    pub question_seq: i64,
    pub verbose: bool,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let engine = Engine::new();
    let questions = MapQuestionResolver::new();
    let mut resolver = build_resolver(&args.vars)?;

    let outcome = engine.evaluate(
        &args.expression,
        &mut resolver,
        &questions,
        args.parse_only,
        args.group_seq,
        args.question_seq,
    );

    println!("{}", outcome.value.payload());

    if args.verbose {
        for err in &outcome.errors {
            eprintln!("error: {err}");
        }
        if !outcome.vars_used.is_empty() {
            let mut used: Vec<&String> = outcome.vars_used.iter().collect();
            used.sort();
            eprintln!("vars used: {}", used.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "));
        }
    }

    Ok(())
}
