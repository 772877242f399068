//! Process command: runs a whole host string (text interleaved with
//! `{...}` expressions) through the splitter/evaluator pipeline and
//! prints the substituted result.

use brace_core::{Engine, MapQuestionResolver};

use crate::config::Config;
use crate::error::Result;
use crate::vars::build_resolver;

#[derive(Debug, Clone)]
pub struct ProcessArgs {
    pub source: String,
    pub vars: Vec<String>,
    pub recursion_levels: Option<u32>,
}

pub fn run_process(args: ProcessArgs, config: &Config) -> Result<()> {
    let engine = Engine::new();
    let questions = MapQuestionResolver::new();
    let mut resolver = build_resolver(&args.vars)?;
    let recursion_levels = args.recursion_levels.unwrap_or(config.recursion_levels);

    let rendered = engine.process_string(
        &args.source,
        &mut resolver,
        &questions,
        recursion_levels,
        config.group_seq,
        config.question_seq,
    );

    println!("{rendered}");
    Ok(())
}
