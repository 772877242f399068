//! Tokenize command: prints the token stream for a single expression,
//! one token per line. A diagnostic entry point, not meant for scripting
//! against (use `evaluate`/`process` for that).

use brace_core::Engine;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct TokenizeArgs {
    pub expression: String,
    pub edit_mode: bool,
    pub verbose: bool,
}

pub fn run_tokenize(args: TokenizeArgs) -> Result<()> {
    let engine = Engine::new();
    let tokens = engine.tokenize(&args.expression, args.edit_mode);

    for token in &tokens {
        if args.verbose {
            println!("{:?} {:?} @{}", token.kind, token.lexeme, token.offset);
        } else {
            println!("{:?} {:?}", token.kind, token.lexeme);
        }
    }

    Ok(())
}
