//! Emit command: renders an expression in the client-side target
//! surface instead of evaluating it.

use brace_core::Engine;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct EmitArgs {
    pub expression: String,
}

pub fn run_emit(args: EmitArgs) -> Result<()> {
    let engine = Engine::new();
    match engine.to_target_expression(&args.expression) {
        Ok(rendered) => {
            println!("{rendered}");
            Ok(())
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
