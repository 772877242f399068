//! Command modules for the bracet CLI.
//!
//! Each subcommand lives in its own file with an `Args` struct and a
//! `run_*` entry point, following the same shape across commands.

pub mod emit;
pub mod evaluate;
pub mod process;
pub mod tokenize;

pub use emit::{run_emit, EmitArgs};
pub use evaluate::{run_evaluate, EvaluateArgs};
pub use process::{run_process, ProcessArgs};
pub use tokenize::{run_tokenize, TokenizeArgs};
