//! Bracet CLI - a command-line front end for the brace expression engine.
//!
//! Offers subcommands to tokenize, evaluate, render a template string,
//! and emit the client-side form of an expression, all backed by an
//! in-memory resolver built from `--var` flags rather than a live host
//! application.

mod commands;
mod config;
mod error;
mod vars;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    emit::{run_emit, EmitArgs},
    evaluate::{run_evaluate, EvaluateArgs},
    process::{run_process, ProcessArgs},
    tokenize::{run_tokenize, TokenizeArgs},
};
use config::Config;
use error::{BracetError, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bracet")]
#[command(author = "Brace Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tokenize, evaluate, and render brace expressions", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true, env = "BRACET_VERBOSE")]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "BRACET_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output.
    #[arg(long, global = true, env = "BRACET_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenize an expression and print its token stream.
    Tokenize(TokenizeCommand),

    /// Evaluate a single expression.
    Evaluate(EvaluateCommand),

    /// Render a host string, substituting its `{...}` expressions.
    Process(ProcessCommand),

    /// Render an expression in its client-side target surface.
    Emit(EmitCommand),
}

#[derive(Parser, Debug)]
struct TokenizeCommand {
    /// The expression to tokenize.
    expression: String,

    /// Keep whitespace tokens in the output.
    #[arg(long)]
    edit_mode: bool,
}

#[derive(Parser, Debug)]
struct EvaluateCommand {
    /// The expression to evaluate.
    expression: String,

    /// A variable assignment, repeatable: NAME=VALUE.
    #[arg(short = 'V', long = "var")]
    vars: Vec<String>,

    /// Validate syntax and collect referenced variables without reading
    /// or writing any of them.
    #[arg(long)]
    parse_only: bool,

    /// Group sequence number passed to the resolver.
    #[arg(long)]
    group_seq: Option<i64>,

    /// Question sequence number passed to the resolver.
    #[arg(long)]
    question_seq: Option<i64>,
}

#[derive(Parser, Debug)]
struct ProcessCommand {
    /// The host string to process.
    source: String,

    /// A variable assignment, repeatable: NAME=VALUE.
    #[arg(short = 'V', long = "var")]
    vars: Vec<String>,

    /// Override the configured recursion level count.
    #[arg(long)]
    recursion_levels: Option<u32>,
}

#[derive(Parser, Debug)]
struct EmitCommand {
    /// The expression to render.
    expression: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Tokenize(args) => run_tokenize(TokenizeArgs {
            expression: args.expression,
            edit_mode: args.edit_mode,
            verbose: cli.verbose,
        }),
        Commands::Evaluate(args) => run_evaluate(EvaluateArgs {
            expression: args.expression,
            vars: args.vars,
            parse_only: args.parse_only,
            group_seq: args.group_seq.unwrap_or(config.group_seq),
            question_seq: args.question_seq.unwrap_or(config.question_seq),
            verbose: cli.verbose,
        }),
        Commands::Process(args) => run_process(
            ProcessArgs {
                source: args.source,
                vars: args.vars,
                recursion_levels: args.recursion_levels,
            },
            &config,
        ),
        Commands::Emit(args) => run_emit(EmitArgs { expression: args.expression }),
    }
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| BracetError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}

fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}
