//! Builds an in-memory [`brace_par::MapResolver`] from repeated
//! `--var NAME=VALUE` command-line arguments, for manual testing and
//! demos without a host application behind it.

use brace_par::MapResolver;
use brace_value::Value;

use crate::error::{BracetError, Result};

/// Parses `NAME=VALUE` into a variable. `VALUE` is parsed as a number
/// when it looks like one, `true`/`false` as a bool, otherwise kept as a
/// string; prefix it with `'` to force the string interpretation (e.g.
/// `q1='3` stores the literal string `"3"` rather than the number `3`).
pub fn parse_var(raw: &str) -> Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| BracetError::InvalidVar(raw.to_string()))?;
    if name.is_empty() {
        return Err(BracetError::InvalidVar(raw.to_string()));
    }

    let value = if let Some(forced) = value.strip_prefix('\'') {
        Value::Str(forced.to_string())
    } else if let Ok(n) = value.parse::<f64>() {
        Value::Num(n)
    } else if value == "true" {
        Value::Bool(true)
    } else if value == "false" {
        Value::Bool(false)
    } else {
        Value::Str(value.to_string())
    };

    Ok((name.to_string(), value))
}

/// Builds a resolver from a list of `--var` arguments, reporting the
/// first malformed one.
pub fn build_resolver(vars: &[String]) -> Result<MapResolver> {
    let mut resolver = MapResolver::new();
    for raw in vars {
        let (name, value) = parse_var(raw)?;
        resolver = resolver.with(name, value);
    }
    Ok(resolver)
}
