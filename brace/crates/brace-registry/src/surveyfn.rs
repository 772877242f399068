//! Survey-specific aggregate and utility functions (spec §6).
//!
//! Unlike the binary operators in `brace-value`, these functions only ever
//! see plain argument [`Value`]s with no attached [`brace_value::Origin`]
//! (the parser evaluates each argument to a value before dispatch), so the
//! "numeric-ish-but-quoted" string override does not apply here: equality
//! and ordering below compare numerically whenever both sides are
//! numeric-ish, full stop.

use regex::Regex;

use brace_value::{is_numeric_ish, to_number, truthy, Value};

use crate::arity::Arity;
use crate::spec::FunctionSpec;

/// `is_empty(x)`: true iff x is null, the empty string, or false.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Str(s) => s.is_empty(),
        Value::Num(_) => false,
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    if is_numeric_ish(a) && is_numeric_ish(b) {
        to_number(a) == to_number(b)
    } else {
        a.payload() == b.payload()
    }
}

fn loosely_compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    if is_numeric_ish(a) && is_numeric_ish(b) {
        to_number(a).partial_cmp(&to_number(b))
    } else {
        Some(a.payload().cmp(&b.payload()))
    }
}

fn matches_op(op: &str, candidate: &Value, target: &Value) -> bool {
    match op {
        "==" | "eq" => loosely_equal(candidate, target),
        "!=" | "ne" => !loosely_equal(candidate, target),
        "<" | "lt" => loosely_compare(candidate, target) == Some(std::cmp::Ordering::Less),
        "<=" | "le" => matches!(
            loosely_compare(candidate, target),
            Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal)
        ),
        ">" | "gt" => loosely_compare(candidate, target) == Some(std::cmp::Ordering::Greater),
        ">=" | "ge" => matches!(
            loosely_compare(candidate, target),
            Some(std::cmp::Ordering::Greater) | Some(std::cmp::Ordering::Equal)
        ),
        "RX" => {
            let pattern = target.payload();
            Regex::new(&pattern).is_ok_and(|re| re.is_match(&candidate.payload()))
        }
        _ => false,
    }
}

pub fn table() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("count", None, Arity::AtLeast(0), |a| {
            Value::Num(a.iter().filter(|v| !is_empty_value(v)).count() as f64)
        }),
        FunctionSpec::new("countif", None, Arity::AtLeast(1), |a| {
            let target = &a[0];
            Value::Num(a[1..].iter().filter(|v| loosely_equal(v, target)).count() as f64)
        }),
        FunctionSpec::new("countifop", None, Arity::AtLeast(2), |a| {
            let op = a[0].payload();
            let target = &a[1];
            Value::Num(a[2..].iter().filter(|v| matches_op(&op, v, target)).count() as f64)
        }),
        FunctionSpec::new("sum", None, Arity::AtLeast(0), |a| Value::Num(a.iter().map(to_number).sum())),
        FunctionSpec::new("sumifop", None, Arity::AtLeast(2), |a| {
            let op = a[0].payload();
            let target = &a[1];
            Value::Num(a[2..].iter().filter(|v| matches_op(&op, v, target)).map(to_number).sum())
        }),
        FunctionSpec::new("if", None, Arity::Exact(&[3]), |a| {
            if truthy(&a[0]) {
                a[1].clone()
            } else {
                a[2].clone()
            }
        }),
        FunctionSpec::new("implode", None, Arity::AtLeast(1), |a| Value::Str(join_with(&a[0].payload(), &a[1..]))),
        FunctionSpec::new("join", None, Arity::AtLeast(1), |a| Value::Str(join_with(&a[0].payload(), &a[1..]))),
        FunctionSpec::new("list", None, Arity::AtLeast(0), |a| {
            let items: Vec<String> = a.iter().filter(|v| !is_empty_value(v)).map(Value::payload).collect();
            Value::Str(items.join(", "))
        }),
        FunctionSpec::new("stddev", None, Arity::AtLeast(2), |a| {
            let values: Vec<f64> = a.iter().map(to_number).collect();
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
            Value::Num(variance.sqrt())
        }),
        FunctionSpec::new("unique", None, Arity::AtLeast(0), |a| {
            let trimmed: Vec<String> = a
                .iter()
                .filter(|v| !is_empty_value(v))
                .map(|v| v.payload().trim().to_string())
                .collect();
            let mut seen = std::collections::HashSet::new();
            Value::Bool(trimmed.iter().all(|v| seen.insert(v.clone())))
        }),
        FunctionSpec::new("fixnum", None, Arity::Exact(&[1]), |a| {
            let n = to_number(&a[0]);
            let scaled = (n * 1e10).round() / 1e10;
            Value::Num(scaled)
        }),
        FunctionSpec::new("is_empty", None, Arity::Exact(&[1]), |a| Value::Bool(is_empty_value(&a[0]))),
        FunctionSpec::new("regexMatch", None, Arity::Exact(&[2]), |a| Value::Bool(regex_match(&a[0].payload(), &a[1].payload()))),
        FunctionSpec::new("convert_value", None, Arity::Exact(&[4]), |a| convert_value(a)),
    ]
}

fn join_with(glue: &str, items: &[Value]) -> String {
    items.iter().map(Value::payload).collect::<Vec<_>>().join(glue)
}

/// `regexMatch` takes a PHP-style delimited pattern (`/pattern/flags`); an
/// unparseable delimiter or an invalid pattern is silently "no match",
/// matching `countifop`'s `RX` operator.
fn regex_match(pattern: &str, subject: &str) -> bool {
    let Some(delim) = pattern.chars().next() else {
        return false;
    };
    let Some(close) = pattern.rfind(delim).filter(|&i| i > 0) else {
        return false;
    };
    let body = &pattern[delim.len_utf8()..close];
    let flags = &pattern[close + delim.len_utf8()..];
    let insensitive = flags.contains('i');
    let built = if insensitive { format!("(?i){body}") } else { body.to_string() };
    Regex::new(&built).is_ok_and(|re| re.is_match(subject))
}

/// Nearest-neighbor numeric mapping. Returns null on any non-numeric input
/// or mismatched list lengths.
fn convert_value(args: &[Value]) -> Value {
    let value = to_number(&args[0]);
    let strict = truthy(&args[1]);
    let from: Vec<f64> = args[2]
        .payload()
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .unwrap_or_default();
    let to: Vec<String> = args[3].payload().split(',').map(|s| s.trim().to_string()).collect();
    if from.is_empty() || from.len() != to.len() {
        return Value::Null;
    }
    if strict {
        return match from.iter().position(|&f| f == value) {
            Some(i) => parse_or_str(&to[i]),
            None => Value::Null,
        };
    }
    let nearest = from
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (**a - value).abs().partial_cmp(&(**b - value).abs()).unwrap());
    match nearest {
        Some((i, _)) => parse_or_str(&to[i]),
        None => Value::Null,
    }
}

fn parse_or_str(s: &str) -> Value {
    match s.parse::<f64>() {
        Ok(n) => Value::Num(n),
        Err(_) => Value::Str(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Value {
        let f = table().into_iter().find(|f| f.name == name).unwrap();
        (f.call)(args)
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn count_ignores_empty_arguments() {
        assert_eq!(call("count", &[s(""), s("a"), s("b"), s("")]), Value::Num(2.0));
    }

    #[test]
    fn unique_detects_duplicate_after_trim() {
        assert_eq!(call("unique", &[s("a"), s("b "), s(" a")]), Value::Bool(false));
    }

    #[test]
    fn countifop_greater_than() {
        let args = [s(">"), Value::Num(2.0), Value::Num(1.0), Value::Num(2.0), Value::Num(3.0), Value::Num(4.0)];
        assert_eq!(call("countifop", &args), Value::Num(2.0));
    }

    #[test]
    fn countifop_regex_counts_matches_case_sensitively() {
        let args = [s("RX"), s("^[a-z]+$"), s("aa"), s("1"), s("bb")];
        assert_eq!(call("countifop", &args), Value::Num(2.0));
    }

    #[test]
    fn if_function_branches_on_truthiness() {
        assert_eq!(call("if", &[Value::Num(1.0), s("yes"), s("no")]), s("yes"));
        assert_eq!(call("if", &[Value::Num(0.0), s("yes"), s("no")]), s("no"));
    }

    #[test]
    fn list_joins_non_empty_with_comma_space() {
        assert_eq!(call("list", &[s("a"), s(""), s("b")]), s("a, b"));
    }

    #[test]
    fn convert_value_nearest_neighbor() {
        let args = [Value::Num(7.0), Value::Bool(false), s("0,5,10"), s("low,mid,high")];
        assert_eq!(call("convert_value", &args), s("mid"));
    }

    #[test]
    fn convert_value_strict_requires_exact_match() {
        let args = [Value::Num(7.0), Value::Bool(true), s("0,5,10"), s("low,mid,high")];
        assert_eq!(call("convert_value", &args), Value::Null);
    }
}
