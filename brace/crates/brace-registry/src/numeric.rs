//! Numeric functions and integer-test predicates.

use brace_value::{is_numeric_ish, to_number, Value};

use crate::arity::Arity;
use crate::spec::FunctionSpec;

fn num(args: &[Value], i: usize) -> f64 {
    to_number(&args[i])
}

pub fn table() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("abs", Some("Math.abs"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).abs())),
        FunctionSpec::new("acos", Some("Math.acos"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).acos())),
        FunctionSpec::new("asin", Some("Math.asin"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).asin())),
        FunctionSpec::new("atan", Some("Math.atan"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).atan())),
        FunctionSpec::new("atan2", Some("Math.atan2"), Arity::Exact(&[2]), |a| {
            Value::Num(num(a, 0).atan2(num(a, 1)))
        }),
        FunctionSpec::new("ceil", Some("Math.ceil"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).ceil())),
        FunctionSpec::new("cos", Some("Math.cos"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).cos())),
        FunctionSpec::new("exp", Some("Math.exp"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).exp())),
        FunctionSpec::new("floor", Some("Math.floor"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).floor())),
        FunctionSpec::new("log", None, Arity::Exact(&[1, 2]), |a| {
            let n = num(a, 0);
            if n <= 0.0 || !is_numeric_ish(&a[0]) {
                return Value::Num(f64::NAN);
            }
            let base = if a.len() == 2 { num(a, 1) } else { std::f64::consts::E };
            Value::Num(n.log(base))
        }),
        FunctionSpec::new("max", Some("Math.max"), Arity::AtLeast(1), |a| {
            Value::Num(a.iter().map(to_number).fold(f64::NEG_INFINITY, f64::max))
        }),
        FunctionSpec::new("min", Some("Math.min"), Arity::AtLeast(1), |a| {
            Value::Num(a.iter().map(to_number).fold(f64::INFINITY, f64::min))
        }),
        FunctionSpec::new("pi", Some("Math.PI"), Arity::Exact(&[0]), |_| Value::Num(std::f64::consts::PI)),
        FunctionSpec::new("pow", Some("Math.pow"), Arity::Exact(&[2]), |a| Value::Num(num(a, 0).powf(num(a, 1)))),
        FunctionSpec::new("round", Some("Math.round"), Arity::Exact(&[1, 2]), |a| {
            let n = num(a, 0);
            if a.len() == 2 {
                let factor = 10f64.powf(num(a, 1));
                Value::Num((n * factor).round() / factor)
            } else {
                Value::Num(n.round())
            }
        }),
        FunctionSpec::new("sin", Some("Math.sin"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).sin())),
        FunctionSpec::new("sqrt", Some("Math.sqrt"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).sqrt())),
        FunctionSpec::new("tan", Some("Math.tan"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).tan())),
        FunctionSpec::new("rand", None, Arity::Exact(&[0, 2]), |a| {
            use rand::Rng;
            let mut rng = rand::thread_rng();
            if a.len() == 2 {
                let lo = num(a, 0) as i64;
                let hi = num(a, 1) as i64;
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                Value::Num(rng.gen_range(lo..=hi) as f64)
            } else {
                Value::Num(rng.gen::<f64>())
            }
        }),
        FunctionSpec::new("intval", Some("parseInt"), Arity::Exact(&[1]), |a| Value::Num(num(a, 0).trunc())),
        FunctionSpec::new("is_int", None, Arity::Exact(&[1]), |a| {
            Value::Bool(is_numeric_ish(&a[0]) && num(a, 0).fract() == 0.0)
        }),
        FunctionSpec::new("is_float", None, Arity::Exact(&[1]), |a| {
            Value::Bool(is_numeric_ish(&a[0]) && num(a, 0).fract() != 0.0)
        }),
        FunctionSpec::new("is_nan", None, Arity::Exact(&[1]), |a| Value::Bool(num(a, 0).is_nan())),
        FunctionSpec::new("is_numeric", None, Arity::Exact(&[1]), |a| Value::Bool(is_numeric_ish(&a[0]))),
        FunctionSpec::new("is_null", None, Arity::Exact(&[1]), |a| Value::Bool(a[0].is_null())),
        FunctionSpec::new("is_string", None, Arity::Exact(&[1]), |a| Value::Bool(!is_numeric_ish(&a[0]))),
    ]
}
