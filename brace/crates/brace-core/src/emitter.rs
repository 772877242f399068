//! Target-surface expression emitter (§4.7): re-tokenizes an expression
//! and renders the equivalent expression string in the client-side
//! surface the host embeds (e.g. a browser-side evaluator).

use brace_lex::{Token, TokenKind};
use brace_par::EvalError;
use brace_registry::Registry;
use brace_util::Symbol;

/// Renders `expr` in the target surface. Returns the empty string if the
/// expression calls a function whose client-surface name is unsupported
/// (`None` in the registry), per §4.7.
pub fn to_target_expression(expr: &str, registry: &Registry) -> Result<String, EvalError> {
    let tokens = brace_lex::tokenize(expr, false);
    let mut out = String::new();
    let mut vars: Vec<String> = Vec::new();
    let mut i = 0usize;

    while i < tokens.len() {
        let tok = &tokens[i];

        match tok.kind {
            TokenKind::Number | TokenKind::LParen | TokenKind::RParen | TokenKind::Comma | TokenKind::Not | TokenKind::Assign | TokenKind::BinaryOp => {
                out.push_str(&tok.lexeme);
            }
            TokenKind::AndOr | TokenKind::Compare => {
                out.push_str(map_operator(&tok.lexeme));
            }
            TokenKind::DqString | TokenKind::SqString => {
                emit_literal(&tok.lexeme, &mut out);
            }
            TokenKind::Word | TokenKind::Sgqa => {
                if matches!(tokens.get(i + 1).map(|t| t.kind), Some(TokenKind::LParen)) {
                    match emit_function_name(tok, registry)? {
                        Some(name) => out.push_str(name),
                        None => return Ok(String::new()),
                    }
                } else if matches!(tokens.get(i + 1).map(|t| t.kind), Some(TokenKind::Assign)) {
                    return Err(EvalError::syntax(
                        format!("'{}' has no supported assignment form in the target surface", tok.lexeme),
                        tok.offset,
                    ));
                } else {
                    vars.push(tok.lexeme.clone());
                    out.push_str("READ(");
                    out.push_str(&tok.lexeme);
                    out.push(')');
                }
            }
            TokenKind::Other => {
                return Err(EvalError::syntax(format!("unrecognized token '{}'", tok.lexeme), tok.offset));
            }
            TokenKind::Space => {}
        }

        out.push(' ');
        i += 1;
    }

    let body = out.trim();

    if vars.is_empty() {
        return Ok(format!("({body})"));
    }

    let list = vars.iter().map(|v| format!("'{v}'")).collect::<Vec<_>>().join(", ");
    Ok(format!("IF(ANY_NA([{list}]), null, {body})"))
}

fn emit_literal(lexeme: &str, out: &mut String) {
    if !lexeme.is_empty() && lexeme.parse::<f64>().is_ok() {
        out.push_str(lexeme);
    } else {
        out.push('"');
        out.push_str(&lexeme.replace('"', "\\\""));
        out.push('"');
    }
}

/// `Ok(Some(name))` is the client-surface name to emit; `Ok(None)` means
/// the function has no client-surface equivalent, which the caller turns
/// into an empty overall emission per §4.7.
fn emit_function_name<'r>(tok: &Token, registry: &'r Registry) -> Result<Option<&'r str>, EvalError> {
    let symbol = Symbol::intern(&tok.lexeme);
    match registry.get(symbol) {
        Some(spec) => Ok(spec.client_name),
        None => Err(EvalError::syntax(format!("undefined function '{}'", tok.lexeme), tok.offset)),
    }
}

fn map_operator(lexeme: &str) -> &str {
    match lexeme {
        "and" => "&&",
        "or" => "||",
        "lt" => "<",
        "le" => "<=",
        "gt" => ">",
        "ge" => ">=",
        "eq" => "==",
        "ne" => "!=",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_form_operators_convert_to_symbolic_form() {
        let registry = Registry::with_defaults();
        let result = to_target_expression("q1 lt q2 and q3 eq q4", &registry).unwrap();
        assert!(result.contains("<"));
        assert!(result.contains("&&"));
        assert!(result.contains("=="));
    }

    #[test]
    fn referencing_a_variable_wraps_in_any_na_guard() {
        let registry = Registry::with_defaults();
        let result = to_target_expression("q1+1", &registry).unwrap();
        assert!(result.starts_with("IF(ANY_NA(["));
        assert!(result.contains("READ(q1)"));
    }

    #[test]
    fn no_variables_wraps_in_plain_parens() {
        let registry = Registry::with_defaults();
        let result = to_target_expression("1+2", &registry).unwrap();
        assert_eq!(result, "(1 + 2)");
    }

    #[test]
    fn unknown_function_is_an_error() {
        let registry = Registry::with_defaults();
        assert!(to_target_expression("not_a_real_function(1)", &registry).is_err());
    }

    #[test]
    fn non_numeric_quoted_literal_stays_quoted() {
        let registry = Registry::with_defaults();
        let result = to_target_expression("'hello'", &registry).unwrap();
        assert!(result.contains("\"hello\""));
    }

    #[test]
    fn numeric_quoted_literal_is_emitted_unquoted() {
        let registry = Registry::with_defaults();
        let result = to_target_expression("'42'", &registry).unwrap();
        assert_eq!(result, "(42)");
    }

    #[test]
    fn assignment_target_is_an_error() {
        let registry = Registry::with_defaults();
        assert!(to_target_expression("q1=1", &registry).is_err());
    }
}
