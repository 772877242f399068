//! Regex-driven composite lexer.
//!
//! A single composite pattern scans the whole expression, one fragment at a
//! time; each fragment is whichever alternative in the pattern matched,
//! and the alternatives are ordered exactly as the classification order
//! requires (earlier branches win ties, e.g. `and`/`or` word-aliases must
//! be claimed by `AndOr` before the generic `Word` branch ever sees them).
//! This mirrors the teacher's regex-based lexing technique but, unlike a
//! hand-coded character dispatch, the priority order lives in one place:
//! the order the named groups are written in below.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use brace_util::SourceOffset;

use crate::token::{Token, TokenKind};

// Classification order (see module docs): earlier alternatives win.
// 1. DQ_STRING  2. SQ_STRING  3. SPACE  4. ( ) ,  5. AND_OR  6. COMPARE
// 7. SGQA  8. WORD  9. NUMBER  10. NOT  11. ++ / --  12. ASSIGN
// 13. BINARYOP  14. OTHER (fallback, always matches exactly one char)
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<DQSTR>"(?:[^"\\]|\\.)*")"#,
        r"|(?P<SQSTR>'(?:[^'\\]|\\.)*')",
        r"|(?P<SPACE>[ \t\r\n]+)",
        r"|(?P<LP>\()",
        r"|(?P<RP>\))",
        r"|(?P<COMMA>,)",
        r"|(?P<ANDOR>&&|\|\||\b(?:and|or)\b)",
        r"|(?P<COMPARE><=|>=|==|!=|<|>|\b(?:le|lt|ge|gt|eq|ne)\b)",
        r"|(?P<SGQA>\d+X\d+X\d+[A-Z0-9_]*#?[01]?)",
        r"|(?P<WORD>(?:[A-Za-z_][A-Za-z0-9_]*:)?[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)",
        r"|(?P<NUMBER>\d+(?:\.\d*)?|\.\d+)",
        r"|(?P<NOT>!)",
        r"|(?P<INCRDECR>\+\+|--)",
        r"|(?P<ASSIGN>=)",
        r"|(?P<BINOP>[+*/-])",
        r"|(?P<OTHER>(?s).)",
    ))
    .expect("token pattern is a valid regex")
});

/// Tokenize `source` into a vector of [`Token`]s.
///
/// Offsets are 0-based *character* indices (not byte indices), matching
/// the data model's invariant that `token.offset` monotonically increases
/// across the returned vector.
///
/// `edit_mode` keeps `Space` tokens in the output (used by the diagnostic
/// `tokenize` entry point); normal evaluation drops them.
pub fn tokenize(source: &str, edit_mode: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut char_offset = 0usize;

    for caps in TOKEN_PATTERN.captures_iter(source) {
        let (kind, matched) = classify(&caps);
        let char_len = matched.chars().count();
        let offset = SourceOffset::new(char_offset);

        if kind != TokenKind::Space || edit_mode {
            let lexeme = match kind {
                TokenKind::DqString => unquote(matched, '"'),
                TokenKind::SqString => unquote(matched, '\''),
                _ => matched.to_string(),
            };
            trace!(?kind, %lexeme, offset = char_offset, "lexed token");
            tokens.push(Token::new(kind, lexeme, offset));
        }

        char_offset += char_len;
    }

    tokens
}

fn classify<'t>(caps: &regex::Captures<'t>) -> (TokenKind, &'t str) {
    const GROUPS: &[(&str, TokenKind)] = &[
        ("DQSTR", TokenKind::DqString),
        ("SQSTR", TokenKind::SqString),
        ("SPACE", TokenKind::Space),
        ("LP", TokenKind::LParen),
        ("RP", TokenKind::RParen),
        ("COMMA", TokenKind::Comma),
        ("ANDOR", TokenKind::AndOr),
        ("COMPARE", TokenKind::Compare),
        ("SGQA", TokenKind::Sgqa),
        ("WORD", TokenKind::Word),
        ("NUMBER", TokenKind::Number),
        ("NOT", TokenKind::Not),
        // `++`/`--` are recognized but not operationally used; they are
        // folded into Other so the parser reports them as a syntax error
        // rather than silently accepting them.
        ("INCRDECR", TokenKind::Other),
        ("ASSIGN", TokenKind::Assign),
        ("BINOP", TokenKind::BinaryOp),
        ("OTHER", TokenKind::Other),
    ];
    for (name, kind) in GROUPS {
        if let Some(m) = caps.name(name) {
            return (*kind, m.as_str());
        }
    }
    unreachable!("composite token pattern always matches exactly one named group")
}

/// Strip the surrounding quote characters and translate `\"`, `\'`, `\\`
/// into their literal forms. Any other backslash escape is left verbatim
/// (backslash and following character both kept), matching the narrow
/// unquoting rule in the lexer's spec.
fn unquote(quoted: &str, quote: char) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('"') if quote == '"' => {
                    out.push('"');
                    chars.next();
                }
                Some('\'') if quote == '\'' => {
                    out.push('\'');
                    chars.next();
                }
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, false).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn numbers_and_operators() {
        assert_eq!(
            kinds("1+2"),
            vec![TokenKind::Number, TokenKind::BinaryOp, TokenKind::Number]
        );
    }

    #[test]
    fn word_form_aliases_win_over_word() {
        assert_eq!(
            kinds("1 lt 2"),
            vec![TokenKind::Number, TokenKind::Compare, TokenKind::Number]
        );
        assert_eq!(
            kinds("1 and 2"),
            vec![TokenKind::Number, TokenKind::AndOr, TokenKind::Number]
        );
    }

    #[test]
    fn sgqa_wins_over_word_and_number() {
        let toks = tokenize("12X3X4Q00", false);
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Sgqa);
    }

    #[test]
    fn strings_are_unquoted() {
        let toks = tokenize(r#""a\"b""#, false);
        assert_eq!(toks[0].kind, TokenKind::DqString);
        assert_eq!(toks[0].lexeme, "a\"b");

        let toks = tokenize(r"'a\'b'", false);
        assert_eq!(toks[0].kind, TokenKind::SqString);
        assert_eq!(toks[0].lexeme, "a'b");
    }

    #[test]
    fn space_dropped_unless_edit_mode() {
        assert_eq!(kinds("1 + 2"), kinds("1+2"));
        let edit = tokenize("1 + 2", true);
        assert!(edit.iter().any(|t| t.kind == TokenKind::Space));
    }

    #[test]
    fn offsets_are_character_based_and_increasing() {
        let toks = tokenize("1+\u{00e9}2", false); // 'é' is 1 char, 2 bytes
        let offsets: Vec<_> = toks.iter().map(|t| t.offset.get()).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
    }

    #[test]
    fn unrecognized_lexeme_is_other() {
        assert_eq!(kinds("1 # 2")[1], TokenKind::Other);
    }

    #[test]
    fn comparison_two_char_forms_win_over_assign_and_not() {
        assert_eq!(kinds("1==2"), vec![TokenKind::Number, TokenKind::Compare, TokenKind::Number]);
        assert_eq!(kinds("1!=2"), vec![TokenKind::Number, TokenKind::Compare, TokenKind::Number]);
    }

    proptest::proptest! {
        #[test]
        fn offsets_monotonically_increase(s in "[a-zA-Z0-9 (),+*/=!<>'\"._-]{0,64}") {
            let toks = tokenize(&s, true);
            for pair in toks.windows(2) {
                proptest::prop_assert!(pair[0].offset <= pair[1].offset);
            }
        }
    }
}
