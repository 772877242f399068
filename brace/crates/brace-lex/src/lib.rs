//! brace-lex - Tokenizes expressions into a flat, total token stream.
//!
//! Mirrors the role `faxc-lex` plays for the Fax compiler, but the lexer
//! here is total rather than fallible: every byte of input produces some
//! token, with `TokenKind::Other` standing in for lexemes nothing else
//! claims. Syntax errors are a parser concern, not a lexer one.

mod lexer;
mod token;

pub use lexer::tokenize;
pub use token::{Token, TokenKind};
