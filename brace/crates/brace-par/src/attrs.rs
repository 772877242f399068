//! Variable-reference attribute suffixes (§3).

pub const ALLOWED_ATTRS: &[&str] = &[
    "code",
    "gid",
    "grelevance",
    "gseq",
    "jsName",
    "mandatory",
    "NAOK",
    "qid",
    "qseq",
    "question",
    "readWrite",
    "relevanceStatus",
    "relevance",
    "rowdivid",
    "sgqa",
    "shown",
    "type",
    "valueNAOK",
    "value",
];

/// The only recognized prefix on a variable reference (§3). Any other
/// `TOKEN:` the lexer's WORD pattern accepts is left attached to the root
/// — it's part of the name, not a qualifier this layer understands.
const INSERTANS_PREFIX: &str = "INSERTANS:";

/// Splits a lexed variable lexeme into its root name and, if the trailing
/// dotted segment is a recognized attribute, that attribute. A leading
/// `INSERTANS:` qualifier is stripped before the root is returned. A
/// trailing segment outside the allowed attribute set is just part of the
/// variable's name (e.g. a dotted SGQA subquestion code).
pub fn split_variable(lexeme: &str) -> (&str, Option<&str>) {
    let lexeme = lexeme.strip_prefix(INSERTANS_PREFIX).unwrap_or(lexeme);
    if let Some(idx) = lexeme.rfind('.') {
        let attr = &lexeme[idx + 1..];
        if ALLOWED_ATTRS.contains(&attr) {
            return (&lexeme[..idx], Some(attr));
        }
    }
    (lexeme, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_recognized_attribute() {
        assert_eq!(split_variable("q1_1.NAOK"), ("q1_1", Some("NAOK")));
    }

    #[test]
    fn leaves_unrecognized_suffix_attached() {
        assert_eq!(split_variable("self.comments"), ("self.comments", None));
    }

    #[test]
    fn no_dot_returns_whole_lexeme() {
        assert_eq!(split_variable("q1_1"), ("q1_1", None));
    }

    #[test]
    fn strips_insertans_prefix_from_root() {
        assert_eq!(split_variable("INSERTANS:q1"), ("q1", None));
    }

    #[test]
    fn strips_insertans_prefix_before_splitting_attribute() {
        assert_eq!(split_variable("INSERTANS:q1_1.NAOK"), ("q1_1", Some("NAOK")));
    }
}
