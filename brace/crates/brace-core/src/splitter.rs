//! Curly-brace host-string splitter (§4.2). A small state machine driven
//! character by character: brace depth, quote-awareness once inside an
//! expression, and the whitespace-adjacency rule that demotes a brace to
//! literal text.

use brace_util::SourceOffset;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Str,
    Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
    pub offset: SourceOffset,
}

/// Splits `source` into alternating STRING/EXPRESSION segments.
pub fn split(source: &str) -> Vec<Segment> {
    let chars: Vec<char> = source.chars().collect();
    let n = chars.len();

    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut buf_start = 0usize;
    let mut depth: u32 = 0;
    let mut quote: Option<char> = None;
    let mut expr_start = 0usize;
    let mut i = 0usize;

    while i < n {
        let c = chars[i];

        if c == '\\' && i + 1 < n {
            buf.push(c);
            buf.push(chars[i + 1]);
            i += 2;
            continue;
        }

        if depth > 0 {
            if let Some(q) = quote {
                buf.push(c);
                if c == q {
                    quote = None;
                }
                i += 1;
                continue;
            }
            if c == '"' || c == '\'' {
                quote = Some(c);
                buf.push(c);
                i += 1;
                continue;
            }
            if c == '{' {
                depth += 1;
                buf.push(c);
                i += 1;
                continue;
            }
            if c == '}' {
                let preceded_by_space = buf.chars().last().map(char::is_whitespace).unwrap_or(false);
                if preceded_by_space {
                    buf.push(c);
                    i += 1;
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    segments.push(Segment {
                        kind: SegmentKind::Expr,
                        text: std::mem::take(&mut buf),
                        offset: SourceOffset::new(expr_start),
                    });
                    buf_start = i + 1;
                } else {
                    buf.push(c);
                }
                i += 1;
                continue;
            }
            buf.push(c);
            i += 1;
            continue;
        }

        if c == '{' {
            let next_is_space = chars.get(i + 1).map(|c| c.is_whitespace()).unwrap_or(false);
            if next_is_space {
                buf.push(c);
                i += 1;
                continue;
            }
            if !buf.is_empty() {
                segments.push(Segment {
                    kind: SegmentKind::Str,
                    text: std::mem::take(&mut buf),
                    offset: SourceOffset::new(buf_start),
                });
            }
            depth = 1;
            expr_start = i + 1;
            i += 1;
            continue;
        }

        buf.push(c);
        i += 1;
    }

    if depth > 0 {
        // Unterminated expression: flush it back as literal text, braces
        // included, rather than dropping it or erroring.
        let mut text = String::with_capacity(buf.len() + 1);
        text.push('{');
        text.push_str(&buf);
        segments.push(Segment {
            kind: SegmentKind::Str,
            text,
            offset: SourceOffset::new(expr_start.saturating_sub(1)),
        });
    } else if !buf.is_empty() {
        segments.push(Segment {
            kind: SegmentKind::Str,
            text: buf,
            offset: SourceOffset::new(buf_start),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<(SegmentKind, String)> {
        split(source).into_iter().map(|s| (s.kind, s.text)).collect()
    }

    #[test]
    fn plain_text_is_one_string_segment() {
        assert_eq!(texts("hello world"), vec![(SegmentKind::Str, "hello world".to_string())]);
    }

    #[test]
    fn single_expression_is_isolated() {
        assert_eq!(
            texts("a{1+2}b"),
            vec![
                (SegmentKind::Str, "a".to_string()),
                (SegmentKind::Expr, "1+2".to_string()),
                (SegmentKind::Str, "b".to_string()),
            ]
        );
    }

    #[test]
    fn brace_followed_by_space_is_literal() {
        assert_eq!(texts("{ 1+2 }"), vec![(SegmentKind::Str, "{ 1+2 }".to_string())]);
    }

    #[test]
    fn closing_brace_preceded_by_space_stays_literal() {
        // No bare, unspaced `}` ever appears, so the whole thing falls back
        // to literal text at end of input.
        assert_eq!(texts("{1+2 }"), vec![(SegmentKind::Str, "{1+2 }".to_string())]);
    }

    #[test]
    fn quoted_closing_brace_does_not_end_the_expression() {
        assert_eq!(
            texts("{'}'}"),
            vec![(SegmentKind::Expr, "'}'".to_string())]
        );
    }

    #[test]
    fn escaped_braces_are_kept_verbatim() {
        assert_eq!(texts(r"\{literal\}"), vec![(SegmentKind::Str, r"\{literal\}".to_string())]);
    }

    #[test]
    fn unterminated_expression_is_flushed_as_literal() {
        assert_eq!(texts("a{1+2"), vec![(SegmentKind::Str, "a{1+2".to_string())]);
    }

    #[test]
    fn offsets_point_at_expression_interior() {
        let segs = split("ab{cd}ef");
        assert_eq!(segs[1].offset, SourceOffset::new(3));
    }

    proptest::proptest! {
        #[test]
        fn no_braces_means_single_string_segment(s in "[a-zA-Z0-9 ]{0,40}") {
            let segs = split(&s);
            if s.is_empty() {
                proptest::prop_assert!(segs.is_empty());
            } else {
                proptest::prop_assert_eq!(segs.len(), 1);
                proptest::prop_assert_eq!(segs[0].kind, SegmentKind::Str);
            }
        }
    }
}
