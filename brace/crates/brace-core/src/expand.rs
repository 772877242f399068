//! `self`/`that` variable-reference expansion (§4.6).

use std::cell::RefCell;
use std::collections::HashMap;

use regex::Regex;

use brace_par::ALLOWED_ATTRS;

use crate::question::{Field, Question, QuestionResolver};

/// Per-engine-instance memoization: the same `self.*`/`that.*` reference
/// resolves identically within one host call, so repeated occurrences in
/// a template only pay the regex/lookup cost once.
#[derive(Default)]
pub struct ExpansionCache {
    entries: RefCell<HashMap<String, String>>,
}

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Expands every `self[...]`/`that.<code>[...]` reference found as a bare
/// word in `expr` into its comma-separated list of concrete variable
/// names. References that don't resolve are left as-is.
pub fn expand(expr: &str, resolver: &dyn QuestionResolver, cache: &ExpansionCache) -> String {
    static REFERENCE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"\b(?:self|that\.[A-Za-z_][A-Za-z0-9_]*)(?:\.[A-Za-z_][A-Za-z0-9_]*)*\b").unwrap()
    });

    REFERENCE
        .replace_all(expr, |caps: &regex::Captures| {
            let reference = &caps[0];
            expand_one(reference, resolver, cache)
        })
        .into_owned()
}

fn expand_one(reference: &str, resolver: &dyn QuestionResolver, cache: &ExpansionCache) -> String {
    if let Some(hit) = cache.entries.borrow().get(reference) {
        return hit.clone();
    }
    let expanded = expand_uncached(reference, resolver).unwrap_or_else(|| reference.to_string());
    cache.entries.borrow_mut().insert(reference.to_string(), expanded.clone());
    expanded
}

fn expand_uncached(reference: &str, resolver: &dyn QuestionResolver) -> Option<String> {
    let mut parts: Vec<&str> = reference.split('.').collect();
    if parts.is_empty() {
        return None;
    }

    let question: Question;
    if parts[0] == "self" {
        question = resolver.current()?;
        parts.remove(0);
    } else if parts[0] == "that" {
        if parts.len() < 2 {
            return None;
        }
        question = resolver.get_by_code(parts[1])?;
        parts.drain(0..2);
    } else {
        return None;
    }

    let attr = match parts.last() {
        Some(last) if ALLOWED_ATTRS.contains(last) => {
            let attr = *last;
            parts.pop();
            Some(attr)
        }
        _ => None,
    };

    let mut fields: Vec<&Field> = question.fields.iter().collect();
    for segment in &parts {
        fields = apply_filter(segment, &question.sgqa, fields)?;
    }

    let names: Vec<String> = fields
        .iter()
        .map(|f| match attr {
            Some(a) => format!("{}.{a}", f.name),
            None => f.name.clone(),
        })
        .collect();

    Some(names.join(","))
}

fn apply_filter<'a>(segment: &str, sgqa: &str, fields: Vec<&'a Field>) -> Option<Vec<&'a Field>> {
    if segment == "comments" {
        return Some(fields.into_iter().filter(|f| f.name.ends_with("comment")).collect());
    }
    if segment == "nocomments" {
        return Some(fields.into_iter().filter(|f| !f.name.ends_with("comment")).collect());
    }
    if let Some(pattern) = segment.strip_prefix("sq_") {
        let re = Regex::new(pattern).ok()?;
        return Some(fields.into_iter().filter(|f| suffix_matches(&re, sgqa, &f.code)).collect());
    }
    if let Some(pattern) = segment.strip_prefix("nosq_") {
        let re = Regex::new(pattern).ok()?;
        return Some(fields.into_iter().filter(|f| !suffix_matches(&re, sgqa, &f.code)).collect());
    }
    None
}

fn suffix_matches(re: &Regex, sgqa: &str, code: &str) -> bool {
    let suffix = code.strip_prefix(sgqa).unwrap_or(code);
    re.is_match(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::MapQuestionResolver;

    fn question_q1() -> Question {
        Question {
            sgqa: "q1".to_string(),
            fields: vec![
                Field { name: "q1_1".to_string(), code: "q1_1".to_string() },
                Field { name: "q1_2".to_string(), code: "q1_2".to_string() },
                Field { name: "q1_1comment".to_string(), code: "q1_1comment".to_string() },
            ],
        }
    }

    #[test]
    fn self_nocomments_naok_expands_to_non_comment_fields() {
        let resolver = MapQuestionResolver::new().with_question("q1", question_q1()).with_current("q1");
        let cache = ExpansionCache::new();
        let result = expand("self.nocomments.NAOK", &resolver, &cache);
        assert_eq!(result, "q1_1.NAOK,q1_2.NAOK");
    }

    #[test]
    fn self_comments_expands_to_comment_fields_only() {
        let resolver = MapQuestionResolver::new().with_question("q1", question_q1()).with_current("q1");
        let cache = ExpansionCache::new();
        assert_eq!(expand("self.comments", &resolver, &cache), "q1_1comment");
    }

    #[test]
    fn that_qcode_resolves_a_different_question() {
        let resolver = MapQuestionResolver::new().with_question("q2", question_q1());
        let cache = ExpansionCache::new();
        assert_eq!(expand("that.q2.nocomments", &resolver, &cache), "q1_1,q1_2");
    }

    #[test]
    fn unresolvable_root_leaves_reference_unchanged() {
        let resolver = MapQuestionResolver::new();
        let cache = ExpansionCache::new();
        assert_eq!(expand("self.nocomments", &resolver, &cache), "self.nocomments");
    }

    #[test]
    fn invalid_segment_leaves_reference_unchanged() {
        let resolver = MapQuestionResolver::new().with_question("q1", question_q1()).with_current("q1");
        let cache = ExpansionCache::new();
        assert_eq!(expand("self.bogus_segment", &resolver, &cache), "self.bogus_segment");
    }

    #[test]
    fn sq_regex_filters_by_suffix_past_the_sgqa_prefix() {
        let resolver = MapQuestionResolver::new().with_question("q1", question_q1()).with_current("q1");
        let cache = ExpansionCache::new();
        assert_eq!(expand("self.sq_1$", &resolver, &cache), "q1_1");
    }

    #[test]
    fn repeated_reference_hits_the_cache() {
        let resolver = MapQuestionResolver::new().with_question("q1", question_q1()).with_current("q1");
        let cache = ExpansionCache::new();
        let first = expand("self.nocomments", &resolver, &cache);
        let second = expand("self.nocomments", &resolver, &cache);
        assert_eq!(first, second);
        assert!(cache.entries.borrow().contains_key("self.nocomments"));
    }
}
