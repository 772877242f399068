//! String interning for variable and function names.
//!
//! Expressions re-reference the same variable and function names constantly
//! (`self.comments`, `if`, `is_empty`, ...), and the evaluator compares names
//! on every lookup. A [`Symbol`] is a 4-byte handle to an interned string,
//! giving O(1) equality instead of repeated string comparisons.
//!
//! The table is process-wide and backed by [`DashMap`] so that a host
//! embedding multiple evaluator instances across threads (see the crate's
//! concurrency notes: one evaluator per thread, sharing the read-only
//! registry and interner) never contends on a single lock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};

static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

struct StringTable {
    by_hash: DashMap<u64, (&'static str, u32)>,
    strings: DashMap<u32, &'static str>,
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            by_hash: DashMap::with_capacity(256),
            strings: DashMap::with_capacity(256),
            next_index: AtomicU32::new(0),
        }
    }

    fn intern(&self, text: &str) -> Symbol {
        let hash = Self::hash_of(text);
        if let Some(entry) = self.by_hash.get(&hash) {
            if entry.value().0 == text {
                return Symbol(entry.value().1);
            }
        }
        // Miss, or a hash collision with a different string: leak once and
        // record under both maps. Collisions are astronomically unlikely
        // for the identifier-sized strings this table stores, so a single
        // overwrite-free insert (rather than probing) is an acceptable
        // trade: the worst case is two distinct strings briefly racing to
        // register the same hash bucket, which `entry()` resolves safely.
        match self.by_hash.entry(hash) {
            dashmap::mapref::entry::Entry::Occupied(entry) if entry.get().0 == text => {
                Symbol(entry.get().1)
            }
            _ => {
                let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
                let index = self.next_index.fetch_add(1, Ordering::Relaxed);
                self.by_hash.insert(hash, (leaked, index));
                self.strings.insert(index, leaked);
                Symbol(index)
            }
        }
    }

    fn resolve(&self, symbol: Symbol) -> &'static str {
        self.strings
            .get(&symbol.0)
            .map(|entry| *entry.value())
            .unwrap_or("")
    }

    fn hash_of(text: &str) -> u64 {
        let mut hasher = AHasher::default();
        text.hash(&mut hasher);
        hasher.finish()
    }
}

/// A compact, interned handle to a string such as a variable or function
/// name. Symbols compare in O(1) and are `Copy`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `text`, returning the symbol for it. Interning the same text
    /// twice (from any thread) returns the same symbol.
    pub fn intern(text: &str) -> Self {
        STRING_TABLE.intern(text)
    }

    /// The original string this symbol was interned from.
    pub fn as_str(self) -> &'static str {
        STRING_TABLE.resolve(self)
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::intern(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_same_symbol() {
        let a = Symbol::intern("relevanceStatus");
        let b = Symbol::intern("relevanceStatus");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "relevanceStatus");
    }

    #[test]
    fn distinct_text_interns_to_distinct_symbols() {
        let a = Symbol::intern("self");
        let b = Symbol::intern("that");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_string_round_trips() {
        let s = Symbol::intern("");
        assert_eq!(s.as_str(), "");
    }

    #[quickcheck_macros::quickcheck]
    fn round_trip(text: String) -> bool {
        Symbol::intern(&text).as_str() == text
    }
}
