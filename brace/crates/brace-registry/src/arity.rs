//! Arity specifications and their accept/describe logic (spec §4.5).

use std::fmt;

/// How many arguments a function accepts.
#[derive(Clone, Copy, Debug)]
pub enum Arity {
    /// The argument count must be one of these exact values.
    Exact(&'static [usize]),
    /// At least this many arguments (variadic functions like `max`/`count`).
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exact(set) => set.contains(&n),
            Arity::AtLeast(min) => n >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(set) => {
                let list: Vec<String> = set.iter().map(ToString::to_string).collect();
                write!(f, "{}", list.join(" or "))
            }
            Arity::AtLeast(min) => write!(f, "at least {min}"),
        }
    }
}
