use thiserror::Error;

use crate::arity::Arity;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("undefined function '{0}'")]
    UnknownFunction(String),

    #[error("{name}() expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
}

impl RegistryError {
    pub fn arity(name: &str, expected: Arity, got: usize) -> Self {
        RegistryError::Arity {
            name: name.to_string(),
            expected: expected.to_string(),
            got,
        }
    }
}
