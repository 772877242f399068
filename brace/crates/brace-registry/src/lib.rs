//! brace-registry - The default function table and its dispatch rules.
//!
//! This plays the role `faxc-sem`'s symbol table plays for the Fax
//! compiler's built-ins, but function dispatch here is data, not code: a
//! [`Registry`] is a name-to-[`FunctionSpec`] table a host can clone,
//! extend, and hand to an evaluator, rather than a fixed match statement.

mod arity;
mod datefn;
mod defaults;
mod error;
mod numeric;
mod registry;
mod spec;
mod stringfn;
mod surveyfn;

pub use arity::Arity;
pub use error::RegistryError;
pub use registry::Registry;
pub use spec::{FnImpl, FunctionSpec};
pub use surveyfn::is_empty_value;
