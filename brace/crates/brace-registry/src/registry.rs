//! The function table and its dispatch rules (spec §4.5).

use indexmap::IndexMap;
use tracing::debug;

use brace_util::Symbol;
use brace_value::Value;

use crate::defaults::default_table;
use crate::error::RegistryError;
use crate::spec::FunctionSpec;

/// An immutable default table plus a per-instance overlay of additional or
/// overriding registrations. Cloning a `Registry` is cheap relative to
/// evaluating an expression, so a host can freely hand each evaluator
/// instance its own copy after calling [`Registry::register`].
#[derive(Clone)]
pub struct Registry {
    table: IndexMap<Symbol, FunctionSpec>,
}

impl Registry {
    /// The default registry, pre-populated with every built-in function.
    pub fn with_defaults() -> Self {
        let mut table = IndexMap::with_capacity(96);
        for spec in default_table() {
            table.insert(Symbol::intern(spec.name), spec);
        }
        Self { table }
    }

    /// Merge `functions` into this registry, overwriting any existing
    /// entries with the same name. Mirrors the evaluator's public
    /// `registerFunctions`.
    pub fn register(&mut self, functions: impl IntoIterator<Item = FunctionSpec>) {
        for spec in functions {
            debug!(name = spec.name, "registering function");
            self.table.insert(Symbol::intern(spec.name), spec);
        }
    }

    pub fn get(&self, name: Symbol) -> Option<&FunctionSpec> {
        self.table.get(&name)
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.table.contains_key(&name)
    }

    /// Dispatch a call by name. `parse_only` short-circuits every
    /// invocation (after the arity check still passes) to the placeholder
    /// value `1`, validating syntax without running any side effects.
    pub fn dispatch(&self, name: Symbol, args: &[Value], parse_only: bool) -> Result<Value, RegistryError> {
        let spec = self
            .table
            .get(&name)
            .ok_or_else(|| RegistryError::UnknownFunction(name.as_str().to_string()))?;

        if !spec.arity.accepts(args.len()) {
            return Err(RegistryError::arity(spec.name, spec.arity, args.len()));
        }

        if parse_only {
            return Ok(Value::Num(1.0));
        }

        Ok((spec.call)(args))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_function_errors() {
        let registry = Registry::with_defaults();
        let err = registry
            .dispatch(Symbol::intern("not_a_real_function"), &[], false)
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownFunction(_)));
    }

    #[test]
    fn arity_mismatch_errors() {
        let registry = Registry::with_defaults();
        let err = registry
            .dispatch(Symbol::intern("pi"), &[Value::Num(1.0)], false)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Arity { .. }));
    }

    #[test]
    fn parse_only_short_circuits_to_placeholder() {
        let registry = Registry::with_defaults();
        let result = registry
            .dispatch(Symbol::intern("abs"), &[Value::Str("not a number".into())], true)
            .unwrap();
        assert_eq!(result, Value::Num(1.0));
    }

    #[test]
    fn register_overlay_overrides_default() {
        let mut registry = Registry::with_defaults();
        registry.register([FunctionSpec::new(
            "abs",
            None,
            crate::arity::Arity::Exact(&[1]),
            |_args| Value::Num(42.0),
        )]);
        let result = registry.dispatch(Symbol::intern("abs"), &[Value::Num(-1.0)], false).unwrap();
        assert_eq!(result, Value::Num(42.0));
    }
}
