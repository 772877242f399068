use brace_value::Value;

use crate::arity::Arity;

/// A registered function's callback. Registry functions are total: bad
/// input yields a sentinel value (`NaN`, `false`, null) rather than a
/// propagated error, matching the host runtime's permissive semantics.
pub type FnImpl = fn(&[Value]) -> Value;

/// One entry in the function table: its arity, its implementation, and
/// the name it should be emitted as on the target surface (§4.7). A
/// `client_name` of `None` means the function is `NA` on that surface:
/// emission of a call to it yields the empty string.
#[derive(Clone, Copy)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub client_name: Option<&'static str>,
    pub arity: Arity,
    pub call: FnImpl,
}

impl FunctionSpec {
    pub const fn new(name: &'static str, client_name: Option<&'static str>, arity: Arity, call: FnImpl) -> Self {
        Self {
            name,
            client_name,
            arity,
            call,
        }
    }
}
