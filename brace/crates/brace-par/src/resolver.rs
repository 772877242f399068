//! The injected host collaborator for variable reads and writes (§6).

use brace_value::Value;

/// The assignment form a `variable OP logicalOr` production used. Only
/// `=` is implemented end to end; the others are reserved so a host can
/// grow into them without changing this trait's shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
}

/// Host-provided variable storage. `read` with `attr = None` asks for the
/// variable's stored value; an attribute name asks for that attribute
/// instead (`relevanceStatus`, `onlynum`, `readWrite`, ...). Errors only
/// for a genuinely unknown variable name; an attribute that the host
/// doesn't track for a given variable is the host's call to make (most
/// implementations default it rather than erroring).
pub trait VariableResolver {
    fn read(
        &self,
        name: &str,
        attr: Option<&str>,
        default: Option<&Value>,
        group_seq: i64,
        question_seq: i64,
    ) -> Result<Value, String>;

    fn write(&mut self, op: AssignOp, name: &str, value: Value) -> Result<Value, String>;
}

/// A resolver backed by an in-memory map, for tests and for the `bracet`
/// CLI's file/stdin-driven demo mode. Every variable defaults to
/// `readWrite = Y` and `relevanceStatus = 1` unless the map says
/// otherwise via `<name>.readWrite` / `<name>.relevanceStatus` entries.
#[derive(Clone, Debug, Default)]
pub struct MapResolver {
    pub values: std::collections::HashMap<String, Value>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl VariableResolver for MapResolver {
    fn read(&self, name: &str, attr: Option<&str>, default: Option<&Value>, _group_seq: i64, _question_seq: i64) -> Result<Value, String> {
        let key = match attr {
            Some(attr) => format!("{name}.{attr}"),
            None => name.to_string(),
        };
        if let Some(value) = self.values.get(&key) {
            return Ok(value.clone());
        }
        if attr.is_some() {
            return Ok(default.cloned().unwrap_or(Value::Null));
        }
        default.cloned().map(Ok).unwrap_or_else(|| Err(format!("undefined variable '{name}'")))
    }

    fn write(&mut self, _op: AssignOp, name: &str, value: Value) -> Result<Value, String> {
        self.values.insert(name.to_string(), value.clone());
        Ok(value)
    }
}
