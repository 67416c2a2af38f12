use crate::error::EvalError;
use crate::functions::FunctionRegistry;
use dbgtrace_expr::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The live evaluation environment: variable bindings plus callable functions.
///
/// Child scopes share the function registry and copy the variable map, so bindings
/// made inside a `case` clause never leak back to the caller.
#[derive(Debug, Clone)]
pub struct Environment {
    variables: HashMap<String, Value>,
    functions: Arc<FunctionRegistry>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(FunctionRegistry::default())
    }
}

impl Environment {
    pub fn new(functions: FunctionRegistry) -> Self {
        Self {
            variables: HashMap::new(),
            functions: Arc::new(functions),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Result<&Value, EvalError> {
        self.variables
            .get(name)
            .ok_or_else(|| EvalError::UnknownVariable(name.to_string()))
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Creates a scope that sees every binding of `self` plus `bindings`.
    pub fn child_scope(&self, bindings: Vec<(String, Value)>) -> Environment {
        let mut child = self.clone();
        for (name, value) in bindings {
            child.set(name, value);
        }
        child
    }
}
