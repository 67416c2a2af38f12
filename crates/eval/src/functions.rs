//! Defines the registry and built-in implementations for callable functions.
use crate::error::EvalError;
use dbgtrace_expr::{is_truthy, plain_text, type_name, Value};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The signature every registered function implements.
pub type NativeFunction = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// A registry to hold all available functions for the evaluation engine.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, NativeFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(func));
    }

    pub fn get(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Dispatches a call to the named function.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let func = self
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        func(args)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry").field("functions", &names).finish()
    }
}

// --- Argument helpers ---

fn arity(function: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::FunctionError {
            function: function.to_string(),
            message: format!("expected {} argument(s), got {}", expected, args.len()),
        })
    }
}

fn string_arg<'v>(function: &str, value: &'v Value) -> Result<&'v str, EvalError> {
    value.as_str().ok_or_else(|| EvalError::FunctionError {
        function: function.to_string(),
        message: format!("expected a string, got {}", type_name(value)),
    })
}

// --- Built-in Function Implementations ---

fn upper(args: &[Value]) -> Result<Value, EvalError> {
    arity("upper", args, 1)?;
    Ok(string_arg("upper", &args[0])?.to_uppercase().into())
}

fn lower(args: &[Value]) -> Result<Value, EvalError> {
    arity("lower", args, 1)?;
    Ok(string_arg("lower", &args[0])?.to_lowercase().into())
}

fn concat(args: &[Value]) -> Result<Value, EvalError> {
    Ok(args.iter().map(plain_text).collect::<String>().into())
}

fn length(args: &[Value]) -> Result<Value, EvalError> {
    arity("length", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(json!(s.chars().count())),
        Value::Array(items) => Ok(json!(items.len())),
        Value::Object(map) => Ok(json!(map.len())),
        other => Err(EvalError::FunctionError {
            function: "length".to_string(),
            message: format!("cannot take the length of a {}", type_name(other)),
        }),
    }
}

fn sum(args: &[Value]) -> Result<Value, EvalError> {
    arity("sum", args, 1)?;
    let items = args[0].as_array().ok_or_else(|| EvalError::FunctionError {
        function: "sum".to_string(),
        message: format!("expected a list, got {}", type_name(&args[0])),
    })?;
    // Integer sums that overflow fall through to floating point, like binary `+`.
    if items.iter().all(Value::is_i64)
        && let Some(total) = items.iter().filter_map(Value::as_i64).try_fold(0i64, i64::checked_add)
    {
        return Ok(json!(total));
    }
    let mut total = 0.0;
    for item in items {
        total += item.as_f64().ok_or_else(|| EvalError::FunctionError {
            function: "sum".to_string(),
            message: format!("cannot add a {}", type_name(item)),
        })?;
    }
    Ok(json!(total))
}

fn abs(args: &[Value]) -> Result<Value, EvalError> {
    arity("abs", args, 1)?;
    if let Some(n) = args[0].as_i64().and_then(i64::checked_abs) {
        return Ok(json!(n));
    }
    args[0]
        .as_f64()
        .map(|n| json!(n.abs()))
        .ok_or_else(|| EvalError::FunctionError {
            function: "abs".to_string(),
            message: format!("expected a number, got {}", type_name(&args[0])),
        })
}

fn is_nil(args: &[Value]) -> Result<Value, EvalError> {
    arity("is_nil", args, 1)?;
    Ok(args[0].is_null().into())
}

fn not(args: &[Value]) -> Result<Value, EvalError> {
    arity("not", args, 1)?;
    Ok((!is_truthy(&args[0])).into())
}

fn inspect(args: &[Value]) -> Result<Value, EvalError> {
    arity("inspect", args, 1)?;
    Ok(dbgtrace_expr::inspect(&args[0]).into())
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("concat", concat);
        registry.register("length", length);
        registry.register("sum", sum);
        registry.register("abs", abs);
        registry.register("not", not);
        registry.register("is_nil", is_nil);
        registry.register("inspect", inspect);
        registry
    }
}
