use crate::error::{ExprError, FunctionError};
use crate::functions::{self, FnFunction, Function};
use crate::value::Value;
use hashbrown::HashMap;
use std::sync::Arc;

/// Registry of functions callable from parameter expressions.
///
/// Clones share the registered functions; registering into a clone does not
/// affect the original.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl FunctionRegistry {
    /// Create a registry with the built-in library installed
    #[inline]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_functions();
        registry
    }

    /// Create a registry with no functions at all
    #[inline]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    fn register_builtin_functions(&mut self) {
        for function in functions::builtins() {
            self.register(function);
        }
    }

    /// Register a function, replacing any previous one with the same name
    #[inline]
    pub fn register(&mut self, function: Box<dyn Function>) {
        self.functions
            .insert(function.name().to_string(), Arc::from(function));
    }

    /// Register a closure over coerced numeric arguments
    pub fn register_fn<F>(&mut self, name: impl Into<String>, arity: usize, func: F)
    where
        F: Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.register(Box::new(FnFunction::new(name, arity, func)));
    }

    /// Get a function by name
    #[inline]
    pub fn get(&self, name: &str) -> Option<&dyn Function> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Look up `name` and invoke it with `args`
    pub fn call(&self, name: &str, args: &[Value]) -> Result<f64, ExprError> {
        let function = self.get(name).ok_or_else(|| ExprError::UnknownFunction {
            name: name.to_string(),
        })?;
        Ok(function.invoke(args)?)
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
