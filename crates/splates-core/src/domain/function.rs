//! Template functions callable by name from render bodies.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::{error::DomainError, value::Value};

/// Error type returned by host callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Callback = Arc<dyn Fn(&[Value]) -> Result<Value, BoxError> + Send + Sync>;

/// A named, validated template function.
#[derive(Clone)]
pub struct Func {
    name: String,
    callback: Callback,
}

impl Func {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Result<Self, DomainError>
    where
        F: Fn(&[Value]) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            callback: Arc::new(callback),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, DomainError> {
        (self.callback)(args).map_err(|e| DomainError::FunctionFailed {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func").field("name", &self.name).finish()
    }
}

/// First char `[A-Za-z_\x7f-\xff]`, then also digits.
fn validate_name(name: &str) -> Result<(), DomainError> {
    let allowed = |c: char| c == '_' || c.is_ascii_alphabetic() || ('\u{7f}'..='\u{ff}').contains(&c);

    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => allowed(first) && chars.all(|c| allowed(c) || c.is_ascii_digit()),
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidFunctionName {
            name: name.to_owned(),
        })
    }
}

/// Registry of template functions.
#[derive(Debug, Clone, Default)]
pub struct Functions {
    functions: HashMap<String, Func>,
}

impl Functions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, func: Func) -> Result<(), DomainError> {
        if self.functions.contains_key(func.name()) {
            return Err(DomainError::DuplicateFunction {
                name: func.name().to_owned(),
            });
        }
        self.functions.insert(func.name().to_owned(), func);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Func, DomainError> {
        self.functions
            .remove(name)
            .ok_or_else(|| DomainError::FunctionNotFound {
                name: name.to_owned(),
            })
    }

    pub fn get(&self, name: &str) -> Result<&Func, DomainError> {
        self.functions
            .get(name)
            .ok_or_else(|| DomainError::FunctionNotFound {
                name: name.to_owned(),
            })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Apply each `|`-separated function to `value`, left to right.
    pub fn batch(&self, value: Value, functions: &str) -> Result<Value, DomainError> {
        functions
            .split('|')
            .filter(|name| !name.is_empty())
            .try_fold(value, |acc, name| self.get(name)?.call(&[acc]))
    }
}
