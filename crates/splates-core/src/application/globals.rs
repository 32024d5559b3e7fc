//! Process-wide named values consulted at injection time.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::application::ApplicationError;
use crate::domain::Value;
use crate::error::SplatesResult;

/// Thread-safe map of global names to values.
///
/// The host populates it during setup; renders only read. Values are shared
/// by clone, services by `Arc`.
#[derive(Debug, Default)]
pub struct GlobalStore {
    values: RwLock<HashMap<String, Value>>,
}

impl GlobalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a global.
    pub fn add(&self, name: impl Into<String>, value: impl Into<Value>) -> SplatesResult<()> {
        self.values
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .insert(name.into(), value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> SplatesResult<Option<Value>> {
        let values = self
            .values
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(values.get(name).cloned())
    }

    /// Snapshot of every global.
    pub fn all(&self) -> SplatesResult<HashMap<String, Value>> {
        let values = self
            .values
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(values.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values
            .read()
            .map(|values| values.contains_key(name))
            .unwrap_or(false)
    }
}
