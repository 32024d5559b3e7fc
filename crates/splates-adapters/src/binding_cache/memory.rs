//! In-memory binding cache for tests and single-process setups.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use splates_core::{
    application::{ApplicationError, ports::BindingCache},
    domain::BindingDescriptor,
    error::SplatesResult,
};

/// Thread-safe in-memory binding cache.
///
/// Clones share storage, so two registries built from clones behave like two
/// processes sharing one cache directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBindingCache {
    inner: Arc<RwLock<HashMap<String, Vec<BindingDescriptor>>>>,
}

impl MemoryBindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BindingCache for MemoryBindingCache {
    fn load(&self, unit: &str) -> SplatesResult<Option<Vec<BindingDescriptor>>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(unit).cloned())
    }

    fn store(&self, unit: &str, bindings: &[BindingDescriptor]) -> SplatesResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(unit.to_owned(), bindings.to_vec());
        Ok(())
    }

    fn clear(&self) -> SplatesResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.clear();
        Ok(())
    }
}
