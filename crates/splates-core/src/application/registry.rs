//! Dependency registry: per-type binding descriptors behind a read-through
//! cache.
//!
//! ```text
//! resolve(type)
//!   │
//!   ├─▶ memory    hit ──▶ return shared list
//!   ├─▶ persistent hit ──▶ fill memory ──▶ return
//!   └─▶ describe() scan ──▶ store persistent ──▶ fill memory ──▶ return
//! ```
//!
//! The persistent tier is optional. Its failures are logged and the
//! registry falls back to scanning; they never fail a resolution.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, instrument, warn};

use crate::application::{
    ApplicationError, helpers::helper_types, ports::BindingCache, unit::UnitType,
};
use crate::domain::{BindingDescriptor, BindingsBuilder};
use crate::error::SplatesResult;

/// Shared, immutable descriptor list of one unit type.
pub type Bindings = Arc<[BindingDescriptor]>;

/// Resolves and caches the bindings of unit types.
pub struct DependencyRegistry {
    memory: RwLock<HashMap<TypeId, Bindings>>,
    persistent: Option<Arc<dyn BindingCache>>,
}

impl DependencyRegistry {
    /// Memory-only registry.
    pub fn new() -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            persistent: None,
        }
    }

    /// Registry backed by a persistent cache.
    pub fn with_cache(cache: Arc<dyn BindingCache>) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            persistent: Some(cache),
        }
    }

    pub fn has_persistent_cache(&self) -> bool {
        self.persistent.is_some()
    }

    /// Bindings of `unit`, resolved at most once per tier.
    #[instrument(skip_all, fields(unit = unit.name()))]
    pub fn resolve(&self, unit: UnitType) -> SplatesResult<Bindings> {
        {
            let memory = self
                .memory
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(bindings) = memory.get(&unit.id()) {
                return Ok(Arc::clone(bindings));
            }
        }

        let bindings: Bindings = match self.load_persistent(unit) {
            Some(bindings) => {
                debug!("binding cache hit");
                bindings.into()
            }
            None => {
                let scanned = Self::scan(unit)?;
                self.store_persistent(unit, &scanned);
                scanned.into()
            }
        };

        let mut memory = self
            .memory
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        // Another caller may have resolved the same type meanwhile; keep theirs.
        Ok(Arc::clone(memory.entry(unit.id()).or_insert(bindings)))
    }

    /// Run the metadata scan for `unit`, bypassing every cache.
    pub fn scan(unit: UnitType) -> SplatesResult<Vec<BindingDescriptor>> {
        let mut builder = BindingsBuilder::new(unit.name(), &helper_types());
        unit.describe(&mut builder);
        let bindings = builder.finish()?;
        debug!(count = bindings.len(), "scanned bindings");
        Ok(bindings)
    }

    /// Empty the memory tier and delete every persistent entry.
    pub fn clear_cache(&self) -> SplatesResult<()> {
        self.memory
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .clear();

        if let Some(cache) = &self.persistent {
            cache.clear()?;
        }
        Ok(())
    }

    /// Resolve a batch of types ahead of time.
    pub fn warm_cache(&self, units: &[UnitType]) -> SplatesResult<()> {
        for unit in units {
            self.resolve(*unit)?;
        }
        Ok(())
    }

    /// Number of types held in the memory tier.
    pub fn cached_types(&self) -> usize {
        self.memory.read().map(|m| m.len()).unwrap_or(0)
    }

    fn load_persistent(&self, unit: UnitType) -> Option<Vec<BindingDescriptor>> {
        let cache = self.persistent.as_ref()?;
        match cache.load(unit.name()) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "binding cache unreadable, scanning instead");
                None
            }
        }
    }

    fn store_persistent(&self, unit: UnitType, bindings: &[BindingDescriptor]) {
        if let Some(cache) = &self.persistent {
            if let Err(e) = cache.store(unit.name(), bindings) {
                warn!(error = %e, "failed to persist bindings");
            }
        }
    }
}

impl Default for DependencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
