//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the engine needs from external systems.
//! The `splates-adapters` crate provides implementations.

use std::path::PathBuf;

use crate::application::unit::TemplateUnit;
use crate::domain::BindingDescriptor;
use crate::error::SplatesResult;

/// Persistent tier of the dependency registry.
///
/// Implemented by:
/// - `splates_adapters::binding_cache::FileBindingCache` (production)
/// - `splates_adapters::binding_cache::MemoryBindingCache` (testing)
///
/// ## Design Notes
///
/// - Keys are full unit type names; implementations choose a stable encoding
/// - Entries are pure functions of the unit type, so overwriting is harmless
/// - Writes must never leave a partially written entry visible to readers
#[cfg_attr(test, mockall::automock)]
pub trait BindingCache: Send + Sync {
    /// Previously stored bindings for `unit`, if any.
    fn load(&self, unit: &str) -> SplatesResult<Option<Vec<BindingDescriptor>>>;

    /// Store the bindings for `unit`.
    fn store(&self, unit: &str, bindings: &[BindingDescriptor]) -> SplatesResult<()>;

    /// Remove every entry owned by this cache.
    fn clear(&self) -> SplatesResult<()>;
}

/// Port for template discovery.
///
/// Implemented by:
/// - `splates_adapters::locator::FolderLocator` (default directory + named folders)
/// - `splates_adapters::locator::ThemeLocator` (ordered theme fallback)
pub trait TemplateLocator: Send + Sync {
    /// Full path of the template file.
    ///
    /// Fails with `ApplicationError::TemplateNotFound` listing every path tried.
    fn resolve_path(&self, name: &str) -> SplatesResult<PathBuf>;

    /// Whether the template can be found.
    fn exists(&self, name: &str) -> bool {
        self.resolve_path(name).is_ok()
    }

    /// Build a unit rendering the named template.
    fn load(&self, name: &str) -> SplatesResult<Box<dyn TemplateUnit>>;
}
