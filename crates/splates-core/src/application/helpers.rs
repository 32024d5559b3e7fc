//! The two framework-provided helpers a unit can ask for by type.

use std::any::TypeId;
use std::sync::{Arc, RwLock};

use crate::application::{ApplicationError, services::Engine, unit::TemplateUnit};
use crate::domain::{Data, Escapable, Helper, escape};
use crate::error::SplatesResult;

/// Helper types recognised when scanning bindings.
pub(crate) fn helper_types() -> [(TypeId, Helper); 2] {
    [
        (TypeId::of::<Fetcher>(), Helper::Fetch),
        (TypeId::of::<Escaper>(), Helper::Escape),
    ]
}

/// Child-render function bound to the render that created it.
///
/// Parent data is read when a child is rendered, so data the parent body
/// added with `Template::add_data` is inherited too.
#[derive(Clone)]
pub struct Fetcher {
    engine: Engine,
    parent: Arc<RwLock<Data>>,
}

impl Fetcher {
    pub(crate) fn new(engine: Engine, parent: Arc<RwLock<Data>>) -> Self {
        Self { engine, parent }
    }

    /// Render `unit` with the parent's data underneath `data`.
    pub fn fetch<U: TemplateUnit + 'static>(&self, unit: U, data: Data) -> SplatesResult<String> {
        self.fetch_with(unit, data, true)
    }

    /// Render `unit`, inheriting the parent's data only when `inherit` is set.
    pub fn fetch_with<U: TemplateUnit + 'static>(
        &self,
        mut unit: U,
        data: Data,
        inherit: bool,
    ) -> SplatesResult<String> {
        let base = if inherit {
            Some(self.parent_data()?)
        } else {
            None
        };
        self.engine.render_child(&mut unit, data, base.as_ref())
    }

    /// Render a registered or discoverable template by name.
    pub fn fetch_named(&self, name: &str, data: Data) -> SplatesResult<String> {
        let mut unit = self.engine.load(name)?;
        let base = self.parent_data()?;
        self.engine.render_child(unit.as_mut(), data, Some(&base))
    }

    /// Render without inheriting parent data.
    pub fn render<U: TemplateUnit + 'static>(&self, unit: U, data: Data) -> SplatesResult<String> {
        self.fetch_with(unit, data, false)
    }

    fn parent_data(&self) -> SplatesResult<Data> {
        let parent = self
            .parent
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(parent.clone())
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}

/// HTML escaper. Stateless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Escaper;

impl Escaper {
    pub fn escape<T: Escapable + ?Sized>(&self, value: &T) -> String {
        escape(value)
    }
}
