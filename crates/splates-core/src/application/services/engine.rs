//! Composition engine.
//!
//! Orchestrates one render call:
//!
//! ```text
//! render(unit, data)
//!   │
//!   ├─ 1. merge shared data, parent data, own data, extra data
//!   ├─ 2. resolve bindings (DependencyRegistry)
//!   ├─ 3. helpers / globals ──▶ inject slots, collect parameters
//!   ├─ 4. display() inside a capture frame (unwound on error)
//!   └─ 5. layout requested? ──▶ hand sections + output to the layout
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{debug, instrument};

use crate::application::{
    ApplicationError,
    globals::GlobalStore,
    helpers::{Escaper, Fetcher},
    ports::{BindingCache, TemplateLocator},
    registry::DependencyRegistry,
    template::{LayoutRequest, LayoutTarget, Template},
    unit::{Injection, Params, TemplateUnit, UnitType},
};
use crate::domain::{
    BindingKind, BindingSource, BoxError, Data, Func, Functions, Helper, Scope, Sections,
    SharedData, Value,
};
use crate::error::{SplatesError, SplatesResult};

type Factory = Arc<dyn Fn() -> Box<dyn TemplateUnit> + Send + Sync>;

/// Bundle of functions registered together.
pub trait Extension {
    fn register(&self, engine: &Engine) -> SplatesResult<()>;
}

/// The template engine. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    registry: DependencyRegistry,
    globals: GlobalStore,
    shared: RwLock<SharedData>,
    functions: RwLock<Functions>,
    factories: RwLock<HashMap<String, Factory>>,
    locator: Option<Arc<dyn TemplateLocator>>,
}

/// Builder for [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    cache: Option<Arc<dyn BindingCache>>,
    locator: Option<Arc<dyn TemplateLocator>>,
}

impl EngineBuilder {
    /// Enable the persistent binding cache tier.
    pub fn binding_cache(mut self, cache: Arc<dyn BindingCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Enable lookup of templates by name.
    pub fn locator(mut self, locator: Arc<dyn TemplateLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn build(self) -> Engine {
        let registry = match self.cache {
            Some(cache) => DependencyRegistry::with_cache(cache),
            None => DependencyRegistry::new(),
        };

        Engine {
            inner: Arc::new(EngineInner {
                registry,
                globals: GlobalStore::new(),
                shared: RwLock::new(SharedData::new()),
                functions: RwLock::new(Functions::new()),
                factories: RwLock::new(HashMap::new()),
                locator: self.locator,
            }),
        }
    }
}

impl Engine {
    /// Engine with a memory-only binding cache and no locator.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn registry(&self) -> &DependencyRegistry {
        &self.inner.registry
    }

    // ========================================================================
    // Globals
    // ========================================================================

    pub fn add_global(&self, name: impl Into<String>, value: impl Into<Value>) -> SplatesResult<()> {
        self.inner.globals.add(name, value)
    }

    pub fn get_global(&self, name: &str) -> SplatesResult<Option<Value>> {
        self.inner.globals.get(name)
    }

    pub fn globals(&self) -> SplatesResult<HashMap<String, Value>> {
        self.inner.globals.all()
    }

    // ========================================================================
    // Shared data
    // ========================================================================

    /// Preassign data to every template or to the named ones.
    pub fn add_data(&self, data: Data, scope: Scope) -> SplatesResult<()> {
        self.inner
            .shared
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .add(data, scope);
        Ok(())
    }

    /// Shared data for a template name; `None` returns data shared by all.
    pub fn data_for(&self, name: Option<&str>) -> SplatesResult<Data> {
        let shared = self
            .inner
            .shared
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(shared.get(name))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    pub fn register_function<F>(&self, name: &str, callback: F) -> SplatesResult<()>
    where
        F: Fn(&[Value]) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let func = Func::new(name, callback)?;
        self.inner
            .functions
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .add(func)?;
        Ok(())
    }

    pub fn drop_function(&self, name: &str) -> SplatesResult<()> {
        self.inner
            .functions
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .remove(name)?;
        Ok(())
    }

    pub fn function(&self, name: &str) -> SplatesResult<Func> {
        let functions = self
            .inner
            .functions
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(functions.get(name)?.clone())
    }

    pub fn function_exists(&self, name: &str) -> bool {
        self.inner
            .functions
            .read()
            .map(|functions| functions.exists(name))
            .unwrap_or(false)
    }

    pub fn call_function(&self, name: &str, args: &[Value]) -> SplatesResult<Value> {
        // Clone out of the lock so callbacks may use the engine.
        let func = self.function(name)?;
        Ok(func.call(args)?)
    }

    pub fn batch(&self, value: Value, functions: &str) -> SplatesResult<Value> {
        let registry = self
            .inner
            .functions
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?
            .clone();
        Ok(registry.batch(value, functions)?)
    }

    pub fn load_extension(&self, extension: &dyn Extension) -> SplatesResult<()> {
        extension.register(self)
    }

    pub fn load_extensions(&self, extensions: &[&dyn Extension]) -> SplatesResult<()> {
        extensions.iter().try_for_each(|ext| self.load_extension(*ext))
    }

    // ========================================================================
    // Named templates
    // ========================================================================

    /// Register a factory producing the unit for `name`.
    pub fn register_template<U, F>(&self, name: impl Into<String>, factory: F) -> SplatesResult<()>
    where
        U: TemplateUnit + 'static,
        F: Fn() -> U + Send + Sync + 'static,
    {
        let make: Factory = Arc::new(move || Box::new(factory()) as Box<dyn TemplateUnit>);
        self.inner
            .factories
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .insert(name.into(), make);
        Ok(())
    }

    /// Build the unit for `name`: registered factories first, then the locator.
    pub fn load(&self, name: &str) -> SplatesResult<Box<dyn TemplateUnit>> {
        let factory = self
            .inner
            .factories
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?
            .get(name)
            .cloned();

        if let Some(factory) = factory {
            return Ok(factory());
        }

        match &self.inner.locator {
            Some(locator) => locator.load(name),
            None => Err(ApplicationError::UnknownTemplate { name: name.into() }.into()),
        }
    }

    /// File path of a named template, through the locator.
    pub fn path(&self, name: &str) -> SplatesResult<PathBuf> {
        match &self.inner.locator {
            Some(locator) => locator.resolve_path(name),
            None => Err(ApplicationError::UnknownTemplate { name: name.into() }.into()),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        let registered = self
            .inner
            .factories
            .read()
            .map(|f| f.contains_key(name))
            .unwrap_or(false);

        registered
            || self
                .inner
                .locator
                .as_ref()
                .is_some_and(|locator| locator.exists(name))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render a unit.
    pub fn render<U: TemplateUnit + 'static>(&self, mut unit: U, data: Data) -> SplatesResult<String> {
        self.render_unit(&mut unit, data)
    }

    /// Render a unit behind a trait object.
    #[instrument(skip_all, fields(unit = unit.unit_type().name()))]
    pub fn render_unit(&self, unit: &mut dyn TemplateUnit, data: Data) -> SplatesResult<String> {
        self.render_child(unit, data, None)
    }

    /// Render a named template.
    pub fn render_named(&self, name: &str, data: Data) -> SplatesResult<String> {
        let mut unit = self.load(name)?;
        self.render_unit(unit.as_mut(), data)
    }

    /// Inject `unit` and build its render context without running the body.
    pub fn make<U: TemplateUnit + 'static>(&self, unit: &mut U, data: Data) -> SplatesResult<Template> {
        self.prepare(unit, data, None)
    }

    /// Empty the binding caches.
    pub fn clear_cache(&self) -> SplatesResult<()> {
        self.inner.registry.clear_cache()
    }

    /// Resolve bindings for `units` ahead of time.
    pub fn warm_cache(&self, units: &[UnitType]) -> SplatesResult<()> {
        self.inner.registry.warm_cache(units)
    }

    pub(crate) fn render_child(
        &self,
        unit: &mut dyn TemplateUnit,
        data: Data,
        base: Option<&Data>,
    ) -> SplatesResult<String> {
        let template = self.prepare(unit, data, base)?;
        self.run(unit, template)
    }

    fn prepare(
        &self,
        unit: &mut dyn TemplateUnit,
        extra: Data,
        base: Option<&Data>,
    ) -> SplatesResult<Template> {
        let unit_type = unit.unit_type();
        let name = unit.name().map(str::to_owned);
        let path = unit.path().map(|p| p.to_path_buf());

        let mut data = self.data_for(Some(name.as_deref().unwrap_or(unit_type.name())))?;
        if let Some(base) = base {
            data.merge(base.clone());
        }
        data.merge(unit.own_data());
        data.merge(extra);

        let bindings = self.inner.registry.resolve(unit_type)?;
        let inherited = Arc::new(RwLock::new(data.clone()));
        let mut params = Params::default();

        for binding in bindings.iter() {
            let value = match binding.source {
                BindingSource::Helper(Helper::Fetch) => {
                    Injection::Fetch(Fetcher::new(self.clone(), Arc::clone(&inherited)))
                }
                BindingSource::Helper(Helper::Escape) => Injection::Escape(Escaper),
                BindingSource::Global => match self.inner.globals.get(&binding.lookup_key)? {
                    Some(value) if binding.escape => Injection::Value(value.into_escaped()),
                    Some(value) => Injection::Value(value),
                    None if binding.nullable => continue,
                    None => {
                        return Err(ApplicationError::MissingDependency {
                            unit: unit_type.name().to_owned(),
                            slot: binding.slot_name.clone(),
                            key: binding.lookup_key.clone(),
                        }
                        .into());
                    }
                },
            };

            match binding.kind {
                BindingKind::Slot => unit.inject(&binding.slot_name, value)?,
                BindingKind::Parameter { .. } => params.push(value),
            }
        }

        Ok(Template::new(
            self.clone(),
            unit_type.name(),
            name,
            path,
            data,
            inherited,
            params,
        ))
    }

    fn run(&self, unit: &dyn TemplateUnit, mut template: Template) -> SplatesResult<String> {
        let params = template.take_params();
        let depth = template.open_body();

        let result = unit
            .display(&mut template, &params)
            .and_then(|()| template.ensure_sections_closed().map_err(SplatesError::from));

        if let Err(e) = result {
            template.abort_body(depth);
            return Err(e);
        }

        let content = template.close_body(depth);
        match template.into_layout_parts() {
            (None, _) => Ok(content),
            (Some(request), sections) => self.render_layout(request, sections.into_layout(content)),
        }
    }

    #[instrument(skip_all, fields(layout = %request.target))]
    fn render_layout(&self, request: LayoutRequest, sections: Sections) -> SplatesResult<String> {
        let mut unit = match request.target {
            LayoutTarget::Unit(unit) => unit,
            LayoutTarget::Named(name) => self.load(&name)?,
        };

        let mut template = self.prepare(unit.as_mut(), request.data, None)?;
        template.seed_sections(sections);
        debug!("rendering layout");
        self.run(unit.as_ref(), template)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("persistent_cache", &self.inner.registry.has_persistent_cache())
            .field("locator", &self.inner.locator.is_some())
            .finish_non_exhaustive()
    }
}
