//! Render context handed to every render body.
//!
//! A `Template` is created per render call by the engine and dropped when
//! the call returns. It owns the merged data, the output frames of this
//! call and the legacy section state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::application::{
    services::Engine,
    unit::{Params, TemplateUnit},
};
use crate::domain::{
    Data, DomainError, Escapable, OutputStack, SectionMode, Sections, Slot, Value, escape,
};
use crate::error::SplatesResult;

/// What a template asked to be wrapped in.
pub(crate) enum LayoutTarget {
    Unit(Box<dyn TemplateUnit>),
    Named(String),
}

impl fmt::Display for LayoutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(unit) => f.write_str(unit.unit_type().name()),
            Self::Named(name) => f.write_str(name),
        }
    }
}

pub(crate) struct LayoutRequest {
    pub(crate) target: LayoutTarget,
    pub(crate) data: Data,
}

/// Per-render context.
pub struct Template {
    engine: Engine,
    unit: &'static str,
    name: Option<String>,
    path: Option<PathBuf>,
    data: Data,
    /// Copy of `data` read by injected fetchers at call time.
    inherited: Arc<RwLock<Data>>,
    params: Params,
    output: OutputStack,
    sections: Sections,
    /// Index of the open section's output frame.
    section_frame: usize,
    layout: Option<LayoutRequest>,
}

impl Template {
    pub(crate) fn new(
        engine: Engine,
        unit: &'static str,
        name: Option<String>,
        path: Option<PathBuf>,
        data: Data,
        inherited: Arc<RwLock<Data>>,
        params: Params,
    ) -> Self {
        Self {
            engine,
            unit,
            name,
            path,
            data,
            inherited,
            params,
            output: OutputStack::new(),
            sections: Sections::new(),
            section_frame: 0,
            layout: None,
        }
    }

    // ========================================================================
    // Identity and data
    // ========================================================================

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Type name of the unit being rendered.
    pub fn unit_type(&self) -> &'static str {
        self.unit
    }

    /// Template name, falling back to the unit type name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.unit)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Add data visible to the rest of this render and to inheriting children.
    pub fn add_data(&mut self, data: Data) {
        self.inherited
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(data.clone());
        self.data.merge(data);
    }

    /// Positional helpers resolved for this unit.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn take_params(&mut self) -> Params {
        std::mem::take(&mut self.params)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Write markup as-is.
    pub fn write(&mut self, markup: &str) {
        self.output.write(markup);
    }

    /// HTML-escape a scalar and write it.
    pub fn write_escaped<T: Escapable + ?Sized>(&mut self, value: &T) {
        let escaped = escape(value);
        self.output.write(&escaped);
    }

    /// Write a value through its own display policy.
    pub fn write_value(&mut self, value: &Value) {
        self.output.write(&value.to_string());
    }

    /// HTML-escape a scalar.
    pub fn escape<T: Escapable + ?Sized>(&self, value: &T) -> String {
        escape(value)
    }

    /// Alias of [`Template::escape`].
    pub fn e<T: Escapable + ?Sized>(&self, value: &T) -> String {
        escape(value)
    }

    /// Run `body` in a new output frame and return what it wrote.
    ///
    /// On error every frame opened inside `body` is discarded. A section
    /// started inside `body` must also be stopped inside it.
    pub fn capture<F>(&mut self, body: F) -> SplatesResult<String>
    where
        F: FnOnce(&mut Self) -> SplatesResult<()>,
    {
        let outer_section = self.sections.open_section().is_some();
        let depth = self.output.open();
        let result = body(self).and_then(|()| self.ensure_no_inner_section(outer_section));

        match result {
            Ok(()) => {
                self.output.unwind_to(depth + 1);
                Ok(self.output.close().unwrap_or_default())
            }
            Err(e) => {
                self.output.unwind_to(depth);
                if !outer_section {
                    // its frame went with the unwind
                    self.sections.close().ok();
                }
                Err(e)
            }
        }
    }

    fn ensure_no_inner_section(&self, outer_section: bool) -> SplatesResult<()> {
        match self.sections.open_section() {
            Some(open) if !outer_section => Err(DomainError::SectionCrossesCapture {
                name: open.name.clone(),
            }
            .into()),
            _ => Ok(()),
        }
    }

    /// Lazily produced content for passing to another unit.
    ///
    /// `body` runs each time the slot is displayed. If it returns an error
    /// (only a failing `Display` impl can make a `String` write fail), the
    /// slot displays as an empty string and the partial output is dropped.
    pub fn slot<F>(&self, body: F) -> Slot
    where
        F: Fn(&mut String) -> fmt::Result + Send + Sync + 'static,
    {
        Slot::new(move || {
            let mut buf = String::new();
            match body(&mut buf) {
                Ok(()) => buf,
                Err(_) => String::new(),
            }
        })
    }

    pub(crate) fn open_body(&mut self) -> usize {
        self.output.open()
    }

    pub(crate) fn close_body(&mut self, depth: usize) -> String {
        self.output.unwind_to(depth + 1);
        self.output.close().unwrap_or_default()
    }

    pub(crate) fn abort_body(&mut self, depth: usize) {
        self.output.unwind_to(depth);
    }

    // ========================================================================
    // Child renders
    // ========================================================================

    /// Render a child with this template's data underneath `data`.
    pub fn fetch<U: TemplateUnit + 'static>(&self, unit: U, data: Data) -> SplatesResult<String> {
        self.fetch_with(unit, data, true)
    }

    pub fn fetch_with<U: TemplateUnit + 'static>(
        &self,
        mut unit: U,
        data: Data,
        inherit: bool,
    ) -> SplatesResult<String> {
        let base = inherit.then_some(&self.data);
        self.engine.render_child(&mut unit, data, base)
    }

    /// Render a registered or discoverable template by name.
    pub fn fetch_named(&self, name: &str, data: Data) -> SplatesResult<String> {
        let mut unit = self.engine.load(name)?;
        self.engine
            .render_child(unit.as_mut(), data, Some(&self.data))
    }

    /// Fetch and write the result.
    pub fn insert<U: TemplateUnit + 'static>(&mut self, unit: U, data: Data) -> SplatesResult<()> {
        let out = self.fetch(unit, data)?;
        self.output.write(&out);
        Ok(())
    }

    pub fn insert_named(&mut self, name: &str, data: Data) -> SplatesResult<()> {
        let out = self.fetch_named(name, data)?;
        self.output.write(&out);
        Ok(())
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Call a registered template function.
    pub fn call(&self, name: &str, args: &[Value]) -> SplatesResult<Value> {
        self.engine.call_function(name, args)
    }

    /// Apply `|`-separated functions to `value`, left to right.
    pub fn batch(&self, value: impl Into<Value>, functions: &str) -> SplatesResult<Value> {
        self.engine.batch(value.into(), functions)
    }

    /// Batch, then HTML-escape the result.
    pub fn escape_with(&self, value: impl Into<Value>, functions: &str) -> SplatesResult<String> {
        let value = self.batch(value, functions)?;
        Ok(escape(&value.to_string()))
    }

    // ========================================================================
    // Sections (legacy layout mode)
    // ========================================================================

    /// Open a section that replaces earlier content; if the section already
    /// has content, this body's output is dropped at `stop`.
    pub fn start(&mut self, name: &str) -> SplatesResult<()> {
        self.open_section(name, SectionMode::Rewrite)
    }

    /// Open a section whose output is appended.
    pub fn push(&mut self, name: &str) -> SplatesResult<()> {
        self.open_section(name, SectionMode::Append)
    }

    /// Open a section whose output is prepended.
    pub fn unshift(&mut self, name: &str) -> SplatesResult<()> {
        self.open_section(name, SectionMode::Prepend)
    }

    /// Close the open section and commit its output.
    ///
    /// Fails without touching any frame when called inside a `capture()`
    /// that the section encloses.
    pub fn stop(&mut self) -> SplatesResult<()> {
        if let Some(open) = self.sections.open_section() {
            if self.output.depth() != self.section_frame + 1 {
                return Err(DomainError::SectionCrossesCapture {
                    name: open.name.clone(),
                }
                .into());
            }
        }

        let section = self.sections.close()?;
        let output = self.output.close().unwrap_or_default();
        self.sections.commit(section, output);
        Ok(())
    }

    /// Alias of [`Template::stop`].
    pub fn end(&mut self) -> SplatesResult<()> {
        self.stop()
    }

    /// Committed content of a section, or `None`.
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections.get(name)
    }

    /// Committed content of a section, or `default`.
    pub fn section_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.sections.get(name).unwrap_or(default)
    }

    /// Mode a section was last opened with.
    pub fn section_mode(&self, name: &str) -> Option<SectionMode> {
        self.sections.mode(name)
    }

    /// Wrap this template's output in `layout` once the body completes.
    pub fn layout<U: TemplateUnit + 'static>(&mut self, layout: U, data: Data) {
        self.layout = Some(LayoutRequest {
            target: LayoutTarget::Unit(Box::new(layout)),
            data,
        });
    }

    /// Wrap this template's output in a named layout.
    pub fn layout_named(&mut self, name: impl Into<String>, data: Data) {
        self.layout = Some(LayoutRequest {
            target: LayoutTarget::Named(name.into()),
            data,
        });
    }

    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }

    fn open_section(&mut self, name: &str, mode: SectionMode) -> SplatesResult<()> {
        self.sections.open(name, mode)?;
        self.section_frame = self.output.open();
        Ok(())
    }

    pub(crate) fn ensure_sections_closed(&self) -> Result<(), DomainError> {
        self.sections.ensure_closed()
    }

    pub(crate) fn seed_sections(&mut self, sections: Sections) {
        self.sections = sections;
    }

    /// Split off the layout request and the sections to hand over.
    pub(crate) fn into_layout_parts(self) -> (Option<LayoutRequest>, Sections) {
        (self.layout, self.sections)
    }
}

impl fmt::Write for Template {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.write(s);
        Ok(())
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("unit", &self.unit)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("data_keys", &self.data.len())
            .field("depth", &self.output.depth())
            .finish_non_exhaustive()
    }
}
