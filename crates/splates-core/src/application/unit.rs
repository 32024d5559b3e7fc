//! The contract between host template units and the engine.
//!
//! A unit is a plain struct carrying its own data. It declares injectable
//! slots once per type in [`TemplateUnit::describe`], receives resolved
//! values through [`TemplateUnit::inject`] and writes output in
//! [`TemplateUnit::display`].
//!
//! ```rust
//! use std::fmt::Write;
//! use splates_core::prelude::*;
//!
//! struct Greeting {
//!     name: String,
//!     site: Option<Value>,
//! }
//!
//! impl TemplateUnit for Greeting {
//!     fn describe(bindings: &mut BindingsBuilder) {
//!         bindings.inject::<String>("site").escaped().optional().done();
//!     }
//!
//!     fn inject(&mut self, slot: &str, value: Injection) -> SplatesResult<()> {
//!         if slot == "site" {
//!             self.site = value.into_value();
//!         }
//!         Ok(())
//!     }
//!
//!     fn display(&self, t: &mut Template, _: &Params) -> SplatesResult<()> {
//!         let name = t.e(&self.name);
//!         write!(t, "<h1>Hello {name}</h1>")?;
//!         if let Some(site) = &self.site {
//!             write!(t, "<small>{site}</small>")?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let engine = Engine::new();
//! let html = engine
//!     .render(Greeting { name: "<Ann>".into(), site: None }, Data::new())
//!     .unwrap();
//! assert_eq!(html, "<h1>Hello &lt;Ann&gt;</h1>");
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::application::{
    ApplicationError,
    helpers::{Escaper, Fetcher},
    template::Template,
};
use crate::domain::{BindingsBuilder, Data, Value};
use crate::error::SplatesResult;

/// A host-supplied, data-carrying object whose render body produces output.
pub trait TemplateUnit: DescribeUnit {
    /// Declare the injectable slots and render parameters of this type.
    ///
    /// Called at most once per type per registry; the result is cached.
    fn describe(bindings: &mut BindingsBuilder)
    where
        Self: Sized,
    {
        let _ = bindings;
    }

    /// Receive the resolved value for a declared slot.
    fn inject(&mut self, slot: &str, value: Injection) -> SplatesResult<()> {
        let _ = value;
        Err(ApplicationError::InjectionRejected {
            unit: self.unit_type().name().to_owned(),
            slot: slot.to_owned(),
            reason: "the unit declares slots but does not accept injections".into(),
        }
        .into())
    }

    /// Data carried by the unit itself, visible through the render context.
    fn own_data(&self) -> Data {
        Data::new()
    }

    /// Template name used for shared data and diagnostics.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Backing file, if the unit renders one.
    fn path(&self) -> Option<&Path> {
        None
    }

    /// The render body.
    fn display(&self, template: &mut Template, params: &Params) -> SplatesResult<()>;
}

/// Type identity of a unit, implemented for every [`TemplateUnit`].
pub trait DescribeUnit {
    fn unit_type(&self) -> UnitType;
}

impl<T: TemplateUnit + 'static> DescribeUnit for T {
    fn unit_type(&self) -> UnitType {
        UnitType::of::<T>()
    }
}

/// A unit type: its identity, its name and its `describe` function.
///
/// Equality follows [`TypeId`]. The name is for diagnostics and persistent
/// cache keys; distinct closure types may share it.
#[derive(Clone, Copy)]
pub struct UnitType {
    id: TypeId,
    name: &'static str,
    describe: fn(&mut BindingsBuilder),
}

impl UnitType {
    pub fn of<T: TemplateUnit + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            describe: T::describe,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn describe(&self, bindings: &mut BindingsBuilder) {
        (self.describe)(bindings)
    }
}

impl PartialEq for UnitType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UnitType {}

impl fmt::Debug for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnitType").field(&self.name).finish()
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A resolved value handed to [`TemplateUnit::inject`].
#[derive(Debug, Clone)]
pub enum Injection {
    Fetch(Fetcher),
    Escape(Escaper),
    Value(Value),
}

impl Injection {
    pub fn into_fetcher(self) -> Option<Fetcher> {
        match self {
            Self::Fetch(f) => Some(f),
            _ => None,
        }
    }

    pub fn into_escaper(self) -> Option<Escaper> {
        match self {
            Self::Escape(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Downcast a service global to its concrete type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Value(v) => v.downcast(),
            _ => None,
        }
    }
}

/// Positional helper arguments for the render body, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<Injection>);

impl Params {
    pub(crate) fn push(&mut self, value: Injection) {
        self.0.push(value);
    }

    pub fn get(&self, position: usize) -> Option<&Injection> {
        self.0.get(position)
    }

    pub fn fetcher(&self, position: usize) -> Option<&Fetcher> {
        match self.0.get(position) {
            Some(Injection::Fetch(f)) => Some(f),
            _ => None,
        }
    }

    pub fn escaper(&self, position: usize) -> Option<&Escaper> {
        match self.0.get(position) {
            Some(Injection::Escape(e)) => Some(e),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A unit backed by a closure. Handy for layouts and named templates that
/// need no slots.
pub struct FnUnit<F> {
    name: Option<String>,
    data: Data,
    body: F,
}

impl<F> FnUnit<F>
where
    F: Fn(&mut Template) -> SplatesResult<()>,
{
    pub fn new(body: F) -> Self {
        Self {
            name: None,
            data: Data::new(),
            body,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }
}

/// Shorthand for [`FnUnit::new`].
pub fn from_fn<F>(body: F) -> FnUnit<F>
where
    F: Fn(&mut Template) -> SplatesResult<()>,
{
    FnUnit::new(body)
}

impl<F> TemplateUnit for FnUnit<F>
where
    F: Fn(&mut Template) -> SplatesResult<()> + 'static,
{
    fn own_data(&self) -> Data {
        self.data.clone()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn display(&self, template: &mut Template, _: &Params) -> SplatesResult<()> {
        (self.body)(template)
    }
}
