//! splates core: a typed template-composition engine.
//!
//! Renders trees of host-defined template units (layouts containing
//! components containing slots) with automatic contextual escaping.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Host application / units         │
//! └──────────────────┬──────────────────────┘
//!                    │ render(unit, data)
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │            Engine (services)            │
//! │  registry → inject → display → layout   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     Application Ports (Traits)          │
//! │    (BindingCache, TemplateLocator)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     splates-adapters (Infrastructure)   │
//! │ (FileBindingCache, FolderLocator, ...)  │
//! └─────────────────────────────────────────┘
//!
//!      Domain layer (pure): bindings, values, escaping,
//!      capture frames, sections, functions
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use splates_core::prelude::*;
//!
//! let engine = Engine::new();
//! let page = from_fn(|t: &mut Template| {
//!     t.start("title")?;
//!     t.write("Home");
//!     t.stop()?;
//!     t.layout(
//!         from_fn(|t: &mut Template| {
//!             let title = t.section_or("title", "Untitled").to_owned();
//!             let body = t.section("content").unwrap_or_default().to_owned();
//!             t.write(&format!("<title>{title}</title><main>{body}</main>"));
//!             Ok(())
//!         }),
//!         Data::new(),
//!     );
//!     t.write("<p>Hi</p>");
//!     Ok(())
//! });
//!
//! let html = engine.render(page, Data::new()).unwrap();
//! assert_eq!(html, "<title>Home</title><main><p>Hi</p></main>");
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// Public API - what hosts and adapters should use.
pub mod prelude {
    pub use crate::application::{
        ApplicationError, BindingCache, DependencyRegistry, Engine, EngineBuilder, Escaper,
        Extension, Fetcher, FnUnit, Injection, Params, Template, TemplateLocator, TemplateUnit,
        UnitType, from_fn,
    };
    pub use crate::domain::{
        Attr, BindingDescriptor, BindingsBuilder, Data, DomainError, Html, Js, Scope,
        SectionMode, Service, Slot, Text, Value,
    };
    pub use crate::error::{SplatesError, SplatesResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
