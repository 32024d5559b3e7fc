//! Application layer for splates.
//!
//! This layer contains:
//! - **Services**: the composition engine
//! - **Registry**: per-type binding resolution with cache tiers
//! - **Render context**: `Template`, handed to every render body
//! - **Ports**: interface definitions (traits) for external collaborators
//! - **Errors**: application-specific error types
//!
//! Section, binding and escaping rules live in `crate::domain`.

pub mod error;
pub mod globals;
pub mod helpers;
pub mod ports;
pub mod registry;
pub mod services;
pub mod template;
pub mod unit;

pub use error::ApplicationError;
pub use globals::GlobalStore;
pub use helpers::{Escaper, Fetcher};
pub use ports::{BindingCache, TemplateLocator};
pub use registry::{Bindings, DependencyRegistry};
pub use services::{Engine, EngineBuilder, Extension};
pub use template::Template;
pub use unit::{DescribeUnit, FnUnit, Injection, Params, TemplateUnit, UnitType, from_fn};
