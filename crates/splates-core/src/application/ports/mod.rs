//! Application ports (traits) for external collaborators.
//!
//! Ports define what the engine needs from the outside world. Adapters in
//! `splates-adapters` implement them.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the engine, implemented by infrastructure
//!   - `BindingCache`: persistent tier of the dependency registry
//!   - `TemplateLocator`: template discovery by name

pub mod output;

pub use output::{BindingCache, TemplateLocator};
