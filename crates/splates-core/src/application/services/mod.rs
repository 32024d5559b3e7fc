//! Application services - orchestrate use cases.
//!
//! The composition engine coordinates the dependency registry, the global
//! store and the render context to turn a unit into a string.

pub mod engine;

pub use engine::{Engine, EngineBuilder, Extension};
