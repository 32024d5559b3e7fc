//! Infrastructure adapters for splates.
//!
//! This crate implements the ports defined in
//! `splates_core::application::ports` and owns every piece of I/O:
//! the on-disk binding cache, template discovery, configuration loading,
//! logging setup and the composition root.
//!
//! ```no_run
//! use splates_adapters::{SplatesConfig, build_engine, init_logging};
//! use splates_core::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = SplatesConfig::load(None)?;
//! init_logging(&config.logging)?;
//!
//! let engine = build_engine(&config)?;
//! let html = engine.render_named("emails::welcome", Data::new())?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod binding_cache;
pub mod bootstrap;
pub mod config;
pub mod extensions;
pub mod locator;
pub mod logging;
pub mod static_file;

// Re-export commonly used adapters
pub use binding_cache::{FileBindingCache, MemoryBindingCache};
pub use bootstrap::{build_engine, build_locator};
pub use config::{EngineConfig, FolderConfig, LoggingConfig, SplatesConfig, ThemeConfig};
pub use extensions::{AssetExtension, UriExtension};
pub use locator::{FolderLocator, Name, Theme, ThemeLocator};
pub use logging::init_logging;
pub use static_file::StaticFile;
