//! Persistent tier of the dependency registry.

pub mod file;
pub mod memory;

pub use file::FileBindingCache;
pub use memory::MemoryBindingCache;
