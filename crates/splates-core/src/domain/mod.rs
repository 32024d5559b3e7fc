// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for splates.
//!
//! Pure data and state machines with no I/O:
//!
//! - **Bindings**: what a unit type declares it needs
//! - **Values**: template data, escaping wrappers, escaping policies
//! - **Capture**: the stack of output frames owned by one render call
//! - **Sections**: the legacy named-buffer override state machine
//! - **Functions**: the typed template-function registry
//!
//! Everything that touches the outside world (files, caches, globals) is
//! handled through ports in the application layer.

pub mod binding;
pub mod capture;
pub mod data;
pub mod error;
pub mod escape;
pub mod function;
pub mod section;
pub mod value;

pub use binding::{
    BindingDescriptor, BindingKind, BindingSource, BindingsBuilder, Helper, SlotDraft,
};
pub use capture::OutputStack;
pub use data::{Data, Scope, SharedData};
pub use error::{DomainError, ErrorCategory};
pub use escape::{Escapable, escape};
pub use function::{BoxError, Func, Functions};
pub use section::{CONTENT, Commit, OpenSection, SectionMode, Sections};
pub use value::{Attr, Html, Js, Service, Slot, Text, Value};
