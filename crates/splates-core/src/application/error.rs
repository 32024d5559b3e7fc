//! Application layer errors.
//!
//! These errors represent failures in orchestration, not section or binding
//! rules. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while resolving, injecting and composing units.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A required slot could not be resolved from helpers or globals.
    #[error(
        "Missing dependency for {unit}: slot \"{slot}\" expects a global registered under \"{key}\", but none was found. Register it with Engine::add_global(\"{key}\", ..) or declare the slot optional."
    )]
    MissingDependency {
        unit: String,
        slot: String,
        key: String,
    },

    /// Template discovery failed; carries every candidate path tried.
    #[error("{message}")]
    TemplateNotFound {
        name: String,
        paths: Vec<PathBuf>,
        message: String,
    },

    /// No factory or locator knows this template name.
    #[error("The template \"{name}\" is not registered and no template locator is configured")]
    UnknownTemplate { name: String },

    /// Persistent binding cache failed.
    #[error("Binding cache error at {path}: {reason}")]
    CacheError { path: PathBuf, reason: String },

    /// Shared state access failed (lock poisoned).
    #[error("Engine state lock poisoned")]
    StoreLockError,

    /// The unit refused a value for one of its declared slots.
    #[error("{unit} rejected the value injected into slot \"{slot}\": {reason}")]
    InjectionRejected {
        unit: String,
        slot: String,
        reason: String,
    },
}

impl ApplicationError {
    /// Build a not-found error with the default message.
    pub fn template_not_found(name: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        let name = name.into();
        let message = if paths.is_empty() {
            format!("The template \"{}\" could not be found.", name)
        } else {
            let tried: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            format!(
                "The template \"{}\" could not be found at: {}",
                name,
                tried.join(", ")
            )
        };
        Self::TemplateNotFound {
            name,
            paths,
            message,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingDependency { key, .. } => vec![
                format!("Register the global: engine.add_global(\"{}\", value)", key),
                "Or call .optional() on the slot in describe()".into(),
            ],
            Self::TemplateNotFound { paths, .. } => {
                let mut hints: Vec<String> = paths
                    .iter()
                    .map(|p| format!("Tried: {}", p.display()))
                    .collect();
                hints.push("Check the template directory and file extension".into());
                hints
            }
            Self::UnknownTemplate { name } => vec![
                format!("Register a factory with engine.register_template(\"{}\", ..)", name),
                "Or configure a template locator".into(),
            ],
            Self::CacheError { path, .. } => vec![
                format!("Check that {} is writable", path.display()),
                "Call clear_cache() to discard stale entries".into(),
            ],
            Self::StoreLockError => vec![
                "A previous render panicked while holding engine state".into(),
                "Rebuild the engine".into(),
            ],
            Self::InjectionRejected { slot, .. } => vec![
                format!("Check the declared type of \"{}\" against the registered global", slot),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingDependency { .. } | Self::InjectionRejected { .. } => {
                ErrorCategory::Dependency
            }
            Self::TemplateNotFound { .. } | Self::UnknownTemplate { .. } => {
                ErrorCategory::NotFound
            }
            Self::CacheError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
