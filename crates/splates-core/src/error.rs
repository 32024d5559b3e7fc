//! Unified error handling for splates core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions. Errors raised by host render
//! bodies travel through unchanged as [`SplatesError::Render`].

use std::sync::Arc;
use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Error type produced by host code inside render bodies.
pub type HostError = Arc<dyn std::error::Error + Send + Sync>;

/// Root error type for splates operations.
#[derive(Debug, Error, Clone)]
pub enum SplatesError {
    /// Section misuse, binding declaration and registry rule violations.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Resolution, injection and composition failures.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Invalid setup (directories, names, folders).
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An error raised by a host render body, passed through unwrapped.
    #[error(transparent)]
    Render(HostError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SplatesError {
    /// Wrap a host error.
    pub fn render<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Render(Arc::new(err))
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Fix the engine setup before rendering".into(),
            ],
            Self::Render(_) => vec!["The error was raised by template code".into()],
            Self::Internal { .. } => vec!["This appears to be a bug in splates".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Misuse => ErrorCategory::Misuse,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Render(_) => ErrorCategory::Render,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<std::fmt::Error> for SplatesError {
    fn from(_: std::fmt::Error) -> Self {
        Self::Internal {
            message: "formatting into the output buffer failed".into(),
        }
    }
}

/// Error categories for host display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Misuse,
    Dependency,
    NotFound,
    Configuration,
    Render,
    Internal,
}

/// Convenient result type alias.
pub type SplatesResult<T> = Result<T, SplatesError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> SplatesResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> SplatesResult<T> {
        self.map_err(|e| SplatesError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
