// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel through nested renders by value)
/// - Categorizable (for host-side display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Section misuse (programmer errors, fatal for the render)
    // ========================================================================
    #[error("The section name \"content\" is reserved.")]
    ReservedSectionName,

    #[error("You cannot nest sections within other sections (\"{requested}\" opened while \"{open}\" is open).")]
    NestedSection { open: String, requested: String },

    #[error("You must start a section before you can stop it.")]
    SectionNotStarted,

    #[error("Section \"{name}\" was started but never stopped.")]
    UnclosedSection { name: String },

    #[error("Section \"{name}\" crosses a capture() boundary; open and close it on the same side.")]
    SectionCrossesCapture { name: String },

    // ========================================================================
    // Binding declaration errors (raised by the metadata scan)
    // ========================================================================
    #[error("Slot \"{slot}\" is declared more than once on {unit}")]
    DuplicateSlot { unit: String, slot: String },

    #[error(
        "Render parameter \"{parameter}\" on {unit} has type {declared_type}; only the fetch and escape helpers can be passed as parameters"
    )]
    InvalidParameterType {
        unit: String,
        parameter: String,
        declared_type: String,
    },

    // ========================================================================
    // Function registry
    // ========================================================================
    #[error("Not a valid function name: \"{name}\".")]
    InvalidFunctionName { name: String },

    #[error("The template function name \"{name}\" is already registered.")]
    DuplicateFunction { name: String },

    #[error("The template function \"{name}\" was not found.")]
    FunctionNotFound { name: String },

    #[error("Template function \"{name}\" failed: {reason}")]
    FunctionFailed { name: String, reason: String },

    // ========================================================================
    // Theme hierarchies
    // ========================================================================
    #[error("Empty theme hierarchies are not allowed.")]
    EmptyThemeHierarchy,

    #[error(
        "Nested theme hierarchies are not allowed, make sure to use Theme::new when creating themes in your hierarchy. Theme {theme} is already in a hierarchy."
    )]
    NestedThemeHierarchy { theme: String },

    #[error("Duplicate theme names in hierarchies are not allowed. Received theme names: [{}].", .names.join(", "))]
    DuplicateThemeNames { names: Vec<String> },

    // ========================================================================
    // Values
    // ========================================================================
    #[error("Value cannot be encoded as JSON: {0}")]
    InvalidJsValue(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ReservedSectionName => vec![
                "\"content\" always holds the child template's own output".into(),
                "Pick another section name".into(),
            ],
            Self::NestedSection { open, .. } => vec![
                format!("Call stop() to close \"{}\" first", open),
                "Sections are flat; capture nested content with capture() instead".into(),
            ],
            Self::SectionNotStarted => vec![
                "Every stop() needs a preceding start(), push() or unshift()".into(),
            ],
            Self::UnclosedSection { name } => {
                vec![format!("Add a stop() after the body of \"{}\"", name)]
            }
            Self::SectionCrossesCapture { name } => vec![
                format!("Start and stop \"{}\" inside the same capture() body", name),
                "Or move the capture() into the section body".into(),
            ],
            Self::DuplicateSlot { slot, .. } => vec![
                format!("Remove the second declaration of \"{}\" in describe()", slot),
            ],
            Self::InvalidParameterType { parameter, .. } => vec![
                format!("Declare \"{}\" as a Fetcher or Escaper parameter", parameter),
                "Inject services through slots instead of parameters".into(),
            ],
            Self::InvalidFunctionName { .. } => vec![
                "Function names must start with a letter or underscore".into(),
                "Only letters, digits and underscores may follow".into(),
            ],
            Self::DuplicateFunction { name } => vec![
                format!("Drop \"{}\" before registering it again", name),
            ],
            Self::FunctionNotFound { name } => vec![
                format!("Register \"{}\" with Engine::register_function", name),
            ],
            Self::NestedThemeHierarchy { theme } => vec![
                format!("Build \"{}\" with Theme::new before adding it", theme),
            ],
            Self::DuplicateThemeNames { .. } => vec!["Give every theme a distinct name".into()],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ReservedSectionName
            | Self::NestedSection { .. }
            | Self::SectionNotStarted
            | Self::UnclosedSection { .. }
            | Self::SectionCrossesCapture { .. } => ErrorCategory::Misuse,
            Self::DuplicateSlot { .. }
            | Self::InvalidParameterType { .. }
            | Self::InvalidFunctionName { .. }
            | Self::DuplicateFunction { .. }
            | Self::EmptyThemeHierarchy
            | Self::NestedThemeHierarchy { .. }
            | Self::DuplicateThemeNames { .. } => ErrorCategory::Configuration,
            Self::FunctionNotFound { .. } => ErrorCategory::NotFound,
            Self::FunctionFailed { .. } | Self::InvalidJsValue(_) => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Misuse,
    NotFound,
}
