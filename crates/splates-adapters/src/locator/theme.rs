//! Theme hierarchies: ordered template directories with fallback.
//!
//! ```text
//! Theme::hierarchy([base, brand, campaign])
//!
//!   campaign ──next──▶ brand ──next──▶ base
//!   (searched first)                   (searched last)
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use splates_core::{
    application::{ApplicationError, TemplateLocator, TemplateUnit},
    domain::DomainError,
    error::SplatesResult,
};

use crate::static_file::StaticFile;

/// A named template directory, optionally backed by a less specific theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    dir: PathBuf,
    name: String,
    next: Option<Box<Theme>>,
}

impl Theme {
    pub const DEFAULT_NAME: &'static str = "Default";

    /// A standalone theme.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            next: None,
        }
    }

    /// A standalone theme named [`Theme::DEFAULT_NAME`].
    pub fn with_default_name(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, Self::DEFAULT_NAME)
    }

    /// Chain `themes` from least to most specific and return the most
    /// specific one.
    pub fn hierarchy(themes: Vec<Theme>) -> Result<Theme, DomainError> {
        if let Some(nested) = themes.iter().find(|theme| theme.next.is_some()) {
            return Err(DomainError::NestedThemeHierarchy {
                theme: nested.name.clone(),
            });
        }

        let theme = themes
            .into_iter()
            .reduce(|parent, mut child| {
                child.next = Some(Box::new(parent));
                child
            })
            .ok_or(DomainError::EmptyThemeHierarchy)?;

        let names: Vec<String> = theme.iter().map(|t| t.name.clone()).collect();
        let unique: HashSet<&str> = names.iter().map(String::as_str).collect();
        if unique.len() != names.len() {
            return Err(DomainError::DuplicateThemeNames { names });
        }

        Ok(theme)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn next(&self) -> Option<&Theme> {
        self.next.as_deref()
    }

    /// This theme followed by every theme it falls back to.
    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        std::iter::successors(Some(self), |theme| theme.next())
    }
}

/// Locates `<theme dir>/<name>.<extension>` across a theme hierarchy.
#[derive(Debug, Clone)]
pub struct ThemeLocator {
    theme: Arc<Theme>,
    extension: String,
}

impl ThemeLocator {
    pub fn new(theme: Theme, extension: impl Into<String>) -> Self {
        Self {
            theme: Arc::new(theme),
            extension: extension.into(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn candidate(&self, theme: &Theme, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            theme.dir.join(name)
        } else {
            theme.dir.join(format!("{name}.{}", self.extension))
        }
    }
}

impl TemplateLocator for ThemeLocator {
    fn resolve_path(&self, name: &str) -> SplatesResult<PathBuf> {
        let mut searched = Vec::new();
        for theme in self.theme.iter() {
            let path = self.candidate(theme, name);
            if path.is_file() {
                debug!(template = name, theme = %theme.name, "resolved through theme");
                return Ok(path);
            }
            searched.push((theme.name.as_str(), path));
        }

        let listing: Vec<String> = searched
            .iter()
            .map(|(theme, path)| format!("{}:{}", theme, path.display()))
            .collect();
        Err(ApplicationError::TemplateNotFound {
            name: name.to_owned(),
            message: format!(
                "The template \"{}\" was not found in the following themes: {}",
                name,
                listing.join(", ")
            ),
            paths: searched.into_iter().map(|(_, path)| path).collect(),
        }
        .into())
    }

    fn load(&self, name: &str) -> SplatesResult<Box<dyn TemplateUnit>> {
        let path = self.resolve_path(name)?;
        Ok(Box::new(StaticFile::new(name, path)))
    }
}
