//! Template discovery.
//!
//! Two [`TemplateLocator`] implementations:
//! - [`FolderLocator`]: a default directory plus named folders
//!   (`"folder::file"`), with optional per-folder fallback.
//! - [`ThemeLocator`]: an ordered theme hierarchy, most specific first.
//!
//! Both hand out [`StaticFile`] units for the files they find.

pub mod folders;
pub mod name;
pub mod theme;

use std::path::{Path, PathBuf};

use tracing::debug;

use splates_core::{
    application::{ApplicationError, TemplateLocator, TemplateUnit},
    error::SplatesResult,
};

use crate::static_file::StaticFile;

pub use folders::{Directory, Folder, Folders};
pub use name::Name;
pub use theme::{Theme, ThemeLocator};

/// Extension appended to template names when none is configured.
pub const DEFAULT_EXTENSION: &str = "html";

/// Locates templates in a default directory and named folders.
#[derive(Debug, Clone)]
pub struct FolderLocator {
    directory: Directory,
    folders: Folders,
    extension: String,
}

impl FolderLocator {
    /// Locator rooted at `directory`, which must exist when given.
    pub fn new(directory: Option<PathBuf>) -> SplatesResult<Self> {
        Ok(Self {
            directory: Directory::new(directory)?,
            folders: Folders::new(),
            extension: DEFAULT_EXTENSION.to_owned(),
        })
    }

    /// Use `extension` for template files; empty means names carry their own.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Register a named folder.
    pub fn add_folder(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        fallback: bool,
    ) -> SplatesResult<&mut Self> {
        self.folders.add(name, path, fallback)?;
        Ok(self)
    }

    pub fn remove_folder(&mut self, name: &str) -> SplatesResult<&mut Self> {
        self.folders.remove(name)?;
        Ok(self)
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.get()
    }

    pub fn set_directory(&mut self, directory: Option<PathBuf>) -> SplatesResult<()> {
        self.directory.set(directory)
    }

    pub fn folders(&self) -> &Folders {
        &self.folders
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl TemplateLocator for FolderLocator {
    fn resolve_path(&self, name: &str) -> SplatesResult<PathBuf> {
        let parsed = Name::parse(name, &self.extension)?;
        let path = parsed.path(&self.directory, &self.folders)?;
        if path.is_file() {
            debug!(template = name, path = %path.display(), "resolved template");
            return Ok(path);
        }

        Err(ApplicationError::TemplateNotFound {
            name: name.to_owned(),
            message: format!(
                "The template \"{}\" could not be found at \"{}\".",
                name,
                path.display()
            ),
            paths: vec![path],
        }
        .into())
    }

    fn load(&self, name: &str) -> SplatesResult<Box<dyn TemplateUnit>> {
        let path = self.resolve_path(name)?;
        Ok(Box::new(StaticFile::new(name, path)))
    }
}
