//! Default template directory and named template folders.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use splates_core::error::{SplatesError, SplatesResult};

/// The optional default template directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    path: Option<PathBuf>,
}

impl Directory {
    /// A directory that must exist when given.
    pub fn new(path: Option<PathBuf>) -> SplatesResult<Self> {
        let mut directory = Self::default();
        directory.set(path)?;
        Ok(directory)
    }

    pub fn set(&mut self, path: Option<PathBuf>) -> SplatesResult<()> {
        if let Some(path) = &path {
            if !path.is_dir() {
                return Err(SplatesError::configuration(format!(
                    "The specified path \"{}\" does not exist.",
                    path.display()
                )));
            }
        }
        self.path = path;
        Ok(())
    }

    pub fn get(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// A named template folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    name: String,
    path: PathBuf,
    /// Look in the default directory for files missing here.
    pub fallback: bool,
}

impl Folder {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, fallback: bool) -> SplatesResult<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(SplatesError::configuration(format!(
                "The specified directory path \"{}\" does not exist.",
                path.display()
            )));
        }
        Ok(Self {
            name: name.into(),
            path,
            fallback,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Collection of folders keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Folders {
    folders: HashMap<String, Folder>,
}

impl Folders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        fallback: bool,
    ) -> SplatesResult<&Folder> {
        let name = name.into();
        if self.folders.contains_key(&name) {
            return Err(SplatesError::configuration(format!(
                "The template folder \"{}\" is already being used.",
                name
            )));
        }
        let folder = Folder::new(name.clone(), path, fallback)?;
        Ok(self.folders.entry(name).or_insert(folder))
    }

    pub fn remove(&mut self, name: &str) -> SplatesResult<Folder> {
        self.folders.remove(name).ok_or_else(|| not_found(name))
    }

    pub fn get(&self, name: &str) -> SplatesResult<&Folder> {
        self.folders.get(name).ok_or_else(|| not_found(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.folders.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

fn not_found(name: &str) -> SplatesError {
    SplatesError::configuration(format!("The template folder \"{}\" was not found.", name))
}
