//! Template names: `"file"` or `"folder::file"`.

use std::path::PathBuf;

use splates_core::error::{SplatesError, SplatesResult};

use super::folders::{Directory, Folders};

/// Separator between a folder and a file in a template name.
pub const FOLDER_SEPARATOR: &str = "::";

/// A parsed template name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    name: String,
    folder: Option<String>,
    file: String,
}

impl Name {
    /// Parse `name`, appending `.extension` to the file unless the
    /// extension is empty.
    pub fn parse(name: &str, extension: &str) -> SplatesResult<Self> {
        let parts: Vec<&str> = name.split(FOLDER_SEPARATOR).collect();
        let (folder, file) = match parts.as_slice() {
            [file] => (None, *file),
            [folder, file] => (Some((*folder).to_owned()), *file),
            _ => {
                return Err(invalid(
                    name,
                    "Do not use the folder namespace separator \"::\" more than once.",
                ));
            }
        };

        if file.is_empty() {
            return Err(invalid(name, "The template name cannot be empty."));
        }

        let file = if extension.is_empty() {
            file.to_owned()
        } else {
            format!("{file}.{extension}")
        };

        Ok(Self {
            name: name.to_owned(),
            folder,
            file,
        })
    }

    /// The name as given.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// File name with the extension applied.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Full path of the template file.
    ///
    /// A file missing from a fallback folder resolves to the default
    /// directory when it exists there.
    pub fn path(&self, directory: &Directory, folders: &Folders) -> SplatesResult<PathBuf> {
        let Some(folder) = &self.folder else {
            return Ok(self.default_directory(directory)?.join(&self.file));
        };

        let folder = folders.get(folder)?;
        let path = folder.path().join(&self.file);
        if !path.is_file() && folder.fallback {
            let fallback = self.default_directory(directory)?.join(&self.file);
            if fallback.is_file() {
                return Ok(fallback);
            }
        }
        Ok(path)
    }

    fn default_directory(&self, directory: &Directory) -> SplatesResult<PathBuf> {
        directory
            .get()
            .map(|dir| dir.to_path_buf())
            .ok_or_else(|| invalid(&self.name, "The default directory has not been defined."))
    }
}

fn invalid(name: &str, reason: &str) -> SplatesError {
    SplatesError::configuration(format!(
        "The template name \"{}\" is not valid. {}",
        name, reason
    ))
}
