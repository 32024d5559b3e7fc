//! A template unit that writes a file's contents verbatim.

use std::fs;
use std::path::{Path, PathBuf};

use splates_core::{
    application::{ApplicationError, Params, Template, TemplateUnit},
    error::{SplatesError, SplatesResult},
};

/// Renders the bytes of a located file. No markup processing happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    name: String,
    path: PathBuf,
}

impl StaticFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Resolve `relative` inside `template_dir`.
    ///
    /// Rejects null bytes, missing files and paths that resolve outside the
    /// directory (through `..` or symlinks).
    pub fn within(template_dir: &Path, relative: &str) -> SplatesResult<Self> {
        if relative.contains('\0') {
            return Err(SplatesError::configuration(
                "Invalid template path: contains null byte",
            ));
        }

        let root = template_dir.canonicalize().map_err(|_| {
            SplatesError::configuration(format!(
                "Template directory does not exist or is not accessible: \"{}\"",
                template_dir.display()
            ))
        })?;

        let full = root.join(relative);
        let resolved = full.canonicalize().map_err(|_| {
            SplatesError::from(ApplicationError::TemplateNotFound {
                name: relative.to_owned(),
                paths: vec![full.clone()],
                message: format!(
                    "Template file not found: \"{}\" (looked in \"{}\")",
                    relative,
                    root.display()
                ),
            })
        })?;

        if resolved == root || !resolved.starts_with(&root) {
            return Err(SplatesError::configuration(format!(
                "Template path \"{}\" resolves outside the allowed directory \"{}\"",
                relative,
                root.display()
            )));
        }

        Ok(Self::new(relative, resolved))
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl TemplateUnit for StaticFile {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn display(&self, template: &mut Template, _: &Params) -> SplatesResult<()> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SplatesError::from(ApplicationError::template_not_found(
                    self.name.clone(),
                    vec![self.path.clone()],
                ))
            } else {
                SplatesError::render(e)
            }
        })?;
        template.write(&contents);
        Ok(())
    }
}
