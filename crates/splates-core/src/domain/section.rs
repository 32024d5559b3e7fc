//! Named sections for the layout-override mechanism.
//!
//! ```text
//!             start / push / unshift
//!  NoSection ─────────────────────────▶ Open(name, mode)
//!      ▲                                     │
//!      └──────────────── stop ───────────────┘
//! ```
//!
//! Only one section may be open at a time. Committed content survives until a
//! layout reads it; when a template hands over to its layout, its own output
//! is stored under the reserved name `"content"`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Name under which a child's own output is handed to its layout.
pub const CONTENT: &str = "content";

/// How a closed section is merged with what is already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionMode {
    /// Replace; skipped entirely if the section already has content.
    #[default]
    Rewrite,
    Append,
    Prepend,
}

impl SectionMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rewrite => "rewrite",
            Self::Append => "append",
            Self::Prepend => "prepend",
        }
    }
}

impl fmt::Display for SectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The currently open section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSection {
    pub name: String,
    pub mode: SectionMode,
}

/// What happened to a closed section's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Stored,
    Discarded,
}

/// Section state for one render context.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    committed: HashMap<String, String>,
    modes: HashMap<String, SectionMode>,
    open: Option<OpenSection>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition `NoSection -> Open(name, mode)`.
    pub fn open(&mut self, name: &str, mode: SectionMode) -> Result<(), DomainError> {
        if name == CONTENT {
            return Err(DomainError::ReservedSectionName);
        }

        if let Some(open) = &self.open {
            return Err(DomainError::NestedSection {
                open: open.name.clone(),
                requested: name.to_owned(),
            });
        }

        self.modes.insert(name.to_owned(), mode);
        self.open = Some(OpenSection {
            name: name.to_owned(),
            mode,
        });
        Ok(())
    }

    /// Transition `Open -> NoSection`, returning the section that was open.
    pub fn close(&mut self) -> Result<OpenSection, DomainError> {
        self.open.take().ok_or(DomainError::SectionNotStarted)
    }

    /// Whether output of a section about to close will be kept.
    pub fn will_store(&self, section: &OpenSection) -> bool {
        !(section.mode == SectionMode::Rewrite && self.committed.contains_key(&section.name))
    }

    /// Merge the captured output of a closed section.
    pub fn commit(&mut self, section: OpenSection, output: String) -> Commit {
        if !self.will_store(&section) {
            return Commit::Discarded;
        }

        let slot = self.committed.entry(section.name).or_default();
        match section.mode {
            SectionMode::Rewrite => *slot = output,
            SectionMode::Append => slot.push_str(&output),
            SectionMode::Prepend => slot.insert_str(0, &output),
        }
        Commit::Stored
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.committed.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.committed.contains_key(name)
    }

    /// Last mode a section was opened with.
    pub fn mode(&self, name: &str) -> Option<SectionMode> {
        self.modes.get(name).copied()
    }

    pub fn open_section(&self) -> Option<&OpenSection> {
        self.open.as_ref()
    }

    /// Fail if a section was left open.
    pub fn ensure_closed(&self) -> Result<(), DomainError> {
        match &self.open {
            Some(open) => Err(DomainError::UnclosedSection {
                name: open.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Sections handed to a layout: everything committed so far, with
    /// `content` replaced by the rendered body.
    pub fn into_layout(mut self, content: String) -> Self {
        self.open = None;
        self.committed.insert(CONTENT.to_owned(), content);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.committed.keys().map(String::as_str)
    }
}
