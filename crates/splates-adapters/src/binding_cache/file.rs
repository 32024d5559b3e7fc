//! On-disk binding cache.
//!
//! One JSON file per unit type, named `splates_<sha1 of type name>.json`.
//! Files are written to a temporary file in the same directory and renamed
//! over the destination, so readers never observe a partial entry.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use splates_core::{
    application::{ApplicationError, ports::BindingCache},
    domain::BindingDescriptor,
    error::{SplatesError, SplatesResult},
};

const FILE_PREFIX: &str = "splates_";
const FILE_SUFFIX: &str = ".json";

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    unit: String,
    generated_at: DateTime<Utc>,
    bindings: Vec<BindingDescriptor>,
}

/// Binding cache stored in a directory.
#[derive(Debug, Clone)]
pub struct FileBindingCache {
    dir: PathBuf,
}

impl FileBindingCache {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> SplatesResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            SplatesError::configuration(format!(
                "cannot create cache directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the entry for `unit`.
    pub fn entry_path(&self, unit: &str) -> PathBuf {
        let digest = Sha1::digest(unit.as_bytes());
        self.dir
            .join(format!("{FILE_PREFIX}{digest:x}{FILE_SUFFIX}"))
    }

    fn is_cache_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(FILE_SUFFIX))
    }
}

impl BindingCache for FileBindingCache {
    fn load(&self, unit: &str) -> SplatesResult<Option<Vec<BindingDescriptor>>> {
        let path = self.entry_path(unit);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_io_error(&path, e, "read cache entry")),
        };

        let entry: CacheEntry = serde_json::from_str(&raw).map_err(|e| {
            SplatesError::from(ApplicationError::CacheError {
                path: path.clone(),
                reason: format!("Corrupt cache entry: {}", e),
            })
        })?;

        // Hash collision or a renamed type: treat as a miss.
        if entry.unit != unit {
            return Ok(None);
        }

        debug!(path = %path.display(), "loaded cached bindings");
        Ok(Some(entry.bindings))
    }

    fn store(&self, unit: &str, bindings: &[BindingDescriptor]) -> SplatesResult<()> {
        let path = self.entry_path(unit);
        let entry = CacheEntry {
            unit: unit.to_owned(),
            generated_at: Utc::now(),
            bindings: bindings.to_vec(),
        };

        let json = serde_json::to_vec_pretty(&entry).map_err(|e| {
            SplatesError::from(ApplicationError::CacheError {
                path: path.clone(),
                reason: format!("Failed to encode bindings: {}", e),
            })
        })?;

        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| map_io_error(&self.dir, e, "create temporary file"))?;
        tmp.write_all(&json)
            .map_err(|e| map_io_error(tmp.path(), e, "write temporary file"))?;
        tmp.persist(&path)
            .map_err(|e| map_io_error(&path, e.error, "rename cache entry"))?;

        debug!(path = %path.display(), "stored bindings");
        Ok(())
    }

    fn clear(&self) -> SplatesResult<()> {
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                SplatesError::from(ApplicationError::CacheError {
                    path: self.dir.clone(),
                    reason: format!("Failed to list cache directory: {}", e),
                })
            })?;

            if entry.file_type().is_file() && Self::is_cache_file(entry.path()) {
                fs::remove_file(entry.path())
                    .map_err(|e| map_io_error(entry.path(), e, "remove cache entry"))?;
            }
        }
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> SplatesError {
    ApplicationError::CacheError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
