//! Engine configuration.
//!
//! [`SplatesConfig`] is loaded once at startup and handed to
//! [`crate::bootstrap::build_engine`]. The core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables prefixed `SPLATES_`, nested with `__`
//!    (`SPLATES_ENGINE__FILE_EXTENSION=xml`)
//! 2. Config file (TOML, optional)
//! 3. Built-in defaults (always present)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use splates_core::error::{SplatesError, SplatesResult};

use crate::locator::{DEFAULT_EXTENSION, Theme};

const ENV_PREFIX: &str = "SPLATES";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatesConfig {
    pub engine: EngineConfig,
    /// Theme hierarchy, least specific first. Takes precedence over
    /// `engine.template_dir` for discovery when non-empty.
    pub themes: Vec<ThemeConfig>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default template directory.
    pub template_dir: Option<PathBuf>,
    /// Extension appended to template names; empty to disable.
    pub file_extension: String,
    /// Binding cache directory; the platform cache dir when unset.
    pub cache_dir: Option<PathBuf>,
    pub cache_enabled: bool,
    pub folders: Vec<FolderConfig>,
    /// Directory served by the `asset` template function.
    pub asset_dir: Option<PathBuf>,
    /// Put the timestamp in the file name instead of the query string.
    pub asset_filename_method: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            file_extension: DEFAULT_EXTENSION.into(),
            cache_dir: None,
            cache_enabled: true,
            folders: Vec::new(),
            asset_dir: None,
            asset_filename_method: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_theme_name")]
    pub name: String,
    pub dir: PathBuf,
}

fn default_theme_name() -> String {
    Theme::DEFAULT_NAME.into()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace.
    pub verbose: u8,
    pub quiet: bool,
    pub no_color: bool,
}

impl SplatesConfig {
    /// Load configuration from defaults, `config_file` and the process
    /// environment.
    ///
    /// A missing file is not an error; `None` uses [`SplatesConfig::config_path`].
    pub fn load(config_file: Option<&Path>) -> SplatesResult<Self> {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);
        Self::load_from(&path, None)
    }

    /// Load with an explicit environment instead of the process one.
    pub fn load_from(path: &Path, env: Option<HashMap<String, String>>) -> SplatesResult<Self> {
        let build = || -> Result<Self, ConfigError> {
            Config::builder()
                .add_source(Config::try_from(&Self::default())?)
                .add_source(
                    File::from(path.to_path_buf())
                        .format(FileFormat::Toml)
                        .required(false),
                )
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true)
                        .source(env),
                )
                .build()?
                .try_deserialize()
        };

        build().map_err(|e| {
            SplatesError::configuration(format!(
                "failed to load {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.splates.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "splates", "splates")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".splates.toml"))
    }

    /// Platform cache directory for binding descriptors.
    pub fn default_cache_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "splates", "splates")
            .map(|d| d.cache_dir().join("bindings"))
            .unwrap_or_else(|| PathBuf::from(".splates-cache"))
    }

    /// Configured cache directory, or the platform default.
    pub fn cache_dir(&self) -> PathBuf {
        self.engine
            .cache_dir
            .clone()
            .unwrap_or_else(Self::default_cache_dir)
    }
}
