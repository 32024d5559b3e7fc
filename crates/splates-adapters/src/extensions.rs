//! Bundled template function extensions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use splates_core::{
    application::{Engine, Extension},
    domain::{BoxError, Value},
    error::SplatesResult,
};

/// Registers `asset(url)`: a cache-busting URL carrying the file's
/// modification time.
///
/// `css/app.css` becomes `css/app.css?v=1700000000`, or
/// `css/app.1700000000.css` with the filename method.
#[derive(Debug, Clone)]
pub struct AssetExtension {
    path: PathBuf,
    filename_method: bool,
}

impl AssetExtension {
    pub fn new(path: impl Into<PathBuf>, filename_method: bool) -> Self {
        Self {
            path: path.into(),
            filename_method,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Versioned URL of `url`, failing if the file does not exist.
    pub fn cached_asset_url(&self, url: &str) -> Result<String, BoxError> {
        let file = self.path.join(url.trim_start_matches('/'));
        let modified = fs::metadata(&file)
            .and_then(|meta| meta.modified())
            .map_err(|_| {
                format!(
                    "Unable to locate the asset \"{}\" in the \"{}\" directory.",
                    url,
                    self.path.display()
                )
            })?;
        let stamp = DateTime::<Utc>::from(modified).timestamp();

        let url_path = Path::new(url);
        let directory = match url_path.parent().and_then(Path::to_str) {
            None | Some("") => String::new(),
            Some("/") => "/".to_owned(),
            Some(dir) => format!("{dir}/"),
        };
        let stem = url_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = url_path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(if self.filename_method {
            format!("{directory}{stem}.{stamp}.{extension}")
        } else {
            format!("{directory}{stem}.{extension}?v={stamp}")
        })
    }
}

impl Extension for AssetExtension {
    fn register(&self, engine: &Engine) -> SplatesResult<()> {
        let assets = self.clone();
        engine.register_function("asset", move |args| {
            let url = string_arg("asset", args)?;
            Ok(Value::from(assets.cached_asset_url(url)?))
        })
    }
}

/// Registers `uri(path)`, returning the path unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriExtension;

impl Extension for UriExtension {
    fn register(&self, engine: &Engine) -> SplatesResult<()> {
        engine.register_function("uri", |args| {
            Ok(Value::from(string_arg("uri", args)?))
        })
    }
}

fn string_arg<'a>(function: &str, args: &'a [Value]) -> Result<&'a str, BoxError> {
    args.first()
        .and_then(Value::as_str)
        .ok_or_else(|| format!("{function}() expects a string as its first argument").into())
}
