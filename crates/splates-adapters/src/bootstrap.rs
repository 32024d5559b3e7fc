//! Composition root: builds an [`Engine`] from [`SplatesConfig`].

use std::sync::Arc;

use tracing::{debug, info};

use splates_core::{
    application::{Engine, TemplateLocator},
    error::SplatesResult,
};

use crate::binding_cache::FileBindingCache;
use crate::config::SplatesConfig;
use crate::extensions::AssetExtension;
use crate::locator::{FolderLocator, Theme, ThemeLocator};

/// Wire the binding cache, template discovery and bundled extensions.
///
/// Themes win over `template_dir` when both are configured. Without either,
/// the engine only knows templates registered by name.
pub fn build_engine(config: &SplatesConfig) -> SplatesResult<Engine> {
    let mut builder = Engine::builder();

    if config.engine.cache_enabled {
        let cache = FileBindingCache::new(config.cache_dir())?;
        debug!(dir = %cache.dir().display(), "binding cache enabled");
        builder = builder.binding_cache(Arc::new(cache));
    }

    if let Some(locator) = build_locator(config)? {
        builder = builder.locator(locator);
    }

    let engine = builder.build();

    if let Some(dir) = &config.engine.asset_dir {
        engine.load_extension(&AssetExtension::new(
            dir,
            config.engine.asset_filename_method,
        ))?;
    }

    info!(
        themes = config.themes.len(),
        folders = config.engine.folders.len(),
        "engine ready"
    );
    Ok(engine)
}

/// The locator described by `config`, if any.
pub fn build_locator(config: &SplatesConfig) -> SplatesResult<Option<Arc<dyn TemplateLocator>>> {
    let extension = config.engine.file_extension.as_str();

    if !config.themes.is_empty() {
        let themes = config
            .themes
            .iter()
            .map(|theme| Theme::new(&theme.dir, theme.name.as_str()))
            .collect();
        let theme = Theme::hierarchy(themes)?;
        return Ok(Some(Arc::new(ThemeLocator::new(theme, extension))));
    }

    if config.engine.template_dir.is_none() && config.engine.folders.is_empty() {
        return Ok(None);
    }

    let mut locator =
        FolderLocator::new(config.engine.template_dir.clone())?.with_extension(extension);
    for folder in &config.engine.folders {
        locator.add_folder(folder.name.as_str(), &folder.path, folder.fallback)?;
    }
    Ok(Some(Arc::new(locator)))
}
