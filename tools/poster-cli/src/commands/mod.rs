pub mod batch;
pub mod compose;
pub mod crop;
pub mod info;
pub mod init;

use std::path::Path;
use std::time::Duration;

use poster_common::config::AppConfig;
use poster_model::{AspectMode, TemplateAsset, TemplateSet};
use poster_render::{builtin_templates, BatchFailurePolicy, BatchOptions};

/// Parse an aspect mode name.
pub fn parse_mode(name: &str) -> anyhow::Result<AspectMode> {
    name.parse::<AspectMode>().map_err(anyhow::Error::msg)
}

/// Aspect mode configured as default.
pub fn default_mode(config: &AppConfig) -> AspectMode {
    config.export.default_aspect_mode
}

/// Configured templates, falling back to the bundled one for each mode
/// without an override.
pub fn load_templates(config: &AppConfig) -> anyhow::Result<TemplateSet> {
    let paths = &config.templates;
    if let (Some(landscape), Some(portrait)) = (&paths.landscape, &paths.portrait) {
        return TemplateSet::from_files(landscape, portrait)
            .map_err(|e| anyhow::anyhow!("Failed to load configured templates: {e}"));
    }

    let mut templates = builtin_templates()?;
    for (mode, path) in [
        (AspectMode::Landscape, &paths.landscape),
        (AspectMode::Portrait, &paths.portrait),
    ] {
        if let Some(path) = path {
            templates.replace(load_template(mode, path)?);
        }
    }
    Ok(templates)
}

pub fn load_template(mode: AspectMode, path: &Path) -> anyhow::Result<TemplateAsset> {
    TemplateAsset::load(mode, path)
        .map_err(|e| anyhow::anyhow!("Failed to load template {}: {e}", path.display()))
}

/// Batch options from config, with command-line overrides.
pub fn batch_options(
    config: &AppConfig,
    policy: Option<String>,
    delay_ms: Option<u64>,
) -> anyhow::Result<BatchOptions> {
    let failure_policy = match policy {
        Some(name) => name
            .parse::<BatchFailurePolicy>()
            .map_err(anyhow::Error::msg)?,
        None => config.export.failure_policy,
    };
    Ok(BatchOptions {
        delay: Duration::from_millis(delay_ms.unwrap_or(config.export.batch_delay_ms)),
        failure_policy,
    })
}
