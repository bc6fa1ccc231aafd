//! Export every image of a manifest as a poster.

use std::path::PathBuf;

use poster_common::config::AppConfig;
use poster_common::error::PosterResult;
use poster_model::{AspectMode, LoadedManifest, ManifestEntry, SourceImage};
use poster_processing::fit_centered;
use poster_render::{
    BatchFailurePolicy, BatchProgress, BatchStage, DirectorySink, ProgressCallback,
};
use poster_session::{EditSession, SessionConfig};

use super::{batch_options, load_template, load_templates};

pub async fn run(
    config: &AppConfig,
    manifest: PathBuf,
    output: Option<PathBuf>,
    policy: Option<String>,
    delay_ms: Option<u64>,
) -> anyhow::Result<()> {
    println!("Loading manifest: {}", manifest.display());

    let loaded = LoadedManifest::load(&manifest)
        .map_err(|e| anyhow::anyhow!("Failed to load manifest: {e}"))?;
    let options = batch_options(config, policy, delay_ms)?;
    let policy = options.failure_policy;

    let missing = loaded.validate_sources();
    if !missing.is_empty() {
        for issue in &missing {
            println!("  ✗ {issue}");
        }
        if policy == BatchFailurePolicy::Abort {
            anyhow::bail!("{} source image(s) missing", missing.len());
        }
    }

    let mode = loaded.manifest.aspect_mode;
    let mut templates = load_templates(config)?;
    if let Some(path) = loaded.template_path() {
        templates.replace(load_template(mode, &path)?);
    }

    let session_config = SessionConfig {
        aspect_mode: mode,
        batch: options,
    };
    let mut session = EditSession::new(session_config, templates);

    let total = loaded.manifest.entries.len();
    let mut skipped = 0;
    for (index, entry) in loaded.manifest.entries.iter().enumerate() {
        match stage_entry(&mut session, &loaded, entry, mode).await {
            Ok((width, height)) => {
                println!("  ✓ {} → {width}x{height}", entry.source.display());
            }
            Err(e) => match policy {
                BatchFailurePolicy::Abort => anyhow::bail!(
                    "Entry {}/{total} ({}) failed: {e}",
                    index + 1,
                    entry.source.display()
                ),
                BatchFailurePolicy::SkipAndContinue => {
                    tracing::warn!(
                        entry = %entry.source.display(),
                        error = %e,
                        "Skipping manifest entry"
                    );
                    println!("  ✗ {}: {e}", entry.source.display());
                    skipped += 1;
                }
            },
        }
    }

    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
    let mut sink = DirectorySink::new(&output_dir)?;
    println!("Exporting {mode} posters to {}", output_dir.display());

    let progress: ProgressCallback = Box::new(|p: BatchProgress| {
        if p.stage == BatchStage::Composing {
            println!("  Poster {}/{}", p.completed + 1, p.total);
        }
    });
    let report = session.export_all(&mut sink, Some(progress)).await?;

    println!();
    println!("Delivered: {}", report.delivered.len());
    for delivered in &report.delivered {
        println!("  {}", delivered.file_name);
    }
    if skipped > 0 {
        println!("Skipped entries: {skipped}");
    }
    if !report.failed.is_empty() {
        println!("Failed: {}", report.failed.len());
        for failed in &report.failed {
            println!("  {}: {}", failed.file_name, failed.message);
        }
    }

    Ok(())
}

/// Load, crop and commit one manifest entry. A failed entry leaves nothing
/// behind in the session.
async fn stage_entry(
    session: &mut EditSession,
    loaded: &LoadedManifest,
    entry: &ManifestEntry,
    mode: AspectMode,
) -> PosterResult<(u32, u32)> {
    let source = SourceImage::load(loaded.source_path(entry))?;
    let (width, height) = source.encoded().dimensions()?;
    let rect = match entry.crop.resolve(width, height) {
        Some(rect) => rect,
        None => fit_centered(width, height, mode)?,
    };

    let id = session.add_source(source);
    let committed = match session.update_crop(id, rect, 1.0) {
        Ok(()) => session.commit_crop(id).await,
        Err(e) => Err(e),
    };
    match committed {
        Ok(cropped) => Ok(cropped.dimensions()),
        Err(e) => {
            session.remove(id)?;
            Err(e)
        }
    }
}
