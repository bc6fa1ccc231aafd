//! Create a batch manifest.

use std::path::{Path, PathBuf};

use poster_model::{AspectMode, BatchManifest, LoadedManifest, ManifestCrop, SourceImage};
use poster_processing::fit_centered;

pub fn run(manifest: PathBuf, images: Vec<PathBuf>, portrait: bool) -> anyhow::Result<()> {
    let mode = if portrait {
        AspectMode::Portrait
    } else {
        AspectMode::Landscape
    };
    let root = manifest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("Creating {mode} manifest at {}", manifest.display());

    let mut batch = BatchManifest::new(mode);
    for image in &images {
        let (width, height) = SourceImage::load(image)?.encoded().dimensions()?;
        let rect = fit_centered(width, height, mode)?;

        let source = relative_to(image, &root);
        println!(
            "  {}: {}x{} at ({}, {})",
            source.display(),
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
        batch.push(source, ManifestCrop::Pixels(rect));
    }

    LoadedManifest::save(&batch, &manifest)
        .map_err(|e| anyhow::anyhow!("Failed to write manifest: {e}"))?;

    println!("Manifest written with {} image(s)", batch.entries.len());
    Ok(())
}

/// Path of `image` relative to `root` when it lies below it.
fn relative_to(image: &Path, root: &Path) -> PathBuf {
    let absolute = |p: &Path| std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    let image_abs = absolute(image);
    let root_abs = absolute(root);
    image_abs
        .strip_prefix(&root_abs)
        .map(Path::to_path_buf)
        .unwrap_or(image_abs)
}
