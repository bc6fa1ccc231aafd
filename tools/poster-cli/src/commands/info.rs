//! Show image information.

use std::path::PathBuf;

use poster_model::{AspectMode, SourceImage};
use poster_processing::fit_centered;

pub fn run(image: PathBuf) -> anyhow::Result<()> {
    let source = SourceImage::load(&image)?;
    let encoded = source.encoded();
    let (width, height) = encoded.dimensions()?;

    println!("Image: {}", image.display());
    println!(
        "  Format: {}",
        encoded
            .format()
            .map(|f| format!("{f:?}"))
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!("  Size: {} bytes", encoded.len());
    println!("  Dimensions: {width}x{height}");
    println!();

    println!("Fitted crops:");
    for mode in [AspectMode::Landscape, AspectMode::Portrait] {
        let rect = fit_centered(width, height, mode)?;
        let (out_w, out_h) = mode.output_size();
        println!(
            "  {mode}: {}x{} at ({}, {}) → {out_w}x{out_h} poster",
            rect.width, rect.height, rect.x, rect.y
        );
    }

    Ok(())
}
