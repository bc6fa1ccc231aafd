//! Cut a rectangle out of an image.

use std::path::{Path, PathBuf};

use poster_model::{AspectMode, CropRectangle, SourceImage};
use poster_processing::fit_centered;
use poster_session::extract_crop_async;

/// Which part of the image to keep.
pub enum Region {
    Explicit {
        x: Option<i64>,
        y: Option<i64>,
        width: Option<i64>,
        height: Option<i64>,
    },
    Fit(AspectMode),
}

pub async fn run(image: PathBuf, region: Region, output: Option<PathBuf>) -> anyhow::Result<()> {
    let source = SourceImage::load(&image)?;
    let (width, height) = source.encoded().dimensions()?;
    println!("Cropping {} ({width}x{height})", image.display());

    let rect = match region {
        Region::Fit(mode) => fit_centered(width, height, mode)?,
        Region::Explicit {
            x,
            y,
            width: w,
            height: h,
        } => CropRectangle::from_signed(
            x.unwrap_or(0),
            y.unwrap_or(0),
            w.unwrap_or(i64::from(width)),
            h.unwrap_or(i64::from(height)),
        )?,
    };
    println!(
        "  Rectangle: {}x{} at ({}, {})",
        rect.width, rect.height, rect.x, rect.y
    );

    let cropped = extract_crop_async(source, Some(rect)).await?;

    let output_path = output.unwrap_or_else(|| default_output(&image));
    std::fs::write(&output_path, cropped.encoded().bytes())?;

    let (cw, ch) = cropped.dimensions();
    println!("Saved {cw}x{ch} crop to {}", output_path.display());
    Ok(())
}

/// `<dir>/<stem>-crop.png` next to the input.
fn default_output(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("{stem}-crop.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("/photos/beach.jpg")),
            PathBuf::from("/photos/beach-crop.png")
        );
    }
}
