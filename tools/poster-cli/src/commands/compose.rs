//! Compose a poster from a cropped image.

use std::path::PathBuf;

use poster_common::config::AppConfig;
use poster_model::{AspectMode, CropRectangle, CroppedImage, SourceImage};
use poster_render::compose_poster;

use super::{default_mode, load_template, load_templates};

pub async fn run(
    config: &AppConfig,
    cropped: PathBuf,
    template: Option<PathBuf>,
    portrait: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mode = if portrait {
        AspectMode::Portrait
    } else {
        default_mode(config)
    };

    let source = SourceImage::load(&cropped)?;
    let (width, height) = source.encoded().dimensions()?;
    let cropped_image = CroppedImage::new(
        source.encoded().clone(),
        CropRectangle::new(0, 0, width, height),
    );

    let template = match template {
        Some(path) => load_template(mode, &path)?,
        None => load_templates(config)?.for_mode(mode).clone(),
    };

    let (out_w, out_h) = mode.output_size();
    println!("Composing {} poster ({out_w}x{out_h})", mode);

    let poster = compose_poster(&cropped_image, &template, mode).await?;

    let output_path = match output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(&config.output_dir)?;
            config.output_dir.join("poster.png")
        }
    };
    std::fs::write(&output_path, poster.encoded().bytes())?;
    println!("Poster saved: {}", output_path.display());
    Ok(())
}
