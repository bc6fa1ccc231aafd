//! Aspect-constrained crop rectangles.
//!
//! Interactive cropping widgets keep the crop at the output aspect ratio
//! themselves. These helpers produce the same kind of rectangle for front
//! ends without a widget (CLI, batch manifests).

use poster_common::error::{PosterError, PosterResult};
use poster_model::{AspectMode, CropRectangle};

/// Largest crop with the mode's aspect ratio, centered in the image.
pub fn fit_centered(
    image_width: u32,
    image_height: u32,
    mode: AspectMode,
) -> PosterResult<CropRectangle> {
    let (w, h) = fitted_size(image_width, image_height, mode)?;
    Ok(place(
        image_width,
        image_height,
        w,
        h,
        image_width as f64 / 2.0,
        image_height as f64 / 2.0,
    ))
}

/// Shrink `rect` about its center to the mode's aspect ratio and shift it
/// back inside the image.
pub fn constrain_to_aspect(
    rect: CropRectangle,
    image_width: u32,
    image_height: u32,
    mode: AspectMode,
) -> PosterResult<CropRectangle> {
    ensure_image(image_width, image_height)?;

    if rect.width == 0 || rect.height == 0 || rect.x >= image_width || rect.y >= image_height {
        return Err(PosterError::invalid_rectangle(format!(
            "[{}, {}, {}x{}] does not overlap the {}x{} image",
            rect.x, rect.y, rect.width, rect.height, image_width, image_height
        )));
    }

    // Clip to the image first so the result can never grow past it.
    let left = rect.x;
    let top = rect.y;
    let right = rect.right().min(image_width as u64) as u32;
    let bottom = rect.bottom().min(image_height as u64) as u32;

    let (w, h) = fitted_size(right - left, bottom - top, mode)?;
    let cx = (left as f64 + right as f64) / 2.0;
    let cy = (top as f64 + bottom as f64) / 2.0;
    Ok(place(image_width, image_height, w, h, cx, cy))
}

/// Crop a widget would report at `zoom` (1.0 shows the whole fitted crop)
/// around a normalized center point.
pub fn zoomed(
    image_width: u32,
    image_height: u32,
    mode: AspectMode,
    zoom: f64,
    center: (f64, f64),
) -> PosterResult<CropRectangle> {
    let (base_w, base_h) = fitted_size(image_width, image_height, mode)?;
    let zoom = if zoom.is_finite() { zoom.max(1.0) } else { 1.0 };

    let w = ((base_w as f64 / zoom).round() as u32).clamp(1, base_w);
    let h = ((base_h as f64 / zoom).round() as u32).clamp(1, base_h);
    let cx = center.0.clamp(0.0, 1.0) * image_width as f64;
    let cy = center.1.clamp(0.0, 1.0) * image_height as f64;
    Ok(place(image_width, image_height, w, h, cx, cy))
}

fn ensure_image(image_width: u32, image_height: u32) -> PosterResult<()> {
    if image_width == 0 || image_height == 0 {
        return Err(PosterError::invalid_rectangle(format!(
            "cannot crop an empty {image_width}x{image_height} image"
        )));
    }
    Ok(())
}

/// Largest `(w, h)` of the mode's ratio fitting in `width x height`.
fn fitted_size(width: u32, height: u32, mode: AspectMode) -> PosterResult<(u32, u32)> {
    ensure_image(width, height)?;
    let ratio = mode.ratio();
    let available = width as f64 / height as f64;

    if available > ratio {
        let w = ((height as f64 * ratio).round() as u32).clamp(1, width);
        Ok((w, height))
    } else {
        let h = ((width as f64 / ratio).round() as u32).clamp(1, height);
        Ok((width, h))
    }
}

/// Position a `w x h` box centered on `(cx, cy)`, kept inside the image.
fn place(image_width: u32, image_height: u32, w: u32, h: u32, cx: f64, cy: f64) -> CropRectangle {
    let x = (cx - w as f64 / 2.0)
        .round()
        .clamp(0.0, (image_width - w) as f64) as u32;
    let y = (cy - h as f64 / 2.0)
        .round()
        .clamp(0.0, (image_height - h) as f64) as u32;
    CropRectangle::new(x, y, w, h)
}
