//! Poster compositor: stretches the crop to the canvas and overlays the
//! template on top.

use std::borrow::Cow;
use std::future::Future;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use poster_common::error::{PosterError, PosterResult};
use poster_model::{AspectMode, CroppedImage, EncodedImage, Poster, TemplateAsset};
use poster_processing::codec;

/// Filter used to stretch the crop onto the canvas.
const CROP_FILTER: FilterType = FilterType::Triangle;

/// Filter used to stretch the template. Every output pixel copies exactly one
/// template pixel, so opaque template pixels stay fully opaque.
const OVERLAY_FILTER: FilterType = FilterType::Nearest;

/// Opaque backdrop under the crop, visible only through transparent crop pixels.
const BACKDROP: [u8; 3] = [0, 0, 0];

/// Compose a poster from a committed crop and a template.
///
/// The two images are decoded concurrently. Drawing waits for both and the
/// first decode failure fails the whole call.
pub async fn compose_poster(
    cropped: &CroppedImage,
    template: &TemplateAsset,
    mode: AspectMode,
) -> PosterResult<Poster> {
    if template.mode() != mode {
        tracing::debug!(
            template_mode = %template.mode(),
            %mode,
            "Template bound to another mode, stretching anyway"
        );
    }

    compose_decoded(
        decode_layer("cropped", cropped.encoded()),
        decode_layer("template", template.encoded()),
        mode,
    )
    .await
}

/// Join two decode operations, then render.
///
/// Each future yields one decoded layer. They are polled concurrently and the
/// cropped layer is always drawn first, whichever finishes first.
pub async fn compose_decoded<C, T>(cropped: C, template: T, mode: AspectMode) -> PosterResult<Poster>
where
    C: Future<Output = PosterResult<RgbaImage>>,
    T: Future<Output = PosterResult<RgbaImage>>,
{
    let (cropped, template) = tokio::try_join!(cropped, template)?;

    tokio::task::spawn_blocking(move || render_poster(&cropped, &template, mode))
        .await
        .map_err(|e| PosterError::composition(format!("render task failed: {e}")))?
}

/// Decode one layer on the blocking pool.
async fn decode_layer(label: &'static str, image: &EncodedImage) -> PosterResult<RgbaImage> {
    let bytes = image.shared_bytes();
    let decoded = tokio::task::spawn_blocking(move || codec::decode_bytes(&bytes))
        .await
        .map_err(|e| PosterError::composition(format!("{label} decode task failed: {e}")))?;

    match decoded {
        Ok(image) => {
            tracing::debug!(
                layer = label,
                width = image.width(),
                height = image.height(),
                "Decoded layer"
            );
            Ok(image.to_rgba8())
        }
        Err(PosterError::Decode { message }) => {
            Err(PosterError::decode(format!("{label} image: {message}")))
        }
        Err(other) => Err(other),
    }
}

/// Draw `cropped` then `template` onto a canvas of the mode's size and encode
/// the flattened result as PNG.
pub fn render_poster(
    cropped: &RgbaImage,
    template: &RgbaImage,
    mode: AspectMode,
) -> PosterResult<Poster> {
    let (width, height) = mode.output_size();
    for (label, layer) in [("cropped", cropped), ("template", template)] {
        if layer.width() == 0 || layer.height() == 0 {
            return Err(PosterError::composition(format!(
                "{label} layer is empty ({}x{})",
                layer.width(),
                layer.height()
            )));
        }
    }

    let mut canvas = allocate_canvas(width, height)?;
    let base = stretch(cropped, width, height, CROP_FILTER);
    let overlay = stretch(template, width, height, OVERLAY_FILTER);

    for ((dst, under), over) in canvas
        .pixels_mut()
        .zip(base.pixels())
        .zip(overlay.pixels())
    {
        let backdrop = blend(BACKDROP, under);
        *dst = Rgb(blend(backdrop, over));
    }

    let encoded = codec::encode_png(&DynamicImage::ImageRgb8(canvas))?;
    tracing::debug!(%mode, width, height, bytes = encoded.len(), "Rendered poster");
    Ok(Poster::new(encoded, mode))
}

fn allocate_canvas(width: u32, height: u32) -> PosterResult<RgbImage> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3))
        .ok_or_else(|| PosterError::composition(format!("canvas {width}x{height} is too large")))?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        PosterError::composition(format!("cannot allocate {width}x{height} canvas: {e}"))
    })?;
    buf.resize(len, 0);

    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| PosterError::composition("canvas buffer size mismatch"))
}

/// Resize a layer to exactly fill the canvas, ignoring its aspect ratio.
fn stretch(layer: &RgbaImage, width: u32, height: u32, filter: FilterType) -> Cow<'_, RgbaImage> {
    if layer.dimensions() == (width, height) {
        Cow::Borrowed(layer)
    } else {
        Cow::Owned(imageops::resize(layer, width, height, filter))
    }
}

/// Source-over of a straight-alpha pixel onto an opaque one.
fn blend(dst: [u8; 3], src: &Rgba<u8>) -> [u8; 3] {
    let [r, g, b, a] = src.0;
    match a {
        255 => [r, g, b],
        0 => dst,
        _ => {
            let a = u16::from(a);
            let inv = 255 - a;
            [
                mix(r, dst[0], a, inv),
                mix(g, dst[1], a, inv),
                mix(b, dst[2], a, inv),
            ]
        }
    }
}

fn mix(src: u8, dst: u8, a: u16, inv: u16) -> u8 {
    ((u32::from(src) * u32::from(a) + u32::from(dst) * u32::from(inv) + 127) / 255) as u8
}
