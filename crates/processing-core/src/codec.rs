//! Raster decode/encode helpers.
//!
//! PNG is the only output encoding.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use poster_common::error::{PosterError, PosterResult};
use poster_model::EncodedImage;

/// Decode an encoded handle into a pixel surface, keeping its native layout.
pub fn decode(image: &EncodedImage) -> PosterResult<DynamicImage> {
    decode_bytes(image.bytes())
}

/// Decode raw encoded bytes.
pub fn decode_bytes(bytes: &[u8]) -> PosterResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(PosterError::decode("image data is empty"));
    }
    image::load_from_memory(bytes).map_err(|e| PosterError::decode(e.to_string()))
}

/// Encode a surface as PNG.
pub fn encode_png(image: &DynamicImage) -> PosterResult<EncodedImage> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| PosterError::composition(format!("png encode failed: {e}")))?;
    Ok(EncodedImage::png(buf))
}
