//! Crop extraction.

use poster_common::error::{PosterError, PosterResult};
use poster_model::{CropRectangle, CroppedImage, SourceImage};

use crate::codec;

/// Copy `rect` out of `source` into a new PNG image of exactly
/// `rect.width x rect.height` pixels.
///
/// No scaling and no aspect correction are applied; constraining the
/// rectangle's shape is the caller's job.
pub fn extract_crop(
    source: &SourceImage,
    rect: Option<CropRectangle>,
) -> PosterResult<CroppedImage> {
    let rect = rect.ok_or_else(|| PosterError::invalid_rectangle("no crop rectangle selected"))?;
    if rect.width == 0 || rect.height == 0 {
        return Err(PosterError::invalid_rectangle(format!(
            "size {}x{} is not positive",
            rect.width, rect.height
        )));
    }

    let decoded = codec::decode(source.encoded())?;
    rect.validate_within(decoded.width(), decoded.height())?;

    let region = decoded.crop_imm(rect.x, rect.y, rect.width, rect.height);
    let encoded = codec::encode_png(&region)?;

    tracing::debug!(
        source_width = decoded.width(),
        source_height = decoded.height(),
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        area = rect.area(),
        bytes = encoded.len(),
        "Extracted crop"
    );

    Ok(CroppedImage::new(encoded, rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
    use proptest::prelude::*;

    /// Source whose every pixel encodes its own coordinates.
    fn coordinate_source(width: u32, height: u32) -> SourceImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        let encoded = codec::encode_png(&DynamicImage::ImageRgba8(img)).unwrap();
        SourceImage::from_bytes(encoded.bytes().to_vec())
    }

    #[test]
    fn test_scenario_800x600() {
        let source = coordinate_source(800, 600);
        let rect = CropRectangle::new(100, 50, 400, 450);
        let cropped = extract_crop(&source, Some(rect)).unwrap();

        assert_eq!(cropped.dimensions(), (400, 450));
        let decoded = codec::decode(cropped.encoded()).unwrap();
        assert_eq!(decoded.dimensions(), (400, 450));
    }

    #[test]
    fn test_pixels_are_copied_without_scaling() {
        let source = coordinate_source(64, 48);
        let rect = CropRectangle::new(10, 5, 20, 30);
        let cropped = extract_crop(&source, Some(rect)).unwrap();
        let decoded = codec::decode(cropped.encoded()).unwrap().to_rgba8();

        for (x, y, px) in decoded.enumerate_pixels() {
            let sx = x + rect.x;
            let sy = y + rect.y;
            assert_eq!(px.0, [sx as u8, sy as u8, (sx + sy) as u8, 255]);
        }
    }

    #[test]
    fn test_missing_rectangle_is_invalid() {
        let source = coordinate_source(8, 8);
        assert!(extract_crop(&source, None)
            .unwrap_err()
            .is_invalid_rectangle());
    }

    #[test]
    fn test_out_of_bounds_is_invalid() {
        let source = coordinate_source(800, 600);
        let err = extract_crop(&source, Some(CropRectangle::new(500, 300, 400, 301))).unwrap_err();
        assert!(err.is_invalid_rectangle());
    }

    #[test]
    fn test_undecodable_source() {
        let source = SourceImage::from_bytes(b"not a picture".to_vec());
        let err = extract_crop(&source, Some(CropRectangle::new(0, 0, 1, 1))).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_rgb_source_keeps_native_layout() {
        let img = image::RgbImage::from_pixel(6, 4, image::Rgb([200, 100, 50]));
        let encoded = codec::encode_png(&DynamicImage::ImageRgb8(img)).unwrap();
        let source = SourceImage::from_bytes(encoded.bytes().to_vec());

        let cropped = extract_crop(&source, Some(CropRectangle::new(1, 1, 2, 2))).unwrap();
        let decoded = codec::decode(cropped.encoded()).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageRgb8(_)));
        assert_eq!(decoded.to_rgb8().get_pixel(0, 0).0, [200, 100, 50]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_valid_rect_yields_rect_dimensions(
            x in 0u32..40,
            y in 0u32..30,
            w in 1u32..40,
            h in 1u32..30,
        ) {
            let source = coordinate_source(80, 60);
            let rect = CropRectangle::new(x, y, w, h);
            let cropped = extract_crop(&source, Some(rect)).unwrap();
            let decoded = codec::decode(cropped.encoded()).unwrap();
            prop_assert_eq!(decoded.dimensions(), (w, h));
        }

        #[test]
        fn prop_invalid_rect_rejected(
            x in 0u32..200,
            y in 0u32..200,
            w in 0u32..200,
            h in 0u32..200,
        ) {
            prop_assume!(w == 0 || h == 0 || x + w > 80 || y + h > 60);
            let source = coordinate_source(80, 60);
            let err = extract_crop(&source, Some(CropRectangle::new(x, y, w, h))).unwrap_err();
            prop_assert!(err.is_invalid_rectangle());
        }

        #[test]
        fn prop_negative_origin_rejected(
            x in -500i64..0,
            y in 0i64..10,
            w in 1i64..10,
            h in 1i64..10,
        ) {
            prop_assert!(CropRectangle::from_signed(x, y, w, h)
                .unwrap_err()
                .is_invalid_rectangle());
        }
    }
}
