//! Crop rectangle types.
//!
//! [`CropRectangle`] is in source-image pixels; [`NormalizedCrop`] is in
//! `[0.0, 1.0]` relative to the source, as cropping widgets usually report.

use poster_common::error::{PosterError, PosterResult};
use serde::{Deserialize, Serialize};

/// An axis-aligned region of a source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRectangle {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CropRectangle {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from signed coordinates reported by a collaborator.
    ///
    /// Negative origins and non-positive sizes are rejected.
    pub fn from_signed(x: i64, y: i64, width: i64, height: i64) -> PosterResult<Self> {
        if x < 0 || y < 0 {
            return Err(PosterError::invalid_rectangle(format!(
                "origin ({x}, {y}) is negative"
            )));
        }
        if width <= 0 || height <= 0 {
            return Err(PosterError::invalid_rectangle(format!(
                "size {width}x{height} is not positive"
            )));
        }
        let to_u32 = |v: i64| {
            u32::try_from(v)
                .map_err(|_| PosterError::invalid_rectangle(format!("{v} exceeds pixel range")))
        };
        Ok(Self::new(
            to_u32(x)?,
            to_u32(y)?,
            to_u32(width)?,
            to_u32(height)?,
        ))
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Pixel count, without overflow.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width divided by height, `0.0` for a degenerate rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Check that the rectangle is non-empty and lies within an image of
    /// the given dimensions.
    pub fn validate_within(&self, image_width: u32, image_height: u32) -> PosterResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PosterError::invalid_rectangle(format!(
                "size {}x{} is not positive",
                self.width, self.height
            )));
        }
        if self.right() > image_width as u64 || self.bottom() > image_height as u64 {
            return Err(PosterError::invalid_rectangle(format!(
                "[{}, {}, {}x{}] exceeds image bounds {}x{}",
                self.x, self.y, self.width, self.height, image_width, image_height
            )));
        }
        Ok(())
    }
}

/// A crop expressed relative to the source image.
///
/// `(0.0, 0.0)` is top-left, `(1.0, 1.0)` is bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCrop {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl NormalizedCrop {
    /// The whole image.
    pub const FULL: NormalizedCrop = NormalizedCrop {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    /// Create a crop, clamping values to the valid range. Non-finite values
    /// become `0.0`.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: unit(x),
            y: unit(y),
            w: unit(w),
            h: unit(h),
        }
    }

    /// Create a crop centered at `(cx, cy)`, shifted to stay inside `[0, 1]`.
    pub fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        let w = unit(w);
        let h = unit(h);
        let x = (cx - w / 2.0).clamp(0.0, 1.0 - w);
        let y = (cy - h / 2.0).clamp(0.0, 1.0 - h);
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Convert to pixels for an image of the given size.
    ///
    /// Edges are rounded to the nearest pixel, the result is kept inside the
    /// image and is at least one pixel in each direction.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> CropRectangle {
        let iw = image_width.max(1) as f64;
        let ih = image_height.max(1) as f64;
        let Self { x, y, w, h } = Self::new(self.x, self.y, self.w, self.h);

        let left = (x * iw).round().clamp(0.0, iw - 1.0);
        let top = (y * ih).round().clamp(0.0, ih - 1.0);
        let right = ((x + w) * iw).round().clamp(left + 1.0, iw);
        let bottom = ((y + h) * ih).round().clamp(top + 1.0, ih);

        CropRectangle::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
    }

    /// Express a pixel rectangle relative to an image of the given size.
    pub fn from_pixels(rect: &CropRectangle, image_width: u32, image_height: u32) -> Self {
        let iw = image_width.max(1) as f64;
        let ih = image_height.max(1) as f64;
        Self::new(
            rect.x as f64 / iw,
            rect.y as f64 / ih,
            rect.width as f64 / iw,
            rect.height as f64 / ih,
        )
    }
}

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Default for NormalizedCrop {
    fn default() -> Self {
        Self::FULL
    }
}

/// One update from the interactive cropping collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropUpdate {
    /// Crop in source pixels.
    pub rect: CropRectangle,
    /// Widget zoom level (1.0 = whole image visible).
    pub zoom: f64,
}

impl CropUpdate {
    pub fn new(rect: CropRectangle, zoom: f64) -> Self {
        Self { rect, zoom }
    }
}
