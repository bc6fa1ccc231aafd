//! Bundled template overlays.
//!
//! The default templates are drawn in code at each mode's output size: an
//! opaque paper frame with a wider caption band at the bottom, a thin accent
//! rule around the photo window, and a fully transparent window in the middle.

use image::{DynamicImage, Rgba, RgbaImage};
use poster_common::error::PosterResult;
use poster_model::{AspectMode, TemplateAsset, TemplateSet};
use poster_processing::codec;

const PAPER: Rgba<u8> = Rgba([246, 241, 231, 255]);
const ACCENT: Rgba<u8> = Rgba([178, 58, 46, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Frame width as a fraction of the shorter canvas side.
const FRAME_RATIO: f64 = 0.05;
/// Caption band height as a fraction of the canvas height.
const CAPTION_RATIO: f64 = 0.14;
/// Accent rule thickness in pixels.
const ACCENT_PX: u32 = 4;

/// Geometry of the transparent photo window of a bundled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoWindow {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PhotoWindow {
    /// Window for a canvas of the given size.
    pub fn for_size(width: u32, height: u32) -> Self {
        let frame = (width.min(height) as f64 * FRAME_RATIO).round() as u32;
        let caption = (height as f64 * CAPTION_RATIO).round() as u32;
        Self {
            left: frame,
            top: frame,
            right: width - frame,
            bottom: height - caption,
        }
    }

    /// Whether `(x, y)` is inside the transparent window.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    fn on_accent(&self, x: u32, y: u32) -> bool {
        let inside_outer = x + ACCENT_PX >= self.left
            && x < self.right + ACCENT_PX
            && y + ACCENT_PX >= self.top
            && y < self.bottom + ACCENT_PX;
        inside_outer && !self.contains(x, y)
    }
}

/// Draw the bundled template for one mode.
pub fn render_builtin(mode: AspectMode) -> RgbaImage {
    let (width, height) = mode.output_size();
    let window = PhotoWindow::for_size(width, height);

    RgbaImage::from_fn(width, height, |x, y| {
        if window.contains(x, y) {
            CLEAR
        } else if window.on_accent(x, y) {
            ACCENT
        } else {
            PAPER
        }
    })
}

/// Build the bundled template set, one PNG-encoded overlay per mode.
pub fn builtin_templates() -> PosterResult<TemplateSet> {
    let encode = |mode: AspectMode| -> PosterResult<TemplateAsset> {
        let encoded = codec::encode_png(&DynamicImage::ImageRgba8(render_builtin(mode)))?;
        tracing::debug!(%mode, bytes = encoded.len(), "Built bundled template");
        Ok(TemplateAsset::new(mode, encoded))
    };
    TemplateSet::new(encode(AspectMode::Landscape)?, encode(AspectMode::Portrait)?)
}
