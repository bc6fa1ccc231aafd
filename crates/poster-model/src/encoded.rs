//! Opaque encoded-image handles.
//!
//! Every image that moves between the pipeline stages is carried as encoded
//! bytes. Handles are immutable and cheap to clone.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use ::image::{ImageFormat, ImageReader};
use poster_common::error::{PosterError, PosterResult};

use crate::aspect::AspectMode;
use crate::crop::CropRectangle;

/// Encoded raster bytes with the sniffed container format.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data: Arc<[u8]>,
    format: Option<ImageFormat>,
}

impl EncodedImage {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        let data = data.into();
        let format = ::image::guess_format(&data).ok();
        Self { data, format }
    }

    /// Bytes known to be PNG.
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            data: data.into(),
            format: Some(ImageFormat::Png),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the bytes, for moving into blocking tasks.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Container format detected from the magic bytes, if recognized.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Pixel dimensions read from the image header without a full decode.
    pub fn dimensions(&self) -> PosterResult<(u32, u32)> {
        let reader = ImageReader::new(Cursor::new(self.bytes()))
            .with_guessed_format()
            .map_err(|e| PosterError::decode(format!("unreadable image header: {e}")))?;
        reader
            .into_dimensions()
            .map_err(|e| PosterError::decode(format!("unreadable image header: {e}")))
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("len", &self.data.len())
            .field("format", &self.format)
            .finish()
    }
}

/// A user-provided picture, as uploaded or captured.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: EncodedImage,
    label: Option<String>,
}

impl SourceImage {
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            image: EncodedImage::new(data),
            label: None,
        }
    }

    /// Read a picture from disk, labelled with its file name.
    pub fn load(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PosterError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path)?;
        Ok(Self {
            image: EncodedImage::new(data),
            label: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn encoded(&self) -> &EncodedImage {
        &self.image
    }
}

/// The pixels of one crop rectangle, extracted from a source image.
#[derive(Debug, Clone)]
pub struct CroppedImage {
    image: EncodedImage,
    rect: CropRectangle,
}

impl CroppedImage {
    pub fn new(image: EncodedImage, rect: CropRectangle) -> Self {
        Self { image, rect }
    }

    pub fn encoded(&self) -> &EncodedImage {
        &self.image
    }

    /// The rectangle this image was cut from.
    pub fn rect(&self) -> CropRectangle {
        self.rect
    }

    /// Pixel dimensions, equal to the rectangle's size.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.rect.width, self.rect.height)
    }
}

/// A finished poster ready for download.
#[derive(Debug, Clone)]
pub struct Poster {
    image: EncodedImage,
    mode: AspectMode,
}

impl Poster {
    pub fn new(image: EncodedImage, mode: AspectMode) -> Self {
        Self { image, mode }
    }

    pub fn encoded(&self) -> &EncodedImage {
        &self.image
    }

    pub fn mode(&self) -> AspectMode {
        self.mode
    }

    /// Pixel dimensions, fixed by the aspect mode.
    pub fn dimensions(&self) -> (u32, u32) {
        self.mode.output_size()
    }
}
