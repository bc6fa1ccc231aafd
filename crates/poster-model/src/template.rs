//! Template overlays.

use std::path::Path;

use poster_common::error::{PosterError, PosterResult};

use crate::aspect::AspectMode;
use crate::encoded::EncodedImage;

/// A decorative overlay image bound to one aspect mode.
#[derive(Debug, Clone)]
pub struct TemplateAsset {
    mode: AspectMode,
    image: EncodedImage,
}

impl TemplateAsset {
    pub fn new(mode: AspectMode, image: EncodedImage) -> Self {
        Self { mode, image }
    }

    pub fn load(mode: AspectMode, path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PosterError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path)?;
        tracing::debug!(%mode, path = %path.display(), bytes = data.len(), "Loaded template");
        Ok(Self::new(mode, EncodedImage::new(data)))
    }

    pub fn mode(&self) -> AspectMode {
        self.mode
    }

    pub fn encoded(&self) -> &EncodedImage {
        &self.image
    }
}

/// One template per aspect mode, shared by every poster of a session.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    landscape: TemplateAsset,
    portrait: TemplateAsset,
}

impl TemplateSet {
    /// Build a set, checking that each asset is bound to the slot it fills.
    pub fn new(landscape: TemplateAsset, portrait: TemplateAsset) -> PosterResult<Self> {
        if landscape.mode() != AspectMode::Landscape || portrait.mode() != AspectMode::Portrait {
            return Err(PosterError::config(
                "template set needs one landscape and one portrait template",
            ));
        }
        Ok(Self {
            landscape,
            portrait,
        })
    }

    /// Load both templates from image files.
    pub fn from_files(
        landscape: impl AsRef<Path>,
        portrait: impl AsRef<Path>,
    ) -> PosterResult<Self> {
        Self::new(
            TemplateAsset::load(AspectMode::Landscape, landscape)?,
            TemplateAsset::load(AspectMode::Portrait, portrait)?,
        )
    }

    pub fn for_mode(&self, mode: AspectMode) -> &TemplateAsset {
        match mode {
            AspectMode::Landscape => &self.landscape,
            AspectMode::Portrait => &self.portrait,
        }
    }

    /// Replace the template of one mode.
    pub fn replace(&mut self, template: TemplateAsset) {
        match template.mode() {
            AspectMode::Landscape => self.landscape = template,
            AspectMode::Portrait => self.portrait = template,
        }
    }
}
