//! Batch manifest files.
//!
//! A manifest lists the images of a batch job together with the crop to
//! apply to each, so a batch can be replayed without interactive cropping.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aspect::AspectMode;
use crate::crop::{CropRectangle, NormalizedCrop};

/// Top-level manifest file (`manifest.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    /// Schema version.
    pub version: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Output shape for every poster of the batch.
    #[serde(default)]
    pub aspect_mode: AspectMode,

    /// Optional template override for the chosen mode.
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Images in export order.
    pub entries: Vec<ManifestEntry>,
}

/// One image of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path to the source image, relative to the manifest's directory.
    pub source: PathBuf,

    /// Crop to apply.
    pub crop: ManifestCrop,
}

/// Crop to apply to a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManifestCrop {
    /// Explicit pixel rectangle.
    Pixels(CropRectangle),
    /// Rectangle relative to the image size.
    Normalized(NormalizedCrop),
    /// Largest centered crop matching the batch aspect mode.
    Fit,
}

impl ManifestCrop {
    /// Resolve the crop for an image of the given dimensions.
    ///
    /// [`ManifestCrop::Fit`] yields `None`; the caller computes the fitted
    /// rectangle with the aspect mode in hand.
    pub fn resolve(&self, image_width: u32, image_height: u32) -> Option<CropRectangle> {
        match self {
            ManifestCrop::Pixels(rect) => Some(*rect),
            ManifestCrop::Normalized(crop) => Some(crop.to_pixels(image_width, image_height)),
            ManifestCrop::Fit => None,
        }
    }
}

/// A manifest together with the directory its paths are relative to.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    /// Directory containing the manifest file.
    pub root: PathBuf,

    /// Parsed manifest.
    pub manifest: BatchManifest,
}

impl BatchManifest {
    /// Create an empty manifest.
    pub fn new(aspect_mode: AspectMode) -> Self {
        Self {
            version: "1.0".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            aspect_mode,
            template: None,
            entries: vec![],
        }
    }

    pub fn push(&mut self, source: impl Into<PathBuf>, crop: ManifestCrop) {
        self.entries.push(ManifestEntry {
            source: source.into(),
            crop,
        });
    }
}

impl LoadedManifest {
    /// Load a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ManifestError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let manifest: BatchManifest =
            serde_json::from_str(&json).map_err(|e| ManifestError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        if manifest.entries.is_empty() {
            return Err(ManifestError::ValidationError {
                message: format!("{} lists no images", path.display()),
            });
        }

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { root, manifest })
    }

    /// Save the manifest to a file.
    pub fn save(manifest: &BatchManifest, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ManifestError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json =
            serde_json::to_string_pretty(manifest).map_err(|e| ManifestError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        std::fs::write(path, json).map_err(|e| ManifestError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Absolute (or root-relative) path of an entry's source image.
    pub fn source_path(&self, entry: &ManifestEntry) -> PathBuf {
        self.root.join(&entry.source)
    }

    /// Template path, resolved against the manifest directory.
    pub fn template_path(&self) -> Option<PathBuf> {
        self.manifest.template.as_ref().map(|t| self.root.join(t))
    }

    /// List entries whose source file is missing.
    pub fn validate_sources(&self) -> Vec<String> {
        self.manifest
            .entries
            .iter()
            .filter(|entry| !self.source_path(entry).exists())
            .map(|entry| format!("Source missing: {}", entry.source.display()))
            .collect()
    }
}

/// Errors that can occur when working with manifests.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid manifest: {message}")]
    ValidationError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_serialization() {
        let mut manifest = BatchManifest::new(AspectMode::Portrait);
        manifest.push(
            "a.jpg",
            ManifestCrop::Pixels(CropRectangle::new(100, 50, 400, 450)),
        );
        manifest.push("b.jpg", ManifestCrop::Fit);

        let json = serde_json::to_string_pretty(&manifest).unwrap();
        assert!(json.contains("\"kind\": \"pixels\""));
        assert!(json.contains("\"aspect_mode\": \"portrait\""));

        let parsed: BatchManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[1].crop, ManifestCrop::Fit);
    }

    #[test]
    fn test_aspect_mode_defaults_to_landscape() {
        let json = r#"{
            "version": "1.0",
            "created_at": "2024-01-01T00:00:00Z",
            "entries": [
                {"source": "a.png", "crop": {"kind": "normalized", "x": 0.0, "y": 0.0, "w": 0.5, "h": 0.5}}
            ]
        }"#;
        let parsed: BatchManifest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.aspect_mode, AspectMode::Landscape);
        assert_eq!(
            parsed.entries[0].crop.resolve(800, 600),
            Some(CropRectangle::new(0, 0, 400, 300))
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("poster_test_manifest");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("manifest.json");

        let mut manifest = BatchManifest::new(AspectMode::Landscape);
        manifest.push("photos/one.png", ManifestCrop::Fit);
        LoadedManifest::save(&manifest, &path).unwrap();

        let loaded = LoadedManifest::load(&path).unwrap();
        assert_eq!(loaded.root, dir);
        assert_eq!(
            loaded.source_path(&loaded.manifest.entries[0]),
            dir.join("photos/one.png")
        );

        let missing = loaded.validate_sources();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].contains("one.png"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let dir = std::env::temp_dir().join("poster_test_manifest_empty");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("manifest.json");
        LoadedManifest::save(&BatchManifest::new(AspectMode::Landscape), &path).unwrap();

        let err = LoadedManifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::ValidationError { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
