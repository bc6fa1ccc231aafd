//! Work items: one uploaded image tracked through the session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crop::CropUpdate;
use crate::encoded::{CroppedImage, SourceImage};

/// Stable identity of a work item, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(u64);

impl WorkItemId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemState {
    /// Image present, no crop chosen yet.
    Uploaded,
    /// Crop rectangle being adjusted.
    Editing,
    /// Cropped image extracted and cached.
    Committed,
    /// Deleted from the working set.
    Removed,
}

/// One source image plus its crop-in-progress and committed crop.
///
/// A committed crop is only replaced by committing again; later crop
/// updates are recorded but leave it in place.
#[derive(Debug, Clone)]
pub struct WorkItem {
    id: WorkItemId,
    source: SourceImage,
    latest_crop: Option<CropUpdate>,
    cropped: Option<CroppedImage>,
}

impl WorkItem {
    pub fn new(id: WorkItemId, source: SourceImage) -> Self {
        Self {
            id,
            source,
            latest_crop: None,
            cropped: None,
        }
    }

    pub fn id(&self) -> WorkItemId {
        self.id
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// Most recent crop reported by the cropping collaborator.
    pub fn latest_crop(&self) -> Option<CropUpdate> {
        self.latest_crop
    }

    pub fn cropped(&self) -> Option<&CroppedImage> {
        self.cropped.as_ref()
    }

    /// Record a crop update, replacing any previous one.
    pub fn set_crop(&mut self, update: CropUpdate) {
        self.latest_crop = Some(update);
    }

    /// Store a freshly extracted crop, overwriting any earlier commit.
    pub fn commit(&mut self, cropped: CroppedImage) {
        self.cropped = Some(cropped);
    }

    pub fn state(&self) -> WorkItemState {
        if self.cropped.is_some() {
            WorkItemState::Committed
        } else if self.latest_crop.is_some() {
            WorkItemState::Editing
        } else {
            WorkItemState::Uploaded
        }
    }

    pub fn is_committed(&self) -> bool {
        self.cropped.is_some()
    }
}
