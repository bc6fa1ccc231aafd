//! Latest-value channel between a crop widget and the session.

use std::sync::Arc;

use poster_model::{CropRectangle, CropUpdate};
use tokio::sync::watch;

/// Publisher handed to an interactive cropping widget.
///
/// Every publish overwrites the previous value. Nothing is queued and a
/// publish never waits, so a widget can report on every drag event.
#[derive(Debug, Clone)]
pub struct CropFeed {
    tx: Arc<watch::Sender<Option<CropUpdate>>>,
}

impl CropFeed {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Report the current crop rectangle and zoom level.
    pub fn publish(&self, rect: CropRectangle, zoom: f64) {
        self.publish_update(CropUpdate::new(rect, zoom));
    }

    pub fn publish_update(&self, update: CropUpdate) {
        self.tx.send_replace(Some(update));
    }

    /// Most recent update, if any.
    pub fn latest(&self) -> Option<CropUpdate> {
        *self.tx.borrow()
    }

    /// Observe updates, e.g. to drive a live preview.
    pub fn subscribe(&self) -> watch::Receiver<Option<CropUpdate>> {
        self.tx.subscribe()
    }
}
