//! Editing session management.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use poster_common::error::{PosterError, PosterResult};
use poster_model::{
    AspectMode, CropRectangle, CropUpdate, CroppedImage, SourceImage, TemplateAsset, TemplateSet,
    WorkItem, WorkItemId, WorkItemState,
};
use poster_processing::extract_crop;
use poster_render::{
    builtin_templates, export_batch, export_single, BatchItem, BatchOptions, BatchReport,
    DownloadSink, ProgressCallback,
};

use crate::feed::CropFeed;

/// Run [`extract_crop`] on the blocking pool. The caller suspends until
/// decode, copy and encode have finished.
pub async fn extract_crop_async(
    source: SourceImage,
    rect: Option<CropRectangle>,
) -> PosterResult<CroppedImage> {
    tokio::task::spawn_blocking(move || extract_crop(&source, rect))
        .await
        .map_err(|e| PosterError::session(format!("crop task failed: {e}")))?
}

/// Configuration for a new editing session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Output shape at start.
    pub aspect_mode: AspectMode,

    /// Batch export settings.
    pub batch: BatchOptions,
}

/// Shared view of whether the session is busy with crop extraction or
/// composition. Clone it before handing the session to a task.
#[derive(Debug, Clone, Default)]
pub struct ProcessingIndicator(Arc<AtomicUsize>);

impl ProcessingIndicator {
    pub fn is_processing(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    fn begin(&self) -> ProcessingGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        ProcessingGuard(Arc::clone(&self.0))
    }
}

struct ProcessingGuard(Arc<AtomicUsize>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct Entry {
    item: WorkItem,
    feed: CropFeed,
}

impl Entry {
    fn latest_crop(&self) -> Option<CropUpdate> {
        self.feed.latest()
    }

    fn state(&self) -> WorkItemState {
        if self.item.is_committed() {
            WorkItemState::Committed
        } else if self.latest_crop().is_some() {
            WorkItemState::Editing
        } else {
            WorkItemState::Uploaded
        }
    }

    /// Copy the feed's latest value into the work item.
    fn sync(&mut self) {
        if let Some(update) = self.latest_crop() {
            self.item.set_crop(update);
        }
    }
}

/// The working set of one editing session.
///
/// Items keep their insertion order. At most one item is active. The
/// aspect mode and template set apply to every composition.
pub struct EditSession {
    entries: Vec<Entry>,
    active: Option<WorkItemId>,
    mode: AspectMode,
    templates: TemplateSet,
    batch: BatchOptions,
    next_id: u64,
    processing: ProcessingIndicator,
}

impl EditSession {
    /// Create a session with the given templates.
    pub fn new(config: SessionConfig, templates: TemplateSet) -> Self {
        Self {
            entries: vec![],
            active: None,
            mode: config.aspect_mode,
            templates,
            batch: config.batch,
            next_id: 1,
            processing: ProcessingIndicator::default(),
        }
    }

    /// Create a session using the bundled templates.
    pub fn with_builtin_templates(config: SessionConfig) -> PosterResult<Self> {
        Ok(Self::new(config, builtin_templates()?))
    }

    /// Add an uploaded image. The new item becomes active.
    pub fn add_source(&mut self, source: SourceImage) -> WorkItemId {
        let id = WorkItemId::new(self.next_id);
        self.next_id += 1;

        tracing::info!(
            %id,
            label = source.label().unwrap_or("-"),
            bytes = source.encoded().len(),
            "Added source image"
        );

        self.entries.push(Entry {
            item: WorkItem::new(id, source),
            feed: CropFeed::new(),
        });
        self.active = Some(id);
        id
    }

    /// Publisher for an item's crop updates.
    pub fn crop_feed(&self, id: WorkItemId) -> PosterResult<CropFeed> {
        Ok(self.entry(id)?.feed.clone())
    }

    /// Record a crop update for an item.
    pub fn update_crop(&mut self, id: WorkItemId, rect: CropRectangle, zoom: f64) -> PosterResult<()> {
        let entry = self.entry_mut(id)?;
        entry.feed.publish(rect, zoom);
        entry.sync();
        tracing::trace!(%id, ?rect, zoom, "Crop updated");
        Ok(())
    }

    /// Extract the latest crop of an item and cache it.
    ///
    /// On failure the item keeps its previous state, including any earlier
    /// committed crop.
    pub async fn commit_crop(&mut self, id: WorkItemId) -> PosterResult<CroppedImage> {
        let entry = self.entry(id)?;
        let rect = entry.latest_crop().map(|update| update.rect);
        let source = entry.item.source().clone();

        let _busy = self.processing.begin();
        match extract_crop_async(source, rect).await {
            Ok(cropped) => {
                let entry = self.entry_mut(id)?;
                entry.sync();
                entry.item.commit(cropped.clone());
                let (width, height) = cropped.dimensions();
                tracing::info!(%id, width, height, "Committed crop");
                Ok(cropped)
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Crop commit failed");
                Err(e)
            }
        }
    }

    /// Make an item active. Never changes any item's state.
    pub fn select(&mut self, id: WorkItemId) -> PosterResult<()> {
        self.entry(id)?;
        self.active = Some(id);
        tracing::debug!(%id, "Selected item");
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    /// Delete an item from the working set.
    pub fn remove(&mut self, id: WorkItemId) -> PosterResult<()> {
        let index = self.index_of(id)?;
        self.entries.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        tracing::info!(%id, "Removed item");
        Ok(())
    }

    /// Lifecycle state of an item, `Removed` for deleted ones and `None`
    /// for ids this session never issued.
    pub fn state_of(&self, id: WorkItemId) -> Option<WorkItemState> {
        match self.entry(id) {
            Ok(entry) => Some(entry.state()),
            Err(_) if id.get() > 0 && id.get() < self.next_id => Some(WorkItemState::Removed),
            Err(_) => None,
        }
    }

    /// Snapshot of an item, including its latest crop.
    pub fn work_item(&self, id: WorkItemId) -> PosterResult<WorkItem> {
        let entry = self.entry(id)?;
        let mut item = entry.item.clone();
        if let Some(update) = entry.latest_crop() {
            item.set_crop(update);
        }
        Ok(item)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> Vec<WorkItemId> {
        self.entries.iter().map(|e| e.item.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active(&self) -> Option<WorkItemId> {
        self.active
    }

    pub fn aspect_mode(&self) -> AspectMode {
        self.mode
    }

    pub fn set_aspect_mode(&mut self, mode: AspectMode) {
        if self.mode != mode {
            tracing::info!(from = %self.mode, to = %mode, "Aspect mode changed");
        }
        self.mode = mode;
    }

    pub fn toggle_aspect_mode(&mut self) -> AspectMode {
        self.set_aspect_mode(self.mode.toggled());
        self.mode
    }

    /// Template bound to the current aspect mode.
    pub fn template(&self) -> &TemplateAsset {
        self.templates.for_mode(self.mode)
    }

    /// Swap in a template for its mode.
    pub fn set_template(&mut self, template: TemplateAsset) {
        tracing::info!(mode = %template.mode(), "Template replaced");
        self.templates.replace(template);
    }

    pub fn batch_options(&self) -> &BatchOptions {
        &self.batch
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_processing()
    }

    /// Handle that keeps reporting [`EditSession::is_processing`] while the
    /// session itself is borrowed by a running operation.
    pub fn processing_indicator(&self) -> ProcessingIndicator {
        self.processing.clone()
    }

    /// Export the active item as `poster-<id>.png`.
    pub async fn export_active(&mut self, sink: &mut dyn DownloadSink) -> PosterResult<String> {
        let id = self
            .active
            .ok_or_else(|| PosterError::session("no item is selected"))?;
        self.export_item(id, sink).await
    }

    /// Export one committed item as `poster-<id>.png`.
    pub async fn export_item(
        &mut self,
        id: WorkItemId,
        sink: &mut dyn DownloadSink,
    ) -> PosterResult<String> {
        let entry = self.entry(id)?;
        let cropped = entry
            .item
            .cropped()
            .ok_or_else(|| PosterError::session(format!("item {id} has no committed crop")))?;

        let _busy = self.processing.begin();
        let result = export_single(id, cropped, self.template(), self.mode, sink).await;
        if let Err(e) = &result {
            tracing::warn!(%id, error = %e, "Export failed");
        }
        result
    }

    /// Export every committed item, in insertion order, as
    /// `poster-1.png`, `poster-2.png`, ...
    pub async fn export_all(
        &mut self,
        sink: &mut dyn DownloadSink,
        progress: Option<ProgressCallback>,
    ) -> PosterResult<BatchReport> {
        let mut items = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match entry.item.cropped() {
                Some(cropped) => items.push(BatchItem {
                    id: entry.item.id(),
                    cropped: cropped.clone(),
                }),
                None => tracing::warn!(
                    id = %entry.item.id(),
                    state = ?entry.state(),
                    "Skipping uncommitted item"
                ),
            }
        }

        let _busy = self.processing.begin();
        export_batch(
            &items,
            self.template(),
            self.mode,
            sink,
            &self.batch,
            progress,
        )
        .await
    }

    fn index_of(&self, id: WorkItemId) -> PosterResult<usize> {
        self.entries
            .iter()
            .position(|e| e.item.id() == id)
            .ok_or_else(|| PosterError::session(format!("unknown item {id}")))
    }

    fn entry(&self, id: WorkItemId) -> PosterResult<&Entry> {
        let index = self.index_of(id)?;
        Ok(&self.entries[index])
    }

    fn entry_mut(&mut self, id: WorkItemId) -> PosterResult<&mut Entry> {
        let index = self.index_of(id)?;
        Ok(&mut self.entries[index])
    }
}
