//! Export: composing posters and handing them to a download collaborator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use poster_common::error::{PosterError, PosterResult};
use poster_model::{AspectMode, CroppedImage, Poster, TemplateAsset, WorkItemId};

use crate::compositor::compose_poster;

pub use poster_common::config::BatchFailurePolicy;

/// Receives finished posters. Stands in for the "trigger download" step of
/// a front end.
pub trait DownloadSink: Send {
    /// Persist or forward one poster under a suggested file name.
    fn deliver(&mut self, file_name: &str, poster: &Poster) -> PosterResult<()>;

    /// Sink name, for logs.
    fn name(&self) -> &str;
}

/// Writes posters into a directory.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create a sink, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> PosterResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: vec![],
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, poster: &Poster) -> PosterResult<()> {
        let path = self.dir.join(file_name);
        std::fs::write(&path, poster.encoded().bytes()).map_err(|e| {
            PosterError::export(format!("failed to write {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Saved poster");
        self.written.push(path);
        Ok(())
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// One poster handed to a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct Delivery {
    pub file_name: String,
    pub poster: Poster,
}

/// Keeps delivered posters in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    deliveries: Vec<Delivery>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.deliveries
            .iter()
            .map(|d| d.file_name.as_str())
            .collect()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, poster: &Poster) -> PosterResult<()> {
        self.deliveries.push(Delivery {
            file_name: file_name.to_string(),
            poster: poster.clone(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// File name for a single-item export.
pub fn single_file_name(id: WorkItemId) -> String {
    format!("poster-{id}.png")
}

/// File name for the `position`-th poster of a batch (1-based).
pub fn batch_file_name(position: usize) -> String {
    format!("poster-{position}.png")
}

/// Batch export settings.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Pause between two consecutive posters (not applied after the last).
    pub delay: Duration,

    /// Failure handling.
    pub failure_policy: BatchFailurePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(300),
            failure_policy: BatchFailurePolicy::SkipAndContinue,
        }
    }
}

/// One committed crop queued for batch export.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: WorkItemId,
    pub cropped: CroppedImage,
}

/// Progress callback for batch export.
pub type ProgressCallback = Box<dyn Fn(BatchProgress) + Send>;

/// Batch progress report.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Items finished so far (delivered or failed).
    pub completed: usize,

    /// Items in the batch.
    pub total: usize,

    /// Item being worked on.
    pub current: Option<WorkItemId>,

    /// Current stage.
    pub stage: BatchStage,
}

/// Stages of a batch export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    Preparing,
    Composing,
    Delivering,
    Complete,
    Failed,
}

/// A poster that reached the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredPoster {
    pub id: WorkItemId,
    pub file_name: String,
}

/// A poster that was skipped because of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPoster {
    pub id: WorkItemId,
    pub file_name: String,
    pub message: String,
}

/// Outcome of a batch export.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub delivered: Vec<DeliveredPoster>,
    pub failed: Vec<FailedPoster>,
}

impl BatchReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compose one poster and deliver it as `poster-<id>.png`.
///
/// Returns the file name used.
pub async fn export_single(
    id: WorkItemId,
    cropped: &CroppedImage,
    template: &TemplateAsset,
    mode: AspectMode,
    sink: &mut dyn DownloadSink,
) -> PosterResult<String> {
    let file_name = single_file_name(id);
    tracing::info!(%id, %mode, sink = sink.name(), file = %file_name, "Exporting poster");

    let poster = compose_poster(cropped, template, mode).await?;
    sink.deliver(&file_name, &poster)?;
    Ok(file_name)
}

/// Export every item in order, one poster fully delivered before the next
/// starts, pausing `options.delay` in between.
pub async fn export_batch(
    items: &[BatchItem],
    template: &TemplateAsset,
    mode: AspectMode,
    sink: &mut dyn DownloadSink,
    options: &BatchOptions,
    progress: Option<ProgressCallback>,
) -> PosterResult<BatchReport> {
    let total = items.len();
    tracing::info!(
        total,
        %mode,
        sink = sink.name(),
        policy = ?options.failure_policy,
        "Starting batch export"
    );

    let report_progress = |completed: usize, current: Option<WorkItemId>, stage: BatchStage| {
        if let Some(cb) = &progress {
            cb(BatchProgress {
                completed,
                total,
                current,
                stage,
            });
        }
    };

    report_progress(0, None, BatchStage::Preparing);

    let mut report = BatchReport::default();
    for (index, item) in items.iter().enumerate() {
        if index > 0 && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }

        let file_name = batch_file_name(index + 1);
        report_progress(index, Some(item.id), BatchStage::Composing);

        let outcome = match compose_poster(&item.cropped, template, mode).await {
            Ok(poster) => {
                report_progress(index, Some(item.id), BatchStage::Delivering);
                sink.deliver(&file_name, &poster)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                tracing::debug!(id = %item.id, file = %file_name, "Batch item delivered");
                report.delivered.push(DeliveredPoster {
                    id: item.id,
                    file_name,
                });
            }
            Err(e) => match options.failure_policy {
                BatchFailurePolicy::Abort => {
                    tracing::warn!(id = %item.id, error = %e, "Batch export aborted");
                    report_progress(index, Some(item.id), BatchStage::Failed);
                    return Err(e);
                }
                BatchFailurePolicy::SkipAndContinue => {
                    tracing::warn!(id = %item.id, error = %e, "Skipping failed batch item");
                    report.failed.push(FailedPoster {
                        id: item.id,
                        file_name,
                        message: e.to_string(),
                    });
                }
            },
        }
    }

    report_progress(total, None, BatchStage::Complete);
    tracing::info!(
        delivered = report.delivered.len(),
        failed = report.failed.len(),
        "Batch export finished"
    );
    Ok(report)
}
