//! Progress signals emitted while a crawl runs

use std::sync::Mutex;

/// A progress milestone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// One more listing page merged
    ListingPage { pages: usize, collected: usize },

    /// Description pass about to start
    DescriptionsStarted { total: usize },

    /// Item `index` (1-based) of `total` finished, successfully or not
    DescriptionProgress {
        index: usize,
        total: usize,
        percent: u8,
    },

    /// Description pass finished; `failed` items kept their listing snippet
    DescriptionsFinished { total: usize, failed: usize },
}

/// Receives progress events from the crawler
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// `floor(index / total * 100)`, clamped to 100
pub fn percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (index.min(total) * 100 / total) as u8
}

/// Reports progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ListingPage { pages, collected } => {
                tracing::info!(
                    "[1/2] Collecting video list... pages: {} | videos: {}",
                    pages,
                    collected
                );
            }
            ProgressEvent::DescriptionsStarted { total } => {
                tracing::info!("[2/2] Fetching full descriptions for {} videos...", total);
            }
            ProgressEvent::DescriptionProgress {
                index,
                total,
                percent,
            } => {
                tracing::info!("[2/2] Progress: {}% ({}/{})", percent, index, total);
            }
            ProgressEvent::DescriptionsFinished { total, failed } => {
                tracing::info!(
                    "[2/2] Descriptions finished ({} of {} kept their listing snippet)",
                    failed,
                    total
                );
            }
        }
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
