//! Full-description pass over collected videos
//!
//! Listing snippets are often truncated. This pass opens each video's watch
//! page and replaces the snippet with `videoDetails.shortDescription` from
//! the embedded player response.
//!
//! The pass is best effort: a failure on one video leaves that video's
//! snippet as it was and moves on. Results keep the input order, and
//! progress is reported in input order even when several pages are
//! fetched at once.

use crate::crawler::client::PlatformClient;
use crate::crawler::embedded::{extract_assigned_json, PLAYER_RESPONSE_VAR};
use crate::crawler::progress::{percent, ProgressEvent, ProgressReporter};
use crate::entity::EntitySummary;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::pin::pin;
use thiserror::Error;

/// Why a single video kept its listing snippet
///
/// Only logged; never turns into a crawl failure.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("watch page answered HTTP {status_code}")]
    Status { status_code: u16 },

    #[error("no player response in watch page")]
    MissingPlayerResponse,

    #[error("player response has no description")]
    MissingDescription,
}

/// Outcome of a description pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Videos processed
    pub total: usize,

    /// Videos whose description was replaced
    pub enriched: usize,

    /// Ids of videos that kept their listing snippet, in input order
    pub failed_ids: Vec<String>,
}

impl EnrichmentReport {
    pub fn has_failures(&self) -> bool {
        !self.failed_ids.is_empty()
    }
}

/// Fetches a watch page and returns its full description
pub async fn fetch_full_description(
    client: &PlatformClient,
    video_url: &str,
) -> Result<String, EnrichmentError> {
    let response = client.http().get(video_url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(EnrichmentError::Status {
            status_code: status.as_u16(),
        });
    }

    let html = response.text().await?;
    extract_full_description(&html)
}

/// Pulls `videoDetails.shortDescription` out of a watch page
///
/// An empty description that is present counts as a result; a missing one
/// is an error so the caller keeps what it had.
pub fn extract_full_description(html: &str) -> Result<String, EnrichmentError> {
    let player = extract_assigned_json(html, PLAYER_RESPONSE_VAR)
        .ok_or(EnrichmentError::MissingPlayerResponse)?;

    player
        .get("videoDetails")
        .and_then(|details| details.get("shortDescription"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(EnrichmentError::MissingDescription)
}

/// Replaces each video's snippet with its full description
///
/// At most `concurrency` watch pages are in flight at once. Each fetch is
/// followed by the client's politeness pause. The returned list has the
/// same length, order and ids as `entities`.
pub async fn enrich(
    client: &PlatformClient,
    entities: Vec<EntitySummary>,
    concurrency: usize,
    reporter: &dyn ProgressReporter,
) -> (Vec<EntitySummary>, EnrichmentReport) {
    let total = entities.len();
    let mut report = EnrichmentReport {
        total,
        ..EnrichmentReport::default()
    };

    if total == 0 {
        return (entities, report);
    }

    reporter.report(&ProgressEvent::DescriptionsStarted { total });

    let fetches = stream::iter(entities)
        .map(move |entity| async move {
            let outcome = fetch_full_description(client, &entity.canonical_url).await;
            client.pause().await;
            (entity, outcome)
        })
        .buffered(concurrency.max(1));
    let mut fetches = pin!(fetches);

    let mut enriched = Vec::with_capacity(total);
    while let Some((mut entity, outcome)) = fetches.next().await {
        match outcome {
            Ok(description) => {
                entity.short_description = description;
                report.enriched += 1;
            }
            Err(e) => {
                tracing::warn!("Keeping listing snippet for {}: {}", entity.id, e);
                report.failed_ids.push(entity.id.clone());
            }
        }
        enriched.push(entity);

        let index = enriched.len();
        reporter.report(&ProgressEvent::DescriptionProgress {
            index,
            total,
            percent: percent(index, total),
        });
    }

    reporter.report(&ProgressEvent::DescriptionsFinished {
        total,
        failed: report.failed_ids.len(),
    });

    (enriched, report)
}
