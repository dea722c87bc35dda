//! Payload walker for listing and browse responses
//!
//! This module walks an arbitrary JSON tree to find:
//! - Video renderer objects, turned into `EntitySummary` values
//! - The continuation token for the next page
//!
//! The walk never fails. Nodes that don't have the expected shape are
//! skipped, so a layout change degrades to "fewer results" instead of an error.

use crate::entity::EntitySummary;
use crate::url::video_url;
use serde_json::{Map, Value};
use std::ops::ControlFlow;

/// Keys whose object values describe a single video
pub const ENTITY_MARKERS: &[&str] = &["gridVideoRenderer", "videoRenderer"];

/// Receives every `(key, value)` pair of an object, in pre-order
pub trait PayloadVisitor<'a> {
    /// Return `ControlFlow::Break` to stop the walk early
    fn visit_entry(&mut self, key: &'a str, value: &'a Value) -> ControlFlow<()>;
}

enum Frame<'a> {
    Object(serde_json::map::Iter<'a>),
    Array(std::slice::Iter<'a, Value>),
}

fn frame_for(value: &Value) -> Option<Frame<'_>> {
    match value {
        Value::Object(map) => Some(Frame::Object(map.iter())),
        Value::Array(items) => Some(Frame::Array(items.iter())),
        _ => None,
    }
}

/// Walks `root` depth-first, visiting each object entry before its children
///
/// Uses an explicit stack, so nesting depth is bounded by memory rather
/// than by the call stack.
pub fn walk_payload<'a, V>(root: &'a Value, visitor: &mut V) -> ControlFlow<()>
where
    V: PayloadVisitor<'a>,
{
    let mut stack: Vec<Frame<'a>> = frame_for(root).into_iter().collect();

    while let Some(frame) = stack.last_mut() {
        let child = match frame {
            Frame::Object(entries) => match entries.next() {
                Some((key, value)) => {
                    visitor.visit_entry(key, value)?;
                    Some(value)
                }
                None => None,
            },
            Frame::Array(items) => items.next(),
        };

        match child {
            Some(value) => {
                if let Some(next) = frame_for(value) {
                    stack.push(next);
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    ControlFlow::Continue(())
}

/// Result of walking one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    /// Summaries in traversal order (may contain repeated ids)
    pub entities: Vec<EntitySummary>,

    /// Token for the next page, if any strategy found one
    pub continuation: Option<String>,
}

/// Walks a payload and returns its video summaries and continuation token
///
/// # Example
///
/// ```
/// use channel_sweep::crawler::walk;
/// use serde_json::json;
///
/// let payload = json!({
///     "contents": [
///         { "videoRenderer": { "videoId": "abc", "title": { "simpleText": "Hello" } } },
///         { "continuationItemRenderer": { "continuationEndpoint": {
///             "continuationCommand": { "token": "NEXT" } } } }
///     ]
/// });
///
/// let out = walk(&payload, "https://www.youtube.com");
/// assert_eq!(out.entities[0].title, "Hello");
/// assert_eq!(out.continuation.as_deref(), Some("NEXT"));
/// ```
pub fn walk(payload: &Value, platform_root: &str) -> WalkOutput {
    WalkOutput {
        entities: collect_entities(payload, platform_root),
        continuation: find_continuation(payload),
    }
}

struct EntityCollector<'r> {
    platform_root: &'r str,
    entities: Vec<EntitySummary>,
}

impl<'a, 'r> PayloadVisitor<'a> for EntityCollector<'r> {
    fn visit_entry(&mut self, key: &'a str, value: &'a Value) -> ControlFlow<()> {
        if ENTITY_MARKERS.contains(&key) {
            if let Some(entity) = parse_video_renderer(value, self.platform_root) {
                self.entities.push(entity);
            }
        }
        ControlFlow::Continue(())
    }
}

/// Collects every video renderer in traversal order
pub fn collect_entities(payload: &Value, platform_root: &str) -> Vec<EntitySummary> {
    let mut collector = EntityCollector {
        platform_root,
        entities: Vec::new(),
    };
    let _ = walk_payload(payload, &mut collector);
    collector.entities
}

/// Parses one video renderer object
///
/// Returns `None` when the node isn't an object or has no usable `videoId`.
pub fn parse_video_renderer(renderer: &Value, platform_root: &str) -> Option<EntitySummary> {
    let renderer = renderer.as_object()?;
    let id = renderer
        .get("videoId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())?;

    Some(EntitySummary {
        id: id.to_string(),
        canonical_url: video_url(platform_root, id),
        title: renderer.get("title").map(pick_text).unwrap_or_default(),
        short_description: pick_snippet(renderer),
        thumbnail_url: pick_thumbnail(renderer),
    })
}

/// Normalizes a text field to plain text
///
/// Accepts a plain string, `{ "simpleText": ... }` or `{ "runs": [{ "text": ... }, ...] }`;
/// anything else reads as empty.
pub fn pick_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            if let Some(text) = map.get("simpleText").and_then(Value::as_str) {
                return text.to_string();
            }
            match map.get("runs") {
                Some(Value::Array(runs)) => runs
                    .iter()
                    .filter_map(|run| run.get("text").and_then(Value::as_str))
                    .collect(),
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

fn pick_snippet(renderer: &Map<String, Value>) -> String {
    if let Some(snippet) = renderer.get("descriptionSnippet").filter(|s| s.is_object()) {
        return pick_text(snippet);
    }

    renderer
        .get("detailedMetadataSnippets")
        .and_then(Value::as_array)
        .and_then(|snippets| snippets.first())
        .and_then(|first| first.get("snippetText"))
        .map(pick_text)
        .unwrap_or_default()
}

// Last entry is the largest rendition.
fn pick_thumbnail(renderer: &Map<String, Value>) -> String {
    renderer
        .get("thumbnail")
        .and_then(|thumb| thumb.get("thumbnails"))
        .and_then(Value::as_array)
        .and_then(|thumbs| thumbs.last())
        .and_then(|last| last.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Ways a continuation token can appear in a payload
///
/// Tried in the order of [`ContinuationStrategy::PRIORITY`]; the first
/// strategy that finds a token anywhere in the tree wins, so a specific
/// shape always beats a generic one regardless of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationStrategy {
    /// `continuationItemRenderer.continuationEndpoint.continuationCommand.token`
    ContinuationItemRenderer,

    /// Any `continuationCommand.token`
    ContinuationCommand,

    /// Any `nextContinuationData.continuation` (older grid layout)
    NextContinuationData,
}

impl ContinuationStrategy {
    /// Strategies from most to least specific
    pub const PRIORITY: [ContinuationStrategy; 3] = [
        Self::ContinuationItemRenderer,
        Self::ContinuationCommand,
        Self::NextContinuationData,
    ];

    /// Object key this strategy looks for
    pub fn marker(&self) -> &'static str {
        match self {
            Self::ContinuationItemRenderer => "continuationItemRenderer",
            Self::ContinuationCommand => "continuationCommand",
            Self::NextContinuationData => "nextContinuationData",
        }
    }

    /// Pulls a non-empty token out of the value stored under `marker()`
    pub fn extract<'a>(&self, value: &'a Value) -> Option<&'a str> {
        let token = match self {
            Self::ContinuationItemRenderer => value
                .get("continuationEndpoint")?
                .get("continuationCommand")?
                .get("token")?,
            Self::ContinuationCommand => value.get("token")?,
            Self::NextContinuationData => value.get("continuation")?,
        };
        token.as_str().filter(|token| !token.is_empty())
    }
}

struct ContinuationFinder<'a> {
    strategy: ContinuationStrategy,
    found: Option<&'a str>,
}

impl<'a> PayloadVisitor<'a> for ContinuationFinder<'a> {
    fn visit_entry(&mut self, key: &'a str, value: &'a Value) -> ControlFlow<()> {
        if key == self.strategy.marker() {
            if let Some(token) = self.strategy.extract(value) {
                self.found = Some(token);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}

/// Finds the first continuation token using a single strategy
pub fn find_continuation_with(payload: &Value, strategy: ContinuationStrategy) -> Option<String> {
    let mut finder = ContinuationFinder {
        strategy,
        found: None,
    };
    let _ = walk_payload(payload, &mut finder);
    finder.found.map(str::to_string)
}

/// Finds the continuation token, trying strategies in priority order
pub fn find_continuation(payload: &Value) -> Option<String> {
    ContinuationStrategy::PRIORITY
        .iter()
        .find_map(|strategy| find_continuation_with(payload, *strategy))
}
