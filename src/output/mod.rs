//! Output module for crawl results
//!
//! This module handles:
//! - The immutable `CrawlResult` produced by a crawl
//! - Its on-disk JSON document layout
//! - Writing that document atomically

mod document;
mod json_output;

pub use document::{CrawlResult, OutputDocument, VideoRecord};
pub use json_output::{render_crawl_result, write_crawl_result, OutputError, OutputResult};
