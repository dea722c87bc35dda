//! JSON file writer for crawl results
//!
//! The document is written to a temporary file next to the target and then
//! renamed over it, so readers never see a half-written file.

use crate::output::document::CrawlResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while writing the output document
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes a crawl result as pretty-printed JSON
///
/// Non-ASCII text is written as-is, not escaped.
pub fn render_crawl_result(result: &CrawlResult) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&result.to_document())?)
}

/// Writes a crawl result to `path`, replacing any existing file
///
/// # Returns
///
/// * `Ok(PathBuf)` - Absolute path of the written file
/// * `Err(OutputError)` - Nothing was written at `path`
pub fn write_crawl_result(result: &CrawlResult, path: &Path) -> OutputResult<PathBuf> {
    let rendered = render_crawl_result(result)?;

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut staging = NamedTempFile::new_in(&parent)?;
    staging.write_all(rendered.as_bytes())?;
    staging.write_all(b"\n")?;
    staging.as_file().sync_all()?;
    staging.persist(path)?;

    let written = std::fs::canonicalize(path)?;
    tracing::info!(
        "Wrote {} videos to {}",
        result.total_count(),
        written.display()
    );
    Ok(written)
}
