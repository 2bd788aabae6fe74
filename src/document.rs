//! Marker-delimited document rewriting.
//!
//! Only the text strictly between the first start marker and the first end
//! marker after it is ever replaced. Everything else in the document is
//! preserved byte for byte.
use crate::staging::write_atomic_text;
use crate::templates::README_HEADER_MD;
use crate::types::JokeRecord;
use anyhow::{Context, Result};
use chrono::DateTime;
use std::fs;
use std::path::Path;

pub const START_MARKER: &str = "<!-- JOKE-START -->";
pub const END_MARKER: &str = "<!-- JOKE-END -->";

/// Replace the marker region of `document` with `block`, appending a new
/// region at the end when no marker pair exists.
pub fn apply(document: &str, block: &str) -> String {
    if let Some((inner_start, inner_end)) = marker_region(document) {
        let mut out = String::with_capacity(document.len() + block.len());
        out.push_str(&document[..inner_start]);
        out.push('\n');
        out.push_str(block);
        out.push('\n');
        out.push_str(&document[inner_end..]);
        return out;
    }

    let mut out = document.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(START_MARKER);
    out.push('\n');
    out.push_str(block);
    out.push('\n');
    out.push_str(END_MARKER);
    out.push('\n');
    out
}

/// Byte range strictly between the first marker pair, if any.
fn marker_region(document: &str) -> Option<(usize, usize)> {
    let inner_start = document.find(START_MARKER)? + START_MARKER.len();
    let inner_end = inner_start + document[inner_start..].find(END_MARKER)?;
    Some((inner_start, inner_end))
}

/// Skeleton written when the target document does not exist yet.
pub fn initial_document() -> String {
    format!("{README_HEADER_MD}{START_MARKER}\n{END_MARKER}\n")
}

/// Render the block placed between the markers.
///
/// Comment openers are escaped so nothing in the block can be read back as a
/// marker on the next run.
pub fn render_block(record: &JokeRecord, digest: &str) -> String {
    let mut block = String::new();
    for line in record.text.lines() {
        if line.trim().is_empty() {
            block.push_str(">\n");
        } else {
            block.push_str("> ");
            block.push_str(line.trim_end());
            block.push('\n');
        }
    }
    if record.text.trim().is_empty() {
        block.push_str(">\n");
    }
    block.push('\n');
    block.push_str(&format!(
        "*Category: {} | {}*",
        record.category,
        format_timestamp(&record.timestamp)
    ));
    if !digest.is_empty() {
        block.push_str("\n\n");
        block.push_str(digest);
    }
    block.replace("<!--", "&lt;!--")
}

/// Human-readable form of an RFC 3339 timestamp, or the raw value when it
/// cannot be parsed.
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) if timestamp.trim().is_empty() => "unknown time".to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Rewrite the marker region of the document at `path`, creating it first if
/// it is missing.
pub fn update_document(path: &Path, block: &str) -> Result<()> {
    let current = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "creating document");
            initial_document()
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read {}", path.display()));
        }
    };
    let updated = apply(&current, block);
    if updated == current {
        tracing::debug!(path = %path.display(), "document already up to date");
        return Ok(());
    }
    write_atomic_text(path, &updated).with_context(|| format!("update {}", path.display()))
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
