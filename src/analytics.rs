//! Running counts of produced jokes.
//!
//! Counts only ever go up; keys are created on first use and never removed.
use crate::staging::write_atomic_json;
use crate::types::JokeRecord;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_count: u64,
    pub per_category_count: BTreeMap<String, u64>,
    pub per_sentiment_count: BTreeMap<String, u64>,
    pub last_updated: String,
}

/// Fold one produced record into `summary`.
pub fn record(mut summary: AnalyticsSummary, entry: &JokeRecord) -> AnalyticsSummary {
    summary.total_count += 1;
    *summary
        .per_category_count
        .entry(entry.category.clone())
        .or_insert(0) += 1;
    *summary
        .per_sentiment_count
        .entry(entry.sentiment.as_str().to_string())
        .or_insert(0) += 1;
    summary.last_updated = entry.timestamp.clone();
    summary
}

/// One-line digest for the document, or empty when nothing was recorded yet.
pub fn summarize(summary: &AnalyticsSummary) -> String {
    if summary.total_count == 0 {
        return String::new();
    }
    let mut top: Option<(&str, u64)> = None;
    for (category, count) in &summary.per_category_count {
        let better = match top {
            Some((_, best)) => *count > best,
            None => true,
        };
        if better {
            top = Some((category.as_str(), *count));
        }
    }
    match top {
        Some((category, count)) => format!(
            "Jokes served: {} | Top category: {category} ({count})",
            summary.total_count
        ),
        None => format!("Jokes served: {}", summary.total_count),
    }
}

/// Loads and saves the analytics file.
#[derive(Debug, Clone)]
pub struct AnalyticsStore {
    path: PathBuf,
}

impl AnalyticsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the summary, starting from zero when the file is absent or bad.
    pub fn load(&self) -> AnalyticsSummary {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), %err, "analytics unreadable; starting fresh");
                }
                return AnalyticsSummary::default();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), %err, "analytics malformed; starting fresh");
            AnalyticsSummary::default()
        })
    }

    pub fn save(&self, summary: &AnalyticsSummary) -> Result<()> {
        write_atomic_json(&self.path, summary)
    }
}
