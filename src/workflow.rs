//! One complete run: load, rotate, fetch, dedupe, persist, render.
use crate::analytics::{self, AnalyticsStore};
use crate::config::{Config, DUPLICATE_WINDOW};
use crate::document::{render_block, update_document};
use crate::fetch::Fetcher;
use crate::history::{HistoryLog, HistoryStore};
use crate::lm::TextGenerator;
use crate::paths::JokePaths;
use crate::rotation::next_category;
use crate::types::JokeRecord;
use anyhow::{Context, Result};

/// Components a run operates on, wired from [`Config`].
pub struct Workflow<'a> {
    history: HistoryStore,
    analytics: AnalyticsStore,
    paths: JokePaths,
    categories: Vec<&'static str>,
    fetcher: Fetcher<'a>,
}

impl<'a> Workflow<'a> {
    pub fn new(config: &Config, generator: &'a dyn TextGenerator) -> Self {
        Self {
            history: HistoryStore::new(config.paths.history_path(), config.history_cap),
            analytics: AnalyticsStore::new(config.paths.analytics_path()),
            paths: config.paths.clone(),
            categories: config.categories.clone(),
            fetcher: Fetcher::new(generator),
        }
    }

    /// Perform one run and return the record that was published.
    ///
    /// History and analytics are persisted before the document is touched; a
    /// document failure aborts the run but leaves them in place.
    pub fn run(&self) -> Result<JokeRecord> {
        let mut log = self.history.load();
        let category = next_category(&log, &self.categories);
        let exclude = log.texts();
        tracing::info!(%category, history = log.len(), first_run = log.is_empty(), "starting run");

        let mut record = self.fetcher.fetch(&exclude, &category);
        if is_recent_duplicate(&log, &record) {
            tracing::warn!(hash = %record.content_hash, "duplicate joke; retrying once");
            record = self.fetcher.fetch(&exclude, &category);
            if is_recent_duplicate(&log, &record) {
                tracing::warn!(hash = %record.content_hash, "retry also duplicated; keeping it");
            }
        }

        log.push(record.clone());
        self.history
            .save(&mut log)
            .with_context(|| format!("save history {}", self.history.path().display()))?;

        let summary = analytics::record(self.analytics.load(), &record);
        self.analytics
            .save(&summary)
            .with_context(|| format!("save analytics {}", self.analytics.path().display()))?;

        let block = render_block(&record, &analytics::summarize(&summary));
        update_document(&self.paths.document_path(), &block)?;
        tracing::info!(
            category = %record.category,
            sentiment = %record.sentiment,
            words = record.word_count,
            "run complete"
        );
        Ok(record)
    }
}

/// True when `record` matches the hash of one of the last
/// [`DUPLICATE_WINDOW`] entries. Error records carry no hash and never match.
fn is_recent_duplicate(log: &HistoryLog, record: &JokeRecord) -> bool {
    if record.content_hash.is_empty() {
        return false;
    }
    log.recent(DUPLICATE_WINDOW)
        .iter()
        .any(|entry| entry.content_hash == record.content_hash)
}

/// Operator-facing one-line summary of a published record.
pub fn summary_line(record: &JokeRecord) -> String {
    let one_line = record.text.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("[{}/{}] {one_line}", record.category, record.sentiment)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
