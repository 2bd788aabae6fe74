//! Joke history persistence.
//!
//! The on-disk file has gone through several shapes. All of them are resolved
//! into `HistoryLog` once at load time; nothing downstream inspects the raw
//! shape. Saves always write the wrapped shape.
use crate::staging::write_atomic_json;
use crate::types::{JokeRecord, Sentiment, GENERAL_CATEGORY};
use crate::util::{content_hash, word_count};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered joke log, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<JokeRecord>,
}

impl HistoryLog {
    pub fn new(entries: Vec<JokeRecord>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[JokeRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, record: JokeRecord) {
        self.entries.push(record);
    }

    /// The most recent `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> &[JokeRecord] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    /// Every text in the log, for the prompt's exclusion list.
    pub fn texts(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_error())
            .map(|entry| entry.text.clone())
            .collect()
    }

    /// Drop entries from the front until at most `cap` remain.
    pub fn truncate_front(&mut self, cap: usize) {
        let excess = self.entries.len().saturating_sub(cap);
        if excess > 0 {
            self.entries.drain(..excess);
        }
    }
}

/// Loads and saves the history file with a fixed retention cap.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    cap: usize,
}

impl HistoryStore {
    pub fn new(path: PathBuf, cap: usize) -> Self {
        Self { path, cap }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history, returning an empty log when the file is absent or
    /// unreadable.
    pub fn load(&self) -> HistoryLog {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no history file yet");
                return HistoryLog::default();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "history unreadable; starting fresh");
                return HistoryLog::default();
            }
        };
        match parse_history(&bytes) {
            Ok(log) => {
                tracing::debug!(entries = log.len(), "loaded history");
                log
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "history malformed; starting fresh");
                HistoryLog::default()
            }
        }
    }

    /// Truncate `log` to the cap and persist it in the wrapped shape.
    pub fn save(&self, log: &mut HistoryLog) -> Result<()> {
        log.truncate_front(self.cap);
        let file = HistoryFile {
            history: log.entries(),
        };
        write_atomic_json(&self.path, &file)?;
        tracing::debug!(entries = log.len(), cap = self.cap, "saved history");
        Ok(())
    }
}

#[derive(Serialize)]
struct HistoryFile<'a> {
    history: &'a [JokeRecord],
}

/// Every shape the history file has been written in.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    /// `["joke", "joke", ...]`
    StringList(Vec<String>),
    /// `[{"text": ..., ...}, ...]`
    NormalizedList(Vec<PartialRecord>),
    /// `{"history": ["joke", {"text": ...}, ...]}`
    WrappedMixedList { history: Vec<StoredEntry> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Text(String),
    Record(PartialRecord),
    Unknown(Value),
}

/// A record object with every field optional. Legacy key spellings are
/// resolved by hand so an entry carrying both spellings still loads; the
/// current spelling wins.
#[derive(Deserialize, Default)]
#[serde(from = "Map<String, Value>")]
struct PartialRecord {
    text: Option<String>,
    category: Option<String>,
    timestamp: Option<String>,
    content_hash: Option<String>,
    sentiment: Option<String>,
    word_count: Option<usize>,
}

impl From<Map<String, Value>> for PartialRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            text: first_string(&fields, &["text", "joke"]),
            category: first_string(&fields, &["category"]),
            timestamp: first_string(&fields, &["timestamp"]),
            content_hash: first_string(&fields, &["contentHash", "content_hash", "hash"]),
            sentiment: first_string(&fields, &["sentiment"]),
            word_count: ["wordCount", "word_count"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_u64))
                .and_then(|count| usize::try_from(count).ok()),
        }
    }
}

fn first_string(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn parse_history(bytes: &[u8]) -> serde_json::Result<HistoryLog> {
    let stored: StoredHistory = serde_json::from_slice(bytes)?;
    let entries = match stored {
        StoredHistory::StringList(texts) => texts.into_iter().map(record_from_text).collect(),
        StoredHistory::NormalizedList(records) => {
            records.into_iter().map(record_from_partial).collect()
        }
        StoredHistory::WrappedMixedList { history } => history
            .into_iter()
            .filter_map(|entry| match entry {
                StoredEntry::Text(text) => Some(record_from_text(text)),
                StoredEntry::Record(partial) => Some(record_from_partial(partial)),
                StoredEntry::Unknown(value) => {
                    tracing::warn!(%value, "skipping unrecognized history entry");
                    None
                }
            })
            .collect(),
    };
    Ok(HistoryLog::new(entries))
}

fn record_from_text(text: String) -> JokeRecord {
    record_from_partial(PartialRecord {
        text: Some(text),
        ..PartialRecord::default()
    })
}

fn record_from_partial(partial: PartialRecord) -> JokeRecord {
    let text = partial.text.unwrap_or_default();
    JokeRecord {
        content_hash: partial
            .content_hash
            .unwrap_or_else(|| content_hash(&text)),
        word_count: partial.word_count.unwrap_or_else(|| word_count(&text)),
        category: partial
            .category
            .filter(|category| !category.trim().is_empty())
            .unwrap_or_else(|| GENERAL_CATEGORY.to_string()),
        timestamp: partial.timestamp.unwrap_or_default(),
        sentiment: partial
            .sentiment
            .as_deref()
            .map(Sentiment::from_label)
            .unwrap_or_default(),
        text,
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
