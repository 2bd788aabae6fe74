//! Shared record types for joke history and analytics.
//!
//! These types mirror the JSON files kept next to the target document so the
//! workflow can round-trip them without losing fields.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rotation order for joke categories.
pub const CATEGORIES: [&str; 5] = ["python", "javascript", "git", "debugging", "devops"];

/// Category used when every rotation category was used recently, and for
/// legacy entries that never carried one.
pub const GENERAL_CATEGORY: &str = "general";

/// Category stamped on records produced by a failed fetch.
pub const ERROR_CATEGORY: &str = "error";

/// Coarse tone of a joke as judged by the keyword counter in `sentiment`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Parse a stored label, treating anything unrecognized as neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generated joke plus its derived metadata.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JokeRecord {
    pub text: String,
    pub category: String,
    /// RFC 3339 timestamp; empty for entries upgraded from bare strings.
    pub timestamp: String,
    /// SHA-256 of the lower-cased text; empty for error records.
    pub content_hash: String,
    pub sentiment: Sentiment,
    pub word_count: usize,
}

impl JokeRecord {
    /// True when this record came from the fetch failure path.
    pub fn is_error(&self) -> bool {
        self.category == ERROR_CATEGORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_labels_fall_back_to_neutral() {
        assert_eq!(Sentiment::from_label("Positive"), Sentiment::Positive);
        assert_eq!(Sentiment::from_label(" negative "), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("ecstatic"), Sentiment::Neutral);
        assert_eq!(Sentiment::from_label(""), Sentiment::Neutral);
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = JokeRecord {
            text: "hello".to_string(),
            category: "git".to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            content_hash: "abc".to_string(),
            sentiment: Sentiment::Neutral,
            word_count: 1,
        };
        let value = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(value["contentHash"], "abc");
        assert_eq!(value["wordCount"], 1);
        assert_eq!(value["sentiment"], "neutral");
    }
}
