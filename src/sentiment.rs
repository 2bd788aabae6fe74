//! Keyword-count sentiment.
//!
//! This is a word counter, not a language model: each side scores one point per
//! token found in its lexicon and the strictly larger side wins. Ties,
//! including no hits at all, are neutral.
use crate::types::Sentiment;
use regex::Regex;
use std::sync::OnceLock;

const POSITIVE_WORDS: &[&str] = &[
    "love", "loves", "great", "happy", "awesome", "fun", "best", "win", "wins", "good", "joy",
    "laugh", "smile", "perfect", "nice", "excellent", "clean", "elegant",
];

const NEGATIVE_WORDS: &[&str] = &[
    "hate", "hates", "crash", "crashes", "fail", "fails", "failed", "broken", "bad", "sad",
    "wrong", "worst", "angry", "pain", "cry", "terrible", "nightmare",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-z0-9']+").expect("regex for sentiment tokens"))
}

/// Classify `text` by counting lexicon hits.
pub fn classify(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    let mut positive = 0usize;
    let mut negative = 0usize;
    for token in word_pattern().find_iter(&lowered) {
        let word = token.as_str().trim_matches('\'');
        if POSITIVE_WORDS.contains(&word) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(&word) {
            negative += 1;
        }
    }
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
