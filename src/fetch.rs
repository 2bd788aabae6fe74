//! Content fetcher: prompt assembly, one generation call, record building.
//!
//! `fetch` never fails. Transport problems and unusable payloads become error
//! records whose text starts with a fixed diagnostic prefix, so the failure is
//! visible in the rendered document instead of aborting the run.
use crate::lm::{extract_candidate_text, TextGenerator};
use crate::sentiment;
use crate::templates::JOKE_PROMPT_MD;
use crate::types::{JokeRecord, Sentiment, ERROR_CATEGORY};
use crate::util::{content_hash, truncate_string, word_count};
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeSet;

pub const TRANSPORT_ERROR_PREFIX: &str = "Error fetching joke: ";
pub const MALFORMED_RESPONSE_PREFIX: &str = "Error parsing joke response: ";

/// Longest single exclusion echoed back into the prompt.
const EXCLUSION_LIMIT: usize = 300;

pub struct Fetcher<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> Fetcher<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Request one joke in `category` that avoids every text in `exclude`.
    pub fn fetch(&self, exclude: &BTreeSet<String>, category: &str) -> JokeRecord {
        let prompt = build_prompt(exclude, category);
        tracing::debug!(category, exclusions = exclude.len(), "requesting joke");
        let payload = match self.generator.generate(&prompt) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(%err, category, "generation request failed");
                return error_record(format!("{TRANSPORT_ERROR_PREFIX}{err}"));
            }
        };
        match extract_candidate_text(&payload) {
            Ok(text) => joke_record(text, category),
            Err(detail) => {
                tracing::warn!(%detail, category, "generation response unusable");
                error_record(format!("{MALFORMED_RESPONSE_PREFIX}{detail}"))
            }
        }
    }
}

/// Fill the prompt template for `category`, listing jokes to avoid.
pub fn build_prompt(exclude: &BTreeSet<String>, category: &str) -> String {
    let exclusions = if exclude.is_empty() {
        String::new()
    } else {
        let mut section = String::from("\nDo not repeat or paraphrase any of these jokes:\n");
        for text in exclude {
            let one_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
            section.push_str("- ");
            section.push_str(&truncate_string(&one_line, EXCLUSION_LIMIT));
            section.push('\n');
        }
        section
    };
    JOKE_PROMPT_MD
        .replace("{category}", category)
        .replace("{exclusions}", &exclusions)
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn joke_record(text: String, category: &str) -> JokeRecord {
    JokeRecord {
        content_hash: content_hash(&text),
        word_count: word_count(&text),
        sentiment: sentiment::classify(&text),
        category: category.to_string(),
        timestamp: now_timestamp(),
        text,
    }
}

fn error_record(text: String) -> JokeRecord {
    JokeRecord {
        text,
        category: ERROR_CATEGORY.to_string(),
        timestamp: now_timestamp(),
        content_hash: String::new(),
        sentiment: Sentiment::Neutral,
        word_count: 0,
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
