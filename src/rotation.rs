//! Category rotation.
use crate::history::HistoryLog;
use crate::types::GENERAL_CATEGORY;
use std::collections::BTreeSet;

/// How many trailing entries count as "recently used".
pub const ROTATION_WINDOW: usize = 5;

/// Pick the first category in `categories` not used by the last
/// [`ROTATION_WINDOW`] entries, or `general` when all of them were.
pub fn next_category(log: &HistoryLog, categories: &[&str]) -> String {
    let recent: BTreeSet<&str> = log
        .recent(ROTATION_WINDOW)
        .iter()
        .map(|entry| entry.category.as_str())
        .collect();
    categories
        .iter()
        .find(|category| !recent.contains(**category))
        .map(|category| category.to_string())
        .unwrap_or_else(|| GENERAL_CATEGORY.to_string())
}
