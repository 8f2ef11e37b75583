//! Recently run search queries.
//!
//! The list is most-recent-first, unique by text, capped, and limited to a
//! 60 day window. Expiry and eviction only happen when a query is recorded.

use reel_core::{Millis, SearchEntry};
use reel_logging::{reel_debug, reel_error, reel_warn};
use serde::Deserialize;

use crate::store::write_json;
use crate::{KeyValueStore, StoreError};

/// Queries older than this are dropped on the next write.
pub const SEARCH_WINDOW_MS: Millis = 60 * 24 * 60 * 60 * 1000;
/// Longest query kept, counted before escaping.
pub const MAX_QUERY_CHARS: usize = 50;
pub const DEFAULT_MAX_SEARCH_ITEMS: usize = 5;
/// How many entries survive when a full write is rejected.
const FALLBACK_ENTRIES: usize = 3;

/// Both shapes found in storage: bare strings from older builds, and entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredQuery {
    Legacy(String),
    Entry(SearchEntry),
}

impl From<StoredQuery> for SearchEntry {
    fn from(stored: StoredQuery) -> Self {
        match stored {
            StoredQuery::Legacy(text) => SearchEntry::new(text, 0),
            StoredQuery::Entry(entry) => entry,
        }
    }
}

/// Trim, cut to [`MAX_QUERY_CHARS`], then escape angle brackets.
/// `None` for blank input.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cut: String = trimmed.chars().take(MAX_QUERY_CHARS).collect();
    Some(cut.replace('<', "&lt;").replace('>', "&gt;"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    key: String,
    max_items: usize,
}

impl SearchHistory {
    pub fn new(key: impl Into<String>, max_items: usize) -> Self {
        Self {
            key: key.into(),
            max_items: max_items.max(1),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Reads the stored list. Missing, unreadable or malformed data reads as empty.
    pub fn load(&self, store: &dyn KeyValueStore) -> Vec<SearchEntry> {
        let raw = match store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                reel_warn!("Failed to read search history {:?}: {}", self.key, err);
                return Vec::new();
            }
        };

        let items: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                reel_warn!("Discarding malformed search history {:?}: {}", self.key, err);
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter_map(|item| match StoredQuery::deserialize(item) {
                Ok(stored) => Some(SearchEntry::from(stored)),
                Err(err) => {
                    reel_debug!("Skipping unreadable search history item: {}", err);
                    None
                }
            })
            .filter(|entry| !entry.text.is_empty())
            .collect()
    }

    /// Records `query` as the most recent search. Blank queries are ignored.
    ///
    /// Never fails: a rejected write is retried once with only the newest
    /// few entries, and a second rejection is only logged.
    pub fn record(&self, store: &mut dyn KeyValueStore, query: &str, now: Millis) {
        let Some(text) = normalize_query(query) else {
            return;
        };

        let mut history = self.load(store);
        history.retain(|entry| {
            entry.timestamp > 0
                && now.saturating_sub(entry.timestamp) < SEARCH_WINDOW_MS
                && entry.text != text
        });
        history.insert(0, SearchEntry::new(text, now));
        history.truncate(self.max_items);

        let Err(err) = write_json(store, &self.key, &history) else {
            return;
        };
        reel_warn!("Failed to save search history {:?}: {}", self.key, err);

        let kept = &history[..history.len().min(FALLBACK_ENTRIES)];
        let retry = match store.remove(&self.key) {
            Ok(()) => write_json(store, &self.key, kept),
            Err(err) => Err(err),
        };
        if let Err(err) = retry {
            reel_error!("Retry saving search history {:?} failed: {}", self.key, err);
        }
    }

    pub fn clear(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_escapes_after_cutting() {
        let long = format!("{}<b>", "x".repeat(48));
        assert_eq!(normalize_query(&long), Some(format!("{}&lt;b", "x".repeat(48))));
        assert_eq!(normalize_query(" \t\n"), None);
    }

    #[test]
    fn normalize_counts_characters_not_bytes() {
        let query = "剧".repeat(60);
        assert_eq!(normalize_query(&query).map(|t| t.chars().count()), Some(50));
    }
}
