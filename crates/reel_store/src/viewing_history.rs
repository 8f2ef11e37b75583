//! Shows the user has watched, one entry per title.

use reel_core::present::RESUME_THRESHOLD_SECS;
use reel_core::{Millis, VideoInfo, ViewingEntry};
use reel_logging::{reel_debug, reel_error, reel_info, reel_warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::write_json;
use crate::{KeyValueStore, StoreError};

pub const DEFAULT_MAX_VIEWING_ITEMS: usize = 50;

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StoredItem {
    Entry(ViewingEntry),
    Opaque(Value),
}

impl StoredItem {
    fn url(&self) -> Option<&str> {
        match self {
            Self::Entry(entry) => Some(&entry.url),
            Self::Opaque(value) => value.get("url").and_then(Value::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewingHistory {
    key: String,
    max_items: usize,
}

impl ViewingHistory {
    pub fn new(key: impl Into<String>, max_items: usize) -> Self {
        Self {
            key: key.into(),
            max_items: max_items.max(1),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored list. Missing, unreadable or malformed data reads as empty.
    pub fn load(&self, store: &dyn KeyValueStore) -> Vec<ViewingEntry> {
        self.load_items(store)
            .into_iter()
            .filter_map(|item| match item {
                StoredItem::Entry(entry) => Some(entry),
                StoredItem::Opaque(_) => None,
            })
            .collect()
    }

    /// Every stored item in order. Items that do not read as an entry are kept
    /// as they are so that rewriting the list does not lose them.
    fn load_items(&self, store: &dyn KeyValueStore) -> Vec<StoredItem> {
        let raw = match store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                reel_warn!("Failed to read viewing history {:?}: {}", self.key, err);
                return Vec::new();
            }
        };

        let items: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                reel_warn!("Discarding malformed viewing history {:?}: {}", self.key, err);
                return Vec::new();
            }
        };

        items
            .into_iter()
            .map(|item| match ViewingEntry::deserialize(&item) {
                Ok(entry) => StoredItem::Entry(entry),
                Err(err) => {
                    reel_debug!("Keeping unreadable viewing history item as is: {}", err);
                    StoredItem::Opaque(item)
                }
            })
            .collect()
    }

    /// Records a playback report.
    ///
    /// A report for a title already in the list updates that entry (episode,
    /// link, and progress when it is past the resume threshold) and moves it
    /// to the front. Failures are logged, never returned.
    pub fn record(&self, store: &mut dyn KeyValueStore, info: VideoInfo, now: Millis) {
        let mut items = self.load_items(store);

        let existing = items.iter().position(|item| match item {
            StoredItem::Entry(entry) => entry.title == info.title,
            StoredItem::Opaque(_) => false,
        });
        match existing.map(|index| items.remove(index)) {
            Some(StoredItem::Entry(mut entry)) => {
                merge_replay(&mut entry, info, now);
                items.insert(0, StoredItem::Entry(entry));
            }
            _ => items.insert(0, StoredItem::Entry(ViewingEntry::from_video(info, now))),
        }
        items.truncate(self.max_items);

        if let Err(err) = write_json(store, &self.key, &items) {
            reel_error!("Failed to save viewing history {:?}: {}", self.key, err);
        }
    }

    /// Drops every entry whose link is exactly `url`. Returns how many went.
    pub fn remove(&self, store: &mut dyn KeyValueStore, url: &str) -> Result<usize, StoreError> {
        let mut items = self.load_items(store);
        let before = items.len();
        items.retain(|item| item.url() != Some(url));
        let removed = before - items.len();

        write_json(store, &self.key, &items)?;
        reel_info!("Removed {} viewing history entries for {}", removed, url);
        Ok(removed)
    }

    pub fn clear(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.remove(&self.key)
    }
}

fn merge_replay(entry: &mut ViewingEntry, info: VideoInfo, now: Millis) {
    entry.episode_index = info.episode_index;
    entry.timestamp = now;

    let has_source = entry.source_name.as_deref().is_some_and(|s| !s.is_empty());
    if !has_source {
        if let Some(source) = info.source_name.filter(|s| !s.is_empty()) {
            entry.source_name = Some(source);
        }
    }

    if let Some(position) = info
        .playback_position
        .filter(|p| *p > RESUME_THRESHOLD_SECS)
    {
        entry.playback_position = Some(position);
        if let Some(duration) = info.duration.filter(|d| *d > 0.0) {
            entry.duration = Some(duration);
        }
    }

    entry.url = info.url;
}
