//! Reel store: host key-value persistence and the history managers built on it.
mod file_store;
mod keys;
mod preferences;
mod search_history;
mod store;
mod viewing_history;

pub use file_store::{ensure_store_dir, FileStore};
pub use keys::StoreKeys;
pub use preferences::{load_theme, save_theme};
pub use search_history::{
    normalize_query, SearchHistory, DEFAULT_MAX_SEARCH_ITEMS, MAX_QUERY_CHARS, SEARCH_WINDOW_MS,
};
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use viewing_history::{ViewingHistory, DEFAULT_MAX_VIEWING_ITEMS};
