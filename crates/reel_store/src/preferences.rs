use reel_core::Theme;
use reel_logging::reel_warn;

use crate::{KeyValueStore, StoreError};

/// Stored theme, or the default when nothing usable is stored.
pub fn load_theme(store: &dyn KeyValueStore, key: &str) -> Theme {
    match store.get(key) {
        Ok(Some(raw)) => Theme::parse(&raw),
        Ok(None) => Theme::default(),
        Err(err) => {
            reel_warn!("Failed to read theme from {:?}: {}", key, err);
            Theme::default()
        }
    }
}

pub fn save_theme(
    store: &mut dyn KeyValueStore,
    key: &str,
    theme: Theme,
) -> Result<(), StoreError> {
    store.set(key, theme.as_str())
}
