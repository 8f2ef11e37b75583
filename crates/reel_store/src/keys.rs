use serde::{Deserialize, Serialize};

/// Every storage key the page uses, named in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    pub search_history: String,
    pub viewing_history: String,
    pub theme: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            search_history: "videoSearchHistory".to_string(),
            viewing_history: "viewingHistory".to_string(),
            theme: "theme".to_string(),
        }
    }
}
