//! Element ids of the page regions the renderer fills.

pub const ROOT: &str = "documentElement";
pub const THEME_ICON: &str = "themeIcon";
pub const TOAST: &str = "toast";
pub const LOADING: &str = "loading";
pub const SITE_STATUS: &str = "siteStatus";
pub const MODAL: &str = "modal";
pub const SETTINGS_PANEL: &str = "settingsPanel";
pub const HISTORY_PANEL: &str = "historyPanel";
pub const RECENT_SEARCHES: &str = "recentSearches";
pub const HISTORY_LIST: &str = "historyList";

/// Lists longer than this get bottom padding so the panel footer never hides a row.
pub const HISTORY_PADDING_THRESHOLD: usize = 5;
