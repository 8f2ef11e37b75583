use crate::present::PlaybackProgress;
use crate::{Theme, ToastKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub theme: Theme,
    pub settings_open: bool,
    pub history_open: bool,
    pub modal: Option<String>,
    pub site_available: Option<bool>,
    /// `Some` while the loading indicator is shown.
    pub loading_message: Option<String>,
    pub toast: Option<ToastView>,
    pub pending_toasts: usize,
    pub search_chips: Vec<SearchChipView>,
    pub history_rows: Vec<HistoryRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    /// The exit transition is running.
    pub leaving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchChipView {
    pub text: String,
    /// Absent for entries migrated from the legacy format.
    pub searched_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub title: String,
    pub url: String,
    pub source_name: Option<String>,
    pub episode_label: String,
    pub progress: Option<PlaybackProgress>,
    pub time_label: String,
    pub resume_url: String,
}
