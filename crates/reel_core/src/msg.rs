use crate::{SearchEntry, Theme, TimerId, ToastKind, VideoInfo, ViewingEntry};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Theme read back from storage at startup.
    ThemeRestored(Theme),
    ThemeToggled,
    SettingsToggled,
    HistoryToggled,
    /// Click that landed outside the history panel and its toggle button.
    OutsideClicked,
    ModalOpened(String),
    ModalClosed,
    SiteStatusChanged { available: bool },
    /// Show the loading indicator; `None` uses the default message.
    LoadingShown(Option<String>),
    LoadingHidden,
    ToastRequested { message: String, kind: ToastKind },
    TimerElapsed(TimerId),
    /// User submitted the search box.
    SearchSubmitted(String),
    /// User clicked a chip in the recent-searches row.
    SearchChipClicked(String),
    SearchHistoryLoaded(Vec<SearchEntry>),
    /// User asked to wipe the search history.
    SearchHistoryClearRequested,
    /// Player reported something being watched.
    VideoPlayed(VideoInfo),
    ViewingHistoryLoaded(Vec<ViewingEntry>),
    /// User clicked a row of the viewing history.
    HistoryItemActivated { index: usize },
    /// User clicked the delete icon on a row.
    HistoryItemDeleteRequested { url: String },
    ViewingHistoryClearRequested,
    /// Outcome of a destructive storage action.
    StorageActionFinished {
        action: StorageAction,
        result: Result<(), String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Destructive actions whose outcome is reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    ClearSearchHistory,
    ClearViewingHistory,
    DeleteViewingEntry,
}

impl StorageAction {
    pub(crate) fn success_message(self) -> &'static str {
        match self {
            Self::ClearSearchHistory => "Search history cleared",
            Self::ClearViewingHistory => "Viewing history cleared",
            Self::DeleteViewingEntry => "Entry deleted",
        }
    }

    pub(crate) fn failure_message(self) -> &'static str {
        match self {
            Self::ClearSearchHistory => "Failed to clear search history",
            Self::ClearViewingHistory => "Failed to clear viewing history",
            Self::DeleteViewingEntry => "Failed to delete entry",
        }
    }
}
