use std::time::Duration;

use crate::{Theme, VideoInfo};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver `Msg::TimerElapsed(timer)` after `after`.
    ScheduleTimer { timer: TimerId, after: Duration },
    CancelTimer(TimerId),
    PersistTheme(Theme),
    RecordSearch(String),
    /// Hand the (trimmed) query to whatever performs the actual search.
    RunSearch(String),
    LoadSearchHistory,
    ClearSearchHistory,
    RecordViewing(VideoInfo),
    LoadViewingHistory,
    RemoveViewing { url: String },
    ClearViewingHistory,
    /// Open a new browsing context at this address.
    OpenUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerId {
    ToastHold,
    ToastExit,
    /// Auto-close of the loading indicator. `generation` ties the timer to
    /// the `LoadingShown` that armed it.
    LoadingTimeout { generation: u64 },
}
