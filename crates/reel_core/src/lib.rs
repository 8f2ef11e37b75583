//! Reel core: pure UI state machine, history data model and view-model helpers.
mod effect;
mod entry;
mod msg;
pub mod present;
mod state;
mod toast;
mod update;
mod view_model;

pub use effect::{Effect, TimerId};
pub use entry::{Millis, SearchEntry, VideoInfo, ViewingEntry};
pub use msg::{Msg, StorageAction};
pub use state::{AppState, Theme, UiSettings, DEFAULT_LOADING_MESSAGE, DEFAULT_PLAYER_PAGE};
pub use toast::{ToastKind, ToastPhase, ToastRequest, ToastSequencer, ToastTimer};
pub use update::update;
pub use view_model::{AppViewModel, HistoryRowView, SearchChipView, ToastView};
