use std::fmt;
use std::time::Duration;

use crate::view_model::{AppViewModel, HistoryRowView, SearchChipView, ToastView};
use crate::{present, Millis, SearchEntry, ToastPhase, ToastSequencer, ViewingEntry};

pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";
pub const DEFAULT_PLAYER_PAGE: &str = "player.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Unknown values fall back to the default theme.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "light" => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durations and addresses the state machine hands out in effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSettings {
    pub toast_hold: Duration,
    pub toast_exit: Duration,
    pub loading_timeout: Duration,
    pub player_page: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            toast_hold: Duration::from_millis(3000),
            toast_exit: Duration::from_millis(300),
            loading_timeout: Duration::from_millis(30_000),
            player_page: DEFAULT_PLAYER_PAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LoadingState {
    pub(crate) message: Option<String>,
    /// Generation of the pending timeout, if one is armed.
    pub(crate) armed: Option<u64>,
    pub(crate) generation: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) settings: UiSettings,
    pub(crate) theme: Theme,
    pub(crate) settings_open: bool,
    pub(crate) history_open: bool,
    pub(crate) modal: Option<String>,
    pub(crate) site_available: Option<bool>,
    pub(crate) loading: LoadingState,
    pub(crate) toasts: ToastSequencer,
    pub(crate) search_history: Vec<SearchEntry>,
    pub(crate) viewing_history: Vec<ViewingEntry>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: UiSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &UiSettings {
        &self.settings
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toasts(&self) -> &ToastSequencer {
        &self.toasts
    }

    pub fn viewing_history(&self) -> &[ViewingEntry] {
        &self.viewing_history
    }

    /// Projects the state for rendering. `now` drives the relative-time labels.
    pub fn view(&self, now: Millis) -> AppViewModel {
        let toast = self.toasts.current().map(|(request, phase)| ToastView {
            message: request.message.clone(),
            kind: request.kind,
            leaving: phase == ToastPhase::Leaving,
        });

        let search_chips = self
            .search_history
            .iter()
            .map(|entry| SearchChipView {
                text: entry.text.clone(),
                searched_at: (entry.timestamp > 0)
                    .then(|| present::relative_time_label(entry.timestamp, now)),
            })
            .collect();

        let history_rows = self
            .viewing_history
            .iter()
            .map(|entry| HistoryRowView {
                title: entry.title.clone(),
                url: entry.url.clone(),
                source_name: entry.source_name.clone(),
                episode_label: format!("Episode {}", u64::from(entry.episode_index) + 1),
                progress: present::playback_progress(entry.playback_position, entry.duration),
                time_label: present::relative_time_label(entry.timestamp, now),
                resume_url: present::resume_url(
                    &self.settings.player_page,
                    &entry.url,
                    &entry.title,
                    entry.episode_index,
                    entry.playback_position,
                ),
            })
            .collect();

        AppViewModel {
            theme: self.theme,
            settings_open: self.settings_open,
            history_open: self.history_open,
            modal: self.modal.clone(),
            site_available: self.site_available,
            loading_message: self.loading.message.clone(),
            toast,
            pending_toasts: self.toasts.pending(),
            search_chips,
            history_rows,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
