use reel_logging::reel_debug;

use crate::state::DEFAULT_LOADING_MESSAGE;
use crate::{AppState, Effect, Msg, TimerId, ToastKind, ToastRequest, ToastTimer};

const LOADING_TIMEOUT_MESSAGE: &str = "Operation timed out, please try again later";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ThemeRestored(theme) => {
            state.theme = theme;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ThemeToggled => {
            state.theme = state.theme.toggled();
            state.mark_dirty();
            vec![Effect::PersistTheme(state.theme)]
        }
        Msg::SettingsToggled => {
            state.settings_open = !state.settings_open;
            // The two side panels never overlap.
            state.history_open = false;
            state.mark_dirty();
            Vec::new()
        }
        Msg::HistoryToggled => {
            state.history_open = !state.history_open;
            state.settings_open = false;
            state.mark_dirty();
            if state.history_open {
                vec![Effect::LoadViewingHistory]
            } else {
                Vec::new()
            }
        }
        Msg::OutsideClicked => {
            if state.history_open {
                state.history_open = false;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ModalOpened(content) => {
            state.modal = Some(content);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ModalClosed => {
            if state.modal.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SiteStatusChanged { available } => {
            state.site_available = Some(available);
            state.mark_dirty();
            Vec::new()
        }
        Msg::LoadingShown(message) => show_loading(&mut state, message),
        Msg::LoadingHidden => hide_loading(&mut state),
        Msg::ToastRequested { message, kind } => {
            enqueue_toast(&mut state, ToastRequest::new(message, kind))
        }
        Msg::TimerElapsed(timer) => timer_elapsed(&mut state, timer),
        Msg::SearchSubmitted(query) | Msg::SearchChipClicked(query) => {
            let trimmed = query.trim();
            if trimmed.is_empty() {
                return (state, Vec::new());
            }
            let trimmed = trimmed.to_string();
            vec![
                Effect::RecordSearch(query),
                Effect::LoadSearchHistory,
                Effect::RunSearch(trimmed),
            ]
        }
        Msg::SearchHistoryLoaded(entries) => {
            state.search_history = entries;
            state.mark_dirty();
            Vec::new()
        }
        Msg::SearchHistoryClearRequested => vec![Effect::ClearSearchHistory],
        Msg::VideoPlayed(info) => {
            let mut effects = vec![Effect::RecordViewing(info)];
            if state.history_open {
                effects.push(Effect::LoadViewingHistory);
            }
            effects
        }
        Msg::ViewingHistoryLoaded(entries) => {
            state.viewing_history = entries;
            state.mark_dirty();
            Vec::new()
        }
        Msg::HistoryItemActivated { index } => match state.viewing_history.get(index) {
            Some(entry) => vec![Effect::OpenUrl(crate::present::resume_url(
                &state.settings.player_page,
                &entry.url,
                &entry.title,
                entry.episode_index,
                entry.playback_position,
            ))],
            None => Vec::new(),
        },
        Msg::HistoryItemDeleteRequested { url } => vec![Effect::RemoveViewing { url }],
        Msg::ViewingHistoryClearRequested => vec![Effect::ClearViewingHistory],
        Msg::StorageActionFinished { action, result } => {
            let toast = match result {
                Ok(()) => ToastRequest::new(action.success_message(), ToastKind::Success),
                Err(reason) => {
                    reel_debug!("Storage action {:?} failed: {}", action, reason);
                    ToastRequest::new(action.failure_message(), ToastKind::Error)
                }
            };
            let mut effects = enqueue_toast(&mut state, toast);
            effects.push(match action {
                crate::StorageAction::ClearSearchHistory => Effect::LoadSearchHistory,
                crate::StorageAction::ClearViewingHistory
                | crate::StorageAction::DeleteViewingEntry => Effect::LoadViewingHistory,
            });
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn enqueue_toast(state: &mut AppState, request: ToastRequest) -> Vec<Effect> {
    let armed = state.toasts.enqueue(request);
    state.mark_dirty();
    arm_toast_timer(state, armed)
}

fn arm_toast_timer(state: &AppState, timer: Option<ToastTimer>) -> Vec<Effect> {
    match timer {
        Some(ToastTimer::Hold) => vec![Effect::ScheduleTimer {
            timer: TimerId::ToastHold,
            after: state.settings.toast_hold,
        }],
        Some(ToastTimer::Exit) => vec![Effect::ScheduleTimer {
            timer: TimerId::ToastExit,
            after: state.settings.toast_exit,
        }],
        None => Vec::new(),
    }
}

fn timer_elapsed(state: &mut AppState, timer: TimerId) -> Vec<Effect> {
    match timer {
        TimerId::ToastHold => {
            let next = state.toasts.hold_elapsed();
            if next.is_none() {
                reel_debug!("Stray toast hold timer ignored");
                return Vec::new();
            }
            state.mark_dirty();
            arm_toast_timer(state, next)
        }
        TimerId::ToastExit => {
            let was_idle = state.toasts.is_idle();
            let next = state.toasts.exit_elapsed();
            if !was_idle {
                state.mark_dirty();
            }
            arm_toast_timer(state, next)
        }
        TimerId::LoadingTimeout { generation } => {
            if state.loading.armed != Some(generation) {
                reel_debug!("Stale loading timeout {} ignored", generation);
                return Vec::new();
            }
            state.loading.armed = None;
            state.loading.message = None;
            state.mark_dirty();
            enqueue_toast(
                state,
                ToastRequest::new(LOADING_TIMEOUT_MESSAGE, ToastKind::Warning),
            )
        }
    }
}

fn show_loading(state: &mut AppState, message: Option<String>) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(previous) = state.loading.armed.take() {
        effects.push(Effect::CancelTimer(TimerId::LoadingTimeout {
            generation: previous,
        }));
    }
    state.loading.generation += 1;
    let generation = state.loading.generation;
    state.loading.armed = Some(generation);
    state.loading.message = Some(message.unwrap_or_else(|| DEFAULT_LOADING_MESSAGE.to_string()));
    state.mark_dirty();
    effects.push(Effect::ScheduleTimer {
        timer: TimerId::LoadingTimeout { generation },
        after: state.settings.loading_timeout,
    });
    effects
}

fn hide_loading(state: &mut AppState) -> Vec<Effect> {
    let mut effects = Vec::new();
    if let Some(generation) = state.loading.armed.take() {
        effects.push(Effect::CancelTimer(TimerId::LoadingTimeout { generation }));
    }
    if state.loading.message.take().is_some() {
        state.mark_dirty();
    }
    effects
}
