use std::time::Instant;

use reel_core::{Effect, Millis, Msg, StorageAction, Theme};
use reel_logging::{reel_debug, reel_info, reel_warn};
use reel_store::{load_theme, save_theme, KeyValueStore, SearchHistory, ViewingHistory};

use super::config::ReelConfig;
use super::timers::TimerQueue;

/// Side effects that leave the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    OpenUrl(String),
    RunSearch(String),
}

/// Executes core effects against the store and the timer queue.
pub struct EffectRunner<S> {
    store: S,
    search: SearchHistory,
    viewing: ViewingHistory,
    theme_key: String,
    timers: TimerQueue,
    actions: Vec<HostAction>,
}

impl<S: KeyValueStore> EffectRunner<S> {
    pub fn new(store: S, config: &ReelConfig) -> Self {
        Self {
            store,
            search: config.search_history(),
            viewing: config.viewing_history(),
            theme_key: config.keys.theme.clone(),
            timers: TimerQueue::new(),
            actions: Vec::new(),
        }
    }

    pub fn restore_theme(&self) -> Theme {
        load_theme(&self.store, &self.theme_key)
    }

    /// Runs `effects` in order and returns the messages they produce.
    pub fn run(&mut self, effects: Vec<Effect>, now: Millis, clock: Instant) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::ScheduleTimer { timer, after } => {
                    reel_debug!("ScheduleTimer {:?} after {:?}", timer, after);
                    self.timers.schedule(timer, after, clock);
                }
                Effect::CancelTimer(timer) => {
                    reel_debug!("CancelTimer {:?}", timer);
                    self.timers.cancel(timer);
                }
                Effect::PersistTheme(theme) => {
                    if let Err(err) = save_theme(&mut self.store, &self.theme_key, theme) {
                        reel_warn!("Failed to persist theme {}: {}", theme, err);
                    }
                }
                Effect::RecordSearch(query) => {
                    self.search.record(&mut self.store, &query, now);
                }
                Effect::RunSearch(query) => {
                    reel_info!("RunSearch query_len={}", query.chars().count());
                    self.actions.push(HostAction::RunSearch(query));
                }
                Effect::LoadSearchHistory => {
                    follow_ups.push(Msg::SearchHistoryLoaded(self.search.load(&self.store)));
                }
                Effect::ClearSearchHistory => {
                    let result = self.search.clear(&mut self.store);
                    follow_ups.push(finished(StorageAction::ClearSearchHistory, result));
                }
                Effect::RecordViewing(info) => {
                    reel_info!(
                        "RecordViewing title={} episode={}",
                        info.title,
                        info.episode_index
                    );
                    self.viewing.record(&mut self.store, info, now);
                }
                Effect::LoadViewingHistory => {
                    follow_ups.push(Msg::ViewingHistoryLoaded(self.viewing.load(&self.store)));
                }
                Effect::RemoveViewing { url } => {
                    let result = self.viewing.remove(&mut self.store, &url).map(|_| ());
                    follow_ups.push(finished(StorageAction::DeleteViewingEntry, result));
                }
                Effect::ClearViewingHistory => {
                    let result = self.viewing.clear(&mut self.store);
                    follow_ups.push(finished(StorageAction::ClearViewingHistory, result));
                }
                Effect::OpenUrl(url) => {
                    reel_info!("OpenUrl {}", url);
                    self.actions.push(HostAction::OpenUrl(url));
                }
            }
        }
        follow_ups
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Timer messages for everything due at `clock`.
    pub fn due_timers(&mut self, clock: Instant) -> Vec<Msg> {
        self.timers
            .pop_due(clock)
            .into_iter()
            .map(Msg::TimerElapsed)
            .collect()
    }

    pub fn drain_actions(&mut self) -> Vec<HostAction> {
        std::mem::take(&mut self.actions)
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

fn finished<E: std::fmt::Display>(action: StorageAction, result: Result<(), E>) -> Msg {
    let result = result.map_err(|err| {
        reel_warn!("{:?} failed: {}", action, err);
        err.to_string()
    });
    Msg::StorageActionFinished { action, result }
}
