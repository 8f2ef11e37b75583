use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use chrono::Utc;
use reel_core::{update, AppState, AppViewModel, Effect, Millis, Msg};
use reel_logging::{reel_info, reel_warn};
use reel_store::{FileStore, KeyValueStore, StoreError};

use super::config::{read_config, CONFIG_FILENAME};
use super::effects::{EffectRunner, HostAction};
use super::input::{parse_line, Input, USAGE};
use super::{logging, ui};

pub fn run_app() -> Result<(), StoreError> {
    let loaded = read_config(Path::new(CONFIG_FILENAME));
    let config = loaded.as_ref().cloned().unwrap_or_default();
    logging::initialize(config.log_destination);
    if let Err(err) = &loaded {
        reel_warn!("Using default configuration: {}", err);
    }

    let store = FileStore::open(&config.store_dir)?;
    reel_info!("Opened store at {:?}", store.dir());
    let runner = EffectRunner::new(store, &config);
    let mut controller = Controller::new(AppState::with_settings(config.ui_settings()), runner);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    thread::spawn(move || read_input(input_tx));

    let view = controller.start(now_millis(), Instant::now());
    emit(&mut controller, view);

    let mut input_open = true;
    loop {
        let deadline = controller.next_deadline();
        let view = if input_open {
            let received = match deadline {
                Some(deadline) => {
                    input_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => input_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(Input::Msg(msg)) => controller.dispatch(msg, now_millis(), Instant::now()),
                Ok(Input::Quit) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    reel_info!("Input closed; finishing pending timers");
                    input_open = false;
                    None
                }
                Err(RecvTimeoutError::Timeout) => None,
            }
        } else {
            // Let queued toasts run out before leaving.
            let Some(deadline) = deadline else {
                break;
            };
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
            None
        };
        emit(&mut controller, view);

        let view = controller.fire_due_timers(now_millis(), Instant::now());
        emit(&mut controller, view);
    }

    reel_info!("Exiting");
    Ok(())
}

fn now_millis() -> Millis {
    Utc::now().timestamp_millis()
}

fn read_input(tx: mpsc::Sender<Input>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                reel_warn!("Failed to read input: {}", err);
                break;
            }
        };
        match parse_line(&line) {
            Ok(input) => {
                let quit = input == Input::Quit;
                if tx.send(input).is_err() || quit {
                    break;
                }
            }
            Err(err) => eprintln!("{err}\n{USAGE}"),
        }
    }
}

fn emit<S: KeyValueStore>(controller: &mut Controller<S>, view: Option<AppViewModel>) {
    static OUTPUT_FAILED: AtomicBool = AtomicBool::new(false);

    let actions = controller.drain_actions();
    let stdout = io::stdout();
    if let Err(err) = write_output(&mut stdout.lock(), actions, view.as_ref()) {
        // A closed stdout fails on every call; report it once.
        if !OUTPUT_FAILED.swap(true, Ordering::Relaxed) {
            reel_warn!("Failed to write output: {}", err);
        }
    }
}

fn write_output(
    out: &mut impl Write,
    actions: Vec<HostAction>,
    view: Option<&AppViewModel>,
) -> io::Result<()> {
    for action in actions {
        match action {
            HostAction::OpenUrl(url) => writeln!(out, "open {url}")?,
            HostAction::RunSearch(query) => writeln!(out, "search {query}")?,
        }
    }
    if let Some(view) = view {
        for fragment in ui::render::render(view) {
            writeln!(out, "<!-- #{} -->\n{}", fragment.target, fragment.html)?;
        }
    }
    out.flush()
}

/// Owns the state and the effect runner; feeds effect follow-ups back through `update`.
pub struct Controller<S> {
    state: AppState,
    runner: EffectRunner<S>,
}

impl<S: KeyValueStore> Controller<S> {
    pub fn new(state: AppState, runner: EffectRunner<S>) -> Self {
        Self { state, runner }
    }

    /// Restores the theme and the recent-search row.
    pub fn start(&mut self, now: Millis, clock: Instant) -> Option<AppViewModel> {
        let mut msgs = vec![Msg::ThemeRestored(self.runner.restore_theme())];
        msgs.extend(self.runner.run(vec![Effect::LoadSearchHistory], now, clock));
        self.dispatch_all(msgs, now, clock)
    }

    /// Applies `msg` and everything it leads to. Returns a view when something visible changed.
    pub fn dispatch(&mut self, msg: Msg, now: Millis, clock: Instant) -> Option<AppViewModel> {
        self.dispatch_all(vec![msg], now, clock)
    }

    pub fn fire_due_timers(&mut self, now: Millis, clock: Instant) -> Option<AppViewModel> {
        let msgs = self.runner.due_timers(clock);
        if msgs.is_empty() {
            return None;
        }
        self.dispatch_all(msgs, now, clock)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.runner.next_deadline()
    }

    pub fn drain_actions(&mut self) -> Vec<HostAction> {
        self.runner.drain_actions()
    }

    fn dispatch_all(
        &mut self,
        msgs: Vec<Msg>,
        now: Millis,
        clock: Instant,
    ) -> Option<AppViewModel> {
        let mut inbox: VecDeque<Msg> = msgs.into();
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            inbox.extend(self.runner.run(effects, now, clock));
        }

        if self.state.consume_dirty() {
            Some(self.state.view(now))
        } else {
            None
        }
    }

    #[cfg(test)]
    fn runner(&mut self) -> &mut EffectRunner<S> {
        &mut self.runner
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use reel_core::{Theme, ToastKind, VideoInfo};
    use reel_store::MemoryStore;

    use super::*;
    use crate::platform::config::ReelConfig;

    const NOW: Millis = 1_700_000_000_000;

    /// Writer standing in for a stdout whose reader went away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    fn controller_with(store: MemoryStore) -> Controller<MemoryStore> {
        reel_logging::initialize_for_tests();
        let config = ReelConfig::default();
        Controller::new(
            AppState::with_settings(config.ui_settings()),
            EffectRunner::new(store, &config),
        )
    }

    fn controller() -> Controller<MemoryStore> {
        controller_with(MemoryStore::new())
    }

    fn play(title: &str, url: &str, episode_index: u32, position: Option<f64>) -> Msg {
        Msg::VideoPlayed(VideoInfo {
            url: url.to_string(),
            title: title.to_string(),
            episode_index,
            playback_position: position,
            duration: Some(1200.0),
            ..VideoInfo::default()
        })
    }

    /// Store whose removals always fail, like a host that forbids storage access.
    #[derive(Default)]
    struct LockedStore(MemoryStore);

    impl KeyValueStore for LockedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn start_restores_theme_and_recent_searches() {
        let mut store = MemoryStore::new();
        store.set("theme", "light").unwrap();
        store.set("videoSearchHistory", r#"["old"]"#).unwrap();
        let mut controller = controller_with(store);

        let view = controller.start(NOW, Instant::now()).expect("initial render");
        assert_eq!(view.theme, Theme::Light);
        assert_eq!(view.search_chips.len(), 1);
        assert_eq!(view.search_chips[0].text, "old");
    }

    #[test]
    fn search_records_renders_and_runs() {
        let mut controller = controller();
        let clock = Instant::now();
        controller.dispatch(Msg::SearchSubmitted("first".to_string()), NOW - 1, clock);
        let view = controller
            .dispatch(Msg::SearchSubmitted(" second ".to_string()), NOW, clock)
            .expect("chips changed");

        let texts: Vec<&str> = view.search_chips.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(
            controller.drain_actions(),
            vec![
                HostAction::RunSearch("first".to_string()),
                HostAction::RunSearch("second".to_string()),
            ]
        );
    }

    #[test]
    fn replayed_show_stays_one_row_and_resumes() {
        let mut controller = controller();
        let clock = Instant::now();
        controller.dispatch(play("Show X", "u1", 1, Some(120.0)), NOW - 10, clock);
        controller.dispatch(play("Show X", "u2", 2, Some(5.0)), NOW, clock);
        let view = controller
            .dispatch(Msg::HistoryToggled, NOW, clock)
            .expect("panel opened");

        assert_eq!(view.history_rows.len(), 1);
        let row = &view.history_rows[0];
        assert_eq!(row.url, "u2");
        assert_eq!(row.episode_label, "Episode 3");
        assert_eq!(row.progress.as_ref().map(|p| p.position.as_str()), Some("02:00"));

        controller.dispatch(Msg::HistoryItemActivated { index: 0 }, NOW, clock);
        assert_eq!(
            controller.drain_actions(),
            vec![HostAction::OpenUrl(
                "player.html?url=u2&title=Show+X&index=2&position=120".to_string()
            )]
        );
    }

    #[test]
    fn delete_reports_success_and_refreshes() {
        let mut controller = controller();
        let clock = Instant::now();
        controller.dispatch(play("A", "ua", 0, None), NOW - 1, clock);
        controller.dispatch(play("B", "ub", 0, None), NOW, clock);

        let view = controller
            .dispatch(
                Msg::HistoryItemDeleteRequested {
                    url: "ua".to_string(),
                },
                NOW,
                clock,
            )
            .expect("toast and list changed");
        let titles: Vec<&str> = view.history_rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B"]);
        let toast = view.toast.expect("toast");
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Entry deleted");
    }

    #[test]
    fn failing_clear_surfaces_error_toast() {
        reel_logging::initialize_for_tests();
        let config = ReelConfig::default();
        let mut controller = Controller::new(
            AppState::with_settings(config.ui_settings()),
            EffectRunner::new(LockedStore::default(), &config),
        );

        let view = controller
            .dispatch(Msg::ViewingHistoryClearRequested, NOW, Instant::now())
            .expect("toast shown");
        let toast = view.toast.expect("toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed to clear viewing history");
    }

    #[test]
    fn toasts_advance_on_timer_deadlines() {
        let mut controller = controller();
        let t0 = Instant::now();
        for message in ["one", "two"] {
            controller.dispatch(
                Msg::ToastRequested {
                    message: message.to_string(),
                    kind: ToastKind::Info,
                },
                NOW,
                t0,
            );
        }
        assert_eq!(controller.next_deadline(), Some(t0 + Duration::from_millis(3000)));
        assert!(controller.fire_due_timers(NOW, t0 + Duration::from_millis(2999)).is_none());

        let t1 = t0 + Duration::from_millis(3000);
        let view = controller.fire_due_timers(NOW, t1).expect("leaving");
        assert!(view.toast.as_ref().is_some_and(|t| t.leaving && t.message == "one"));

        let t2 = t1 + Duration::from_millis(300);
        let view = controller.fire_due_timers(NOW, t2).expect("next toast");
        let toast = view.toast.expect("second toast");
        assert_eq!(toast.message, "two");
        assert!(!toast.leaving);

        let t3 = t2 + Duration::from_millis(3300);
        controller.fire_due_timers(NOW, t2 + Duration::from_millis(3000));
        let view = controller.fire_due_timers(NOW, t3).expect("idle again");
        assert_eq!(view.toast, None);
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn restarted_loading_fires_one_timeout() {
        let mut controller = controller();
        let t0 = Instant::now();
        controller.dispatch(Msg::LoadingShown(None), NOW, t0);
        let t1 = t0 + Duration::from_secs(10);
        controller.dispatch(Msg::LoadingShown(Some("again".to_string())), NOW, t1);

        // The first arming would have expired here.
        assert!(controller
            .fire_due_timers(NOW, t0 + Duration::from_secs(30))
            .is_none());

        let view = controller
            .fire_due_timers(NOW, t1 + Duration::from_secs(30))
            .expect("timed out");
        assert_eq!(view.loading_message, None);
        assert_eq!(view.toast.map(|t| t.kind), Some(ToastKind::Warning));
    }

    #[test]
    fn theme_toggle_is_persisted() {
        let mut controller = controller();
        controller.dispatch(Msg::ThemeToggled, NOW, Instant::now());
        assert_eq!(
            controller.runner().store().get("theme").unwrap().as_deref(),
            Some("light")
        );
        controller.runner().store_mut().set("theme", "dark").unwrap();
        assert_eq!(controller.runner().restore_theme(), Theme::Dark);
    }

    #[test]
    fn output_lists_actions_then_fragments() {
        let mut out = Vec::new();
        write_output(
            &mut out,
            vec![HostAction::RunSearch("office".to_string())],
            None,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "search office\n");

        let view = AppState::new().view(NOW);
        let mut out = Vec::new();
        write_output(&mut out, Vec::new(), Some(&view)).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("<!-- #"));
    }

    #[test]
    fn output_write_errors_are_reported() {
        let err = write_output(
            &mut ClosedPipe,
            vec![HostAction::OpenUrl("player.html".to_string())],
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
