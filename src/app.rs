use std::time::Duration;

use dioxus::{core::spawn_forever, prelude::*, signals::Signal};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    config::DashboardConfig,
    domain::{AppState, Busy, LoadSource, PollBudget, PollOutcome, PollStep, StatusKind},
    infra::{dispatch::SearchTrigger, loader::load_with_fallback, snapshot::SnapshotStore},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{DashboardPage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state, PersistSaveError},
    },
};

pub const STATUS_SEARCHING: &str = "Running search...";
pub const STATUS_TRIGGERED: &str =
    "Search triggered! GitHub Action is running the scraper. Results will appear in ~2-3 minutes.";
pub const STATUS_DEMO: &str =
    "Demo Mode: Refreshing current data (GitHub Actions requires authentication for real-time triggering)";
pub const STATUS_DEMO_DONE: &str =
    "Data refreshed! For real-time scraping, set up GitHub token authentication.";
pub const STATUS_FAILED: &str = "Search failed. Please try again.";
pub const STATUS_POLL_DONE: &str = "Search completed! Dashboard updated with latest results.";

const VISIBILITY_SCRIPT: &str = r#"
    document.addEventListener("visibilitychange", () => dioxus.send(document.hidden));
    await new Promise(() => {});
"#;

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/settings")]
    Settings {},
}

/// Window visibility, forwarded to the auto-refresh loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Signals shared by the dashboard's background work. All of them live in the
/// root scope, so tasks holding a copy keep working across page changes.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub state: Signal<AppState>,
    pub toasts: Signal<Vec<ToastMessage>>,
    pub config: Signal<DashboardConfig>,
    pub snapshots: Signal<SnapshotStore>,
}

fn use_app_context(
    config: impl FnOnce() -> DashboardConfig,
    snapshots: impl FnOnce() -> SnapshotStore,
) -> AppContext {
    let state = use_signal(AppState::default);
    let toasts = use_signal(Vec::<ToastMessage>::new);
    let config = use_signal(config);
    let snapshots = use_signal(snapshots);

    use_context_provider(|| state);
    use_context_provider(|| toasts);
    use_context_provider(|| config);
    use_context_provider(|| AppContext {
        state,
        toasts,
        config,
        snapshots,
    })
}

#[component]
pub fn App() -> Element {
    let ctx = use_app_context(load_config, SnapshotStore::open_default);
    use_hook(move || {
        if let Some(saved) = load_persisted_state() {
            let mut state = ctx.state;
            state.with_mut(|st| st.apply_persisted(saved));
        }
    });

    let refresher =
        use_coroutine(move |rx: UnboundedReceiver<Visibility>| auto_refresh(ctx, rx));
    let _visibility = use_future(move || watch_visibility(refresher));

    rsx! {
        document::Title { "{crate::util::APP_NAME}" }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

fn load_config() -> DashboardConfig {
    match DashboardConfig::load() {
        Ok(config) => config,
        Err(err) => {
            warn!("using default settings: {err}");
            DashboardConfig::default()
        }
    }
}

pub fn persist_user_state(state: &Signal<AppState>) -> Result<(), PersistSaveError> {
    let snapshot = state.with(|st| st.to_persisted());
    save_persisted_state(&snapshot)
        .inspect_err(|err| warn!("failed to persist user state: {err}"))
}

/// Holds one of the busy flags and clears it on drop, also when the owning
/// task is cancelled.
struct BusyGuard {
    state: Signal<AppState>,
    busy: Busy,
}

impl BusyGuard {
    fn acquire(mut state: Signal<AppState>, busy: Busy) -> Option<Self> {
        state
            .with_mut(|st| st.begin(busy))
            .then_some(Self { state, busy })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        // The signal is gone once the whole app has shut down.
        if let Ok(mut st) = self.state.try_write() {
            st.finish(self.busy);
        }
    }
}

/// Initial load, then a reload every refresh interval while the window is visible.
/// Becoming visible again restarts the timer and reloads right away.
async fn auto_refresh(ctx: AppContext, mut visibility: UnboundedReceiver<Visibility>) {
    let mut state = ctx.state;
    state.with_mut(|st| st.stamp_updated());
    refresh_dashboard(ctx).await;

    let mut running = true;
    loop {
        let interval = ctx.config.peek().refresh_interval();
        tokio::select! {
            _ = tokio::time::sleep(interval), if running => {
                debug!("auto-refresh tick");
                refresh_dashboard(ctx).await;
                state.with_mut(|st| st.stamp_updated());
            }
            change = visibility.next() => match change {
                Some(Visibility::Hidden) => {
                    debug!("window hidden; pausing auto-refresh");
                    running = false;
                }
                Some(Visibility::Visible) => {
                    debug!("window visible; resuming auto-refresh");
                    running = true;
                    refresh_dashboard(ctx).await;
                    state.with_mut(|st| st.stamp_updated());
                }
                None => break,
            }
        }
    }
}

async fn watch_visibility(refresher: Coroutine<Visibility>) {
    let mut listener = document::eval(VISIBILITY_SCRIPT);
    loop {
        match listener.recv::<bool>().await {
            Ok(hidden) => refresher.send(if hidden {
                Visibility::Hidden
            } else {
                Visibility::Visible
            }),
            Err(err) => {
                debug!("visibility listener stopped: {err:?}");
                break;
            }
        }
    }
}

/// Reloads listings and statistics, falling back to the snapshot or sample set.
pub async fn refresh_dashboard(ctx: AppContext) -> LoadSource {
    let location = ctx.config.peek().data_url.clone();
    let store = SnapshotStore::clone(&ctx.snapshots.peek());
    let loaded = load_with_fallback(&location, &store).await;

    if let Some(err) = loaded.error.as_ref() {
        debug!(source = ?loaded.source, "using fallback results: {err}");
    }

    let mut state = ctx.state;
    let previous = state.peek().source;
    if previous != Some(loaded.source) {
        match (loaded.source, loaded.snapshot_age.as_deref()) {
            (LoadSource::Live, _) if previous.is_some() => {
                push_toast(ctx.toasts, ToastKind::Success, "Listing feed is reachable again.");
            }
            (LoadSource::Cached, Some(age)) => push_toast(
                ctx.toasts,
                ToastKind::Warning,
                format!("Listing feed unavailable; showing the snapshot saved {age} ago."),
            ),
            (LoadSource::Sample, _) => push_toast(
                ctx.toasts,
                ToastKind::Info,
                "No listing feed found; showing sample data.",
            ),
            _ => {}
        }
    }

    let source = loaded.source;
    state.with_mut(|st| st.apply_results(loaded.results, source));
    source
}

/// Starts a manual refresh in the root scope.
pub fn start_refresh(ctx: AppContext) {
    spawn_forever(refresh_results(ctx));
}

/// Starts "Search Now" in the root scope.
pub fn start_search(ctx: AppContext) {
    spawn_forever(run_new_search(ctx));
}

/// Manual refresh: stamp, reload, then hold the button disabled briefly.
async fn refresh_results(ctx: AppContext) {
    let Some(_busy) = BusyGuard::acquire(ctx.state, Busy::Refreshing) else {
        return;
    };
    let mut state = ctx.state;
    state.with_mut(|st| st.stamp_updated());

    refresh_dashboard(ctx).await;

    let cooldown = ctx.config.peek().refresh_cooldown();
    tokio::time::sleep(cooldown).await;
}

/// "Search Now": dispatch the remote workflow, or refresh in demo mode.
/// Whatever status the run ends on is cleared after the status delay.
async fn run_new_search(ctx: AppContext) {
    let Some(_busy) = BusyGuard::acquire(ctx.state, Busy::Searching) else {
        return;
    };
    let mut state = ctx.state;
    state.with_mut(|st| st.set_status(StatusKind::Searching, STATUS_SEARCHING));

    let (github, clear_after, demo_delay) = {
        let cfg = ctx.config.peek();
        (
            cfg.github.clone(),
            cfg.status_clear_delay(),
            cfg.demo_refresh_delay(),
        )
    };
    let token = state.peek().token.clone();

    let status_id = match SearchTrigger::new(github) {
        Ok(trigger) => {
            let outcome = trigger.trigger(token.as_ref()).await;
            info!(?outcome, "search trigger finished");
            if outcome.is_live() {
                let id = state.with_mut(|st| st.set_status(StatusKind::Success, STATUS_TRIGGERED));
                start_poll_loop(ctx);
                id
            } else {
                let id = state.with_mut(|st| st.set_status(StatusKind::Info, STATUS_DEMO));
                spawn_forever(demo_refresh(ctx, demo_delay, clear_after));
                id
            }
        }
        Err(err) => {
            warn!("search trigger unavailable: {err}");
            state.with_mut(|st| st.set_status(StatusKind::Error, STATUS_FAILED))
        }
    };

    schedule_status_clear(state, status_id, clear_after);
}

async fn demo_refresh(ctx: AppContext, delay: Duration, clear_after: Duration) {
    tokio::time::sleep(delay).await;
    refresh_dashboard(ctx).await;
    let mut state = ctx.state;
    let id = state.with_mut(|st| {
        st.stamp_updated();
        st.set_status(StatusKind::Success, STATUS_DEMO_DONE)
    });
    schedule_status_clear(state, id, clear_after);
}

fn schedule_status_clear(mut state: Signal<AppState>, id: String, delay: Duration) {
    spawn_forever(async move {
        tokio::time::sleep(delay).await;
        state.with_mut(|st| st.clear_status(&id));
    });
}

fn start_poll_loop(ctx: AppContext) {
    let Some(busy) = BusyGuard::acquire(ctx.state, Busy::Polling) else {
        debug!("poll loop already running");
        return;
    };
    spawn_forever(async move {
        let outcome = run_poll_loop(ctx, busy).await;
        info!(?outcome, "poll loop finished");
    });
}

/// Re-fetches every poll interval until the attempt budget runs out.
async fn run_poll_loop(ctx: AppContext, busy: BusyGuard) -> PollOutcome {
    let (interval, max_polls) = {
        let cfg = ctx.config.peek();
        (cfg.poll_interval(), cfg.max_polls)
    };
    let mut budget = PollBudget::new(max_polls);

    let outcome = loop {
        tokio::time::sleep(interval).await;
        let step = budget.tick();
        let source = refresh_dashboard(ctx).await;
        debug!(
            attempt = budget.attempts(),
            remaining = budget.remaining(),
            ?source,
            "poll attempt"
        );
        if step == PollStep::Exhausted {
            break if source == LoadSource::Live {
                PollOutcome::Completed
            } else {
                PollOutcome::GaveUp
            };
        }
    };

    drop(busy);
    if outcome == PollOutcome::Completed {
        let mut state = ctx.state;
        state.with_mut(|st| {
            st.set_status(StatusKind::Success, STATUS_POLL_DONE);
            st.stamp_updated();
        });
    }
    outcome
}

#[component]
pub fn Dashboard() -> Element {
    rsx! { Shell { DashboardPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, fs, path::Path, path::PathBuf, rc::Rc};

    use dioxus::core::NoOpMutations;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        time::Instant,
    };

    use crate::config::GithubConfig;

    type Handles = Rc<RefCell<Option<(AppContext, Coroutine<Visibility>)>>>;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Action {
        Refresh,
        Search,
        Poll,
    }

    #[derive(Clone)]
    struct Harness {
        config: DashboardConfig,
        snapshot: PathBuf,
        action: Option<Action>,
        auto_refresh: bool,
        close_page_after: Option<Duration>,
        handles: Handles,
    }

    /// Stands in for `App`: owns the context and mounts one page that kicks
    /// off `action`, optionally closing that page again.
    fn harness_root(props: Harness) -> Element {
        let ctx = use_app_context(
            || props.config.clone(),
            || SnapshotStore::at(&props.snapshot),
        );
        let auto = props.auto_refresh;
        let refresher = use_coroutine(move |rx: UnboundedReceiver<Visibility>| async move {
            if auto {
                auto_refresh(ctx, rx).await;
            }
        });
        use_hook(|| {
            *props.handles.borrow_mut() = Some((ctx, refresher));
        });

        let mut page_open = use_signal(|| true);
        let close_after = props.close_page_after;
        use_future(move || async move {
            if let Some(after) = close_after {
                tokio::time::sleep(after).await;
                page_open.set(false);
            }
        });

        let action = props.action;
        rsx! {
            if page_open() {
                ActionPage { action }
            }
        }
    }

    #[component]
    fn ActionPage(action: Option<Action>) -> Element {
        let ctx = use_context::<AppContext>();
        use_hook(move || match action {
            Some(Action::Refresh) => start_refresh(ctx),
            Some(Action::Search) => start_search(ctx),
            Some(Action::Poll) => start_poll_loop(ctx),
            None => {}
        });
        rsx! { div {} }
    }

    fn write_feed(path: &Path, total_searches: u64) {
        fs::write(
            path,
            format!(r#"{{"total_searches": {total_searches}, "matches": []}}"#),
        )
        .unwrap();
    }

    fn fast_config(feed: &Path) -> DashboardConfig {
        DashboardConfig {
            data_url: feed.to_string_lossy().into_owned(),
            refresh_interval_secs: 1,
            poll_interval_secs: 1,
            max_polls: 1,
            demo_refresh_delay_ms: 400,
            status_clear_secs: 1,
            refresh_cooldown_ms: 300,
            ..DashboardConfig::default()
        }
    }

    fn launch(
        dir: &Path,
        config: DashboardConfig,
        action: Option<Action>,
        auto_refresh: bool,
        close_page_after: Option<Duration>,
    ) -> (VirtualDom, AppContext, Coroutine<Visibility>) {
        let handles = Handles::default();
        let mut dom = VirtualDom::new_with_props(
            harness_root,
            Harness {
                config,
                snapshot: dir.join("snapshot.json"),
                action,
                auto_refresh,
                close_page_after,
                handles: handles.clone(),
            },
        );
        dom.rebuild_in_place();
        let (ctx, refresher) = handles.borrow().clone().unwrap();
        (dom, ctx, refresher)
    }

    async fn run_for(dom: &mut VirtualDom, span: Duration) {
        let deadline = Instant::now() + span;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            if tokio::time::timeout(deadline - now, dom.wait_for_work())
                .await
                .is_err()
            {
                break;
            }
            dom.render_immediate(&mut NoOpMutations);
        }
    }

    fn current(dom: &VirtualDom, ctx: AppContext) -> AppState {
        dom.in_runtime(|| AppState::clone(&ctx.state.peek()))
    }

    fn status_of(state: &AppState) -> Option<(StatusKind, String)> {
        state
            .search_status
            .as_ref()
            .map(|status| (status.kind, status.text.clone()))
    }

    /// Answers every request with 204, like GitHub does for accepted dispatches.
    async fn dispatch_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let read = socket.read(&mut buf).await.unwrap_or(0);
                    if read == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..read]);
                    if request_complete(&request) {
                        break;
                    }
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    )
                    .await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .find_map(|line| {
                line.to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(|value| value.trim().parse::<usize>().unwrap_or(0))
            })
            .unwrap_or(0);
        raw.len() >= head_end + 4 + length
    }

    #[tokio::test]
    async fn dispatched_search_polls_on_after_leaving_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("data.json");
        write_feed(&feed, 7);
        let config = DashboardConfig {
            github: GithubConfig {
                api_base: dispatch_endpoint().await,
                owner: "someone".into(),
                repo: "carSearch".into(),
                ..GithubConfig::default()
            },
            ..fast_config(&feed)
        };
        let (mut dom, ctx, _) = launch(
            dir.path(),
            config,
            Some(Action::Search),
            false,
            Some(Duration::from_millis(200)),
        );

        run_for(&mut dom, Duration::from_millis(400)).await;
        let state = current(&dom, ctx);
        assert_eq!(
            status_of(&state),
            Some((StatusKind::Success, STATUS_TRIGGERED.to_string()))
        );
        assert!(state.polling);
        assert!(!state.searching);

        run_for(&mut dom, Duration::from_millis(1400)).await;
        let state = current(&dom, ctx);
        assert!(!state.polling);
        assert_eq!(
            status_of(&state),
            Some((StatusKind::Success, STATUS_POLL_DONE.to_string()))
        );
        assert_eq!(state.source, Some(LoadSource::Live));
        assert_eq!(state.stats.total_searches, Some(7));
        assert!(state.last_updated.is_some());
    }

    #[tokio::test]
    async fn poll_loop_gives_up_silently_without_live_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(&dir.path().join("missing.json"));
        let (mut dom, ctx, _) = launch(dir.path(), config, Some(Action::Poll), false, None);

        run_for(&mut dom, Duration::from_millis(200)).await;
        assert!(current(&dom, ctx).polling);

        run_for(&mut dom, Duration::from_millis(1400)).await;
        let state = current(&dom, ctx);
        assert!(!state.polling);
        assert_eq!(status_of(&state), None);
        assert_eq!(state.source, Some(LoadSource::Sample));
    }

    #[tokio::test]
    async fn demo_search_refreshes_after_delay_then_clears() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("data.json");
        write_feed(&feed, 3);
        let (mut dom, ctx, _) =
            launch(dir.path(), fast_config(&feed), Some(Action::Search), false, None);

        run_for(&mut dom, Duration::from_millis(150)).await;
        let state = current(&dom, ctx);
        assert_eq!(
            status_of(&state),
            Some((StatusKind::Info, STATUS_DEMO.to_string()))
        );
        assert!(!state.searching);
        assert!(state.results.is_none());

        run_for(&mut dom, Duration::from_millis(550)).await;
        let state = current(&dom, ctx);
        assert_eq!(
            status_of(&state),
            Some((StatusKind::Success, STATUS_DEMO_DONE.to_string()))
        );
        assert_eq!(state.stats.total_searches, Some(3));
        assert!(state.last_updated.is_some());

        run_for(&mut dom, Duration::from_millis(1000)).await;
        assert_eq!(status_of(&current(&dom, ctx)), None);
    }

    #[tokio::test]
    async fn unusable_trigger_reports_failure_then_clears() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("data.json");
        let config = DashboardConfig {
            github: GithubConfig {
                api_base: "not a url".into(),
                owner: "someone".into(),
                repo: "carSearch".into(),
                ..GithubConfig::default()
            },
            ..fast_config(&feed)
        };
        let (mut dom, ctx, _) = launch(dir.path(), config, Some(Action::Search), false, None);

        run_for(&mut dom, Duration::from_millis(100)).await;
        let state = current(&dom, ctx);
        assert_eq!(
            status_of(&state),
            Some((StatusKind::Error, STATUS_FAILED.to_string()))
        );
        assert!(!state.searching);
        assert!(!state.polling);

        run_for(&mut dom, Duration::from_millis(1300)).await;
        assert_eq!(status_of(&current(&dom, ctx)), None);
    }

    #[tokio::test]
    async fn manual_refresh_reenables_after_cooldown_even_off_page() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("data.json");
        write_feed(&feed, 5);
        let (mut dom, ctx, _) = launch(
            dir.path(),
            fast_config(&feed),
            Some(Action::Refresh),
            false,
            Some(Duration::from_millis(50)),
        );

        run_for(&mut dom, Duration::from_millis(150)).await;
        let state = current(&dom, ctx);
        assert!(state.refreshing);
        assert_eq!(state.stats.total_searches, Some(5));
        assert!(state.last_updated.is_some());

        run_for(&mut dom, Duration::from_millis(450)).await;
        assert!(!current(&dom, ctx).refreshing);
    }

    #[tokio::test]
    async fn auto_refresh_pauses_while_hidden_and_reloads_on_return() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("data.json");
        write_feed(&feed, 1);
        let (mut dom, ctx, refresher) = launch(dir.path(), fast_config(&feed), None, true, None);

        run_for(&mut dom, Duration::from_millis(200)).await;
        assert_eq!(current(&dom, ctx).stats.total_searches, Some(1));

        dom.in_runtime(|| refresher.send(Visibility::Hidden));
        write_feed(&feed, 2);
        run_for(&mut dom, Duration::from_millis(1500)).await;
        assert_eq!(current(&dom, ctx).stats.total_searches, Some(1));

        dom.in_runtime(|| refresher.send(Visibility::Visible));
        run_for(&mut dom, Duration::from_millis(300)).await;
        assert_eq!(current(&dom, ctx).stats.total_searches, Some(2));
    }
}
