//! Application state for the TUI.

use gittui_core::analytics::{
    peak_hour, push_rate, top_languages, top_repositories, ContributionStats, PeakHour,
    PushGranularity, StreakStats, TimeWindow, TOP_N,
};
use gittui_core::config::DisplayConfig;
use gittui_core::{
    ActivityEvent, Contribution, LanguageStat, Profile, PullRequest, Repository, Theme,
    ThemeCycle,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::fetch::{FetchMessage, FetchPayload};

/// Datasets still in flight for the current refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub identity: bool,
    pub profile: bool,
    pub contributions: bool,
    pub repositories: bool,
    pub activity: bool,
    pub pull_requests: bool,
}

impl LoadingState {
    /// Everything pending, as at the start of a refresh.
    pub fn all() -> Self {
        Self {
            identity: true,
            profile: true,
            contributions: true,
            repositories: true,
            activity: true,
            pull_requests: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.identity
            || self.profile
            || self.contributions
            || self.repositories
            || self.activity
            || self.pull_requests
    }

    /// Names of the datasets still loading, in display order.
    ///
    /// Languages are derived from repositories, so both names track the
    /// same request.
    pub fn pending_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.identity || self.profile {
            labels.push("profile");
        }
        if self.contributions {
            labels.push("contributions");
        }
        if self.repositories {
            labels.push("languages");
            labels.push("repositories");
        }
        if self.activity {
            labels.push("activity");
        }
        if self.pull_requests {
            labels.push("pull requests");
        }
        labels
    }
}

/// Main application state.
pub struct App {
    /// Username from the command line or config; `None` means the token's owner
    pub requested_username: Option<String>,
    /// Login actually displayed, known once identity resolves
    pub login: Option<String>,
    /// Whether the displayed profile belongs to the token's owner
    pub is_own_profile: bool,
    /// Hide private data on one's own profile
    pub public_only: bool,

    pub profile: Option<Profile>,
    pub contributions: Vec<Contribution>,
    pub stats: ContributionStats,
    pub streaks: StreakStats,
    pub languages: Vec<LanguageStat>,
    pub top_repos: Vec<Repository>,
    pub events: Vec<ActivityEvent>,
    pub pull_requests: Vec<PullRequest>,

    pub loading: LoadingState,
    /// First failure of the current refresh
    pub error: Option<String>,

    pub granularity: PushGranularity,
    pub window: TimeWindow,
    pub themes: ThemeCycle,

    /// Index of the first activity row shown
    pub activity_scroll: usize,
    pub should_quit: bool,
    /// Set when the main loop should start a new refresh
    pub refresh_requested: bool,
    generation: u64,
}

impl App {
    /// Create the app. A refresh is requested immediately.
    pub fn new(requested_username: Option<String>, display: &DisplayConfig) -> Self {
        Self {
            requested_username,
            login: None,
            is_own_profile: false,
            public_only: display.public_only,
            profile: None,
            contributions: Vec::new(),
            stats: ContributionStats::default(),
            streaks: StreakStats::default(),
            languages: Vec::new(),
            top_repos: Vec::new(),
            events: Vec::new(),
            pull_requests: Vec::new(),
            loading: LoadingState::all(),
            error: None,
            granularity: display.push_granularity,
            window: display.time_window,
            themes: ThemeCycle::starting_at(&display.theme),
            activity_scroll: 0,
            should_quit: false,
            refresh_requested: true,
            generation: 0,
        }
    }

    /// The active theme.
    pub fn theme(&self) -> &'static Theme {
        self.themes.current()
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Mark every dataset as loading and return the new generation.
    /// Messages from earlier generations are ignored from here on.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.loading = LoadingState::all();
        self.error = None;
        self.refresh_requested = false;
        self.generation
    }

    /// Apply the result of a background fetch.
    pub fn apply(&mut self, message: FetchMessage) {
        if message.generation != self.generation {
            tracing::debug!(
                stale = message.generation,
                current = self.generation,
                "Ignoring result from superseded refresh"
            );
            return;
        }

        match message.payload {
            FetchPayload::Identity {
                login,
                is_own_profile,
            } => {
                self.login = Some(login);
                self.is_own_profile = is_own_profile;
                self.loading.identity = false;
            }
            FetchPayload::Profile(result) => {
                self.loading.profile = false;
                match result {
                    Ok(profile) => self.profile = Some(profile),
                    Err(e) => self.fail("profile", e),
                }
            }
            FetchPayload::Contributions(result) => {
                self.loading.contributions = false;
                match result {
                    Ok(contributions) => self.set_contributions(contributions),
                    Err(e) => self.fail("contributions", e),
                }
            }
            FetchPayload::Repositories(result) => {
                self.loading.repositories = false;
                match result {
                    Ok(repositories) => {
                        self.languages = top_languages(&repositories, TOP_N);
                        self.top_repos = top_repositories(&repositories, TOP_N);
                    }
                    Err(e) => self.fail("repositories", e),
                }
            }
            FetchPayload::Events(result) => {
                self.loading.activity = false;
                match result {
                    Ok(events) => {
                        self.events = events;
                        self.activity_scroll = self
                            .activity_scroll
                            .min(self.events.len().saturating_sub(1));
                    }
                    Err(e) => self.fail("activity", e),
                }
            }
            FetchPayload::PullRequests(result) => {
                self.loading.pull_requests = false;
                match result {
                    Ok(pull_requests) => self.pull_requests = pull_requests,
                    Err(e) => self.fail("pull requests", e),
                }
            }
            FetchPayload::Failed(message) => {
                tracing::error!(error = %message, "Refresh failed");
                self.error.get_or_insert(message);
                self.loading = LoadingState::default();
            }
        }
    }

    fn set_contributions(&mut self, contributions: Vec<Contribution>) {
        self.stats = ContributionStats::compute(&contributions);
        self.streaks = StreakStats::compute(&contributions);
        tracing::debug!(
            days = self.stats.total_days,
            total = self.stats.total,
            current_streak = self.streaks.current,
            "Contributions loaded"
        );
        self.contributions = contributions;
    }

    /// Record a failed fetch. The rest of the refresh is abandoned so the
    /// error screen shows and `r` can retry.
    fn fail(&mut self, what: &str, error: gittui_core::Error) {
        tracing::error!(dataset = what, error = %error, "Fetch failed");
        self.error
            .get_or_insert_with(|| format!("failed to load {}: {}", what, error));
        self.loading = LoadingState::default();
    }

    /// Push rate at the current granularity.
    pub fn push_rate(&self) -> f64 {
        push_rate(&self.events, self.granularity)
    }

    /// Peak activity hour for the current window.
    pub fn peak_hour(&self) -> PeakHour {
        peak_hour(&self.events, self.window)
    }

    /// Handle keyboard input.
    ///
    /// Quitting always works. Everything else waits until loading finishes.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        if self.loading.is_loading() {
            return;
        }

        match key.code {
            KeyCode::Char('r') => {
                self.request_refresh();
            }
            KeyCode::Char('g') => {
                self.granularity = self.granularity.next();
            }
            KeyCode::Char('w') => {
                self.window = self.window.next();
            }
            KeyCode::Char('t') => {
                let theme = self.themes.advance();
                tracing::debug!(theme = theme.name, "Switched theme");
            }
            KeyCode::Char('p') if self.is_own_profile => {
                self.public_only = !self.public_only;
                self.request_refresh();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.activity_scroll = self.activity_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.activity_scroll + 1 < self.events.len() {
                    self.activity_scroll += 1;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use gittui_core::{EventKind, Error};

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn message(generation: u64, payload: FetchPayload) -> FetchMessage {
        FetchMessage {
            generation,
            payload,
        }
    }

    fn event(hour: u32) -> ActivityEvent {
        ActivityEvent {
            kind: EventKind::Push,
            repository: "octocat/hello-world".to_string(),
            action: "Pushed 1 commit(s)".to_string(),
            timestamp: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 1, 10, hour, 0, 0)
                .unwrap(),
            is_public: true,
        }
    }

    /// An app whose first refresh has fully loaded.
    fn loaded_app(is_own_profile: bool) -> App {
        let mut app = App::new(None, &DisplayConfig::default());
        let generation = app.begin_refresh();
        app.apply(message(
            generation,
            FetchPayload::Identity {
                login: "octocat".to_string(),
                is_own_profile,
            },
        ));
        app.loading = LoadingState::default();
        app
    }

    #[test]
    fn test_new_app_requests_refresh() {
        let app = App::new(Some("octocat".to_string()), &DisplayConfig::default());
        assert!(app.refresh_requested);
        assert!(app.loading.is_loading());
        assert_eq!(app.theme().name, "github-dark");
        assert_eq!(app.granularity, PushGranularity::Day);
    }

    #[test]
    fn test_pending_labels() {
        assert_eq!(
            LoadingState::all().pending_labels(),
            vec![
                "profile",
                "contributions",
                "languages",
                "repositories",
                "activity",
                "pull requests"
            ]
        );
        let partial = LoadingState {
            contributions: true,
            ..Default::default()
        };
        assert_eq!(partial.pending_labels(), vec!["contributions"]);
        assert!(LoadingState::default().pending_labels().is_empty());
    }

    #[test]
    fn test_quit_works_while_loading() {
        let mut app = App::new(None, &DisplayConfig::default());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = App::new(None, &DisplayConfig::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let mut app = App::new(None, &DisplayConfig::default());
        app.begin_refresh();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.granularity, PushGranularity::Day);
        assert_eq!(app.theme().name, "github-dark");
        assert!(!app.refresh_requested);
    }

    #[test]
    fn test_cycle_keys() {
        let mut app = loaded_app(false);

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.granularity, PushGranularity::Week);
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.window, TimeWindow::ThisMonth);
        press(&mut app, KeyCode::Char('t'));
        assert_ne!(app.theme().name, "github-dark");

        press(&mut app, KeyCode::Char('r'));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_public_toggle_only_on_own_profile() {
        let mut app = loaded_app(false);
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.public_only);
        assert!(!app.refresh_requested);

        let mut app = loaded_app(true);
        press(&mut app, KeyCode::Char('p'));
        assert!(app.public_only);
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_activity_scroll_is_bounded() {
        let mut app = loaded_app(true);
        app.events = vec![event(9), event(10), event(11)];

        press(&mut app, KeyCode::Up);
        assert_eq!(app.activity_scroll, 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.activity_scroll, 2);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.activity_scroll, 1);
    }

    #[test]
    fn test_stale_messages_are_ignored() {
        let mut app = App::new(None, &DisplayConfig::default());
        let first = app.begin_refresh();
        let second = app.begin_refresh();
        assert_ne!(first, second);

        app.apply(message(first, FetchPayload::Events(Ok(vec![event(9)]))));
        assert!(app.events.is_empty());
        assert!(app.loading.activity);

        app.apply(message(second, FetchPayload::Events(Ok(vec![event(9)]))));
        assert_eq!(app.events.len(), 1);
        assert!(!app.loading.activity);
    }

    #[test]
    fn test_pull_requests_loaded() {
        let mut app = App::new(None, &DisplayConfig::default());
        let generation = app.begin_refresh();
        let pr = PullRequest {
            title: "Add dark mode".to_string(),
            repository: "octocat/hello-world".to_string(),
            state: gittui_core::PullRequestState::Open,
            is_draft: false,
            review_decision: None,
            approved_count: 0,
            changes_count: 0,
            comment_count: 2,
        };
        app.apply(message(generation, FetchPayload::PullRequests(Ok(vec![pr]))));

        assert_eq!(app.pull_requests.len(), 1);
        assert!(!app.loading.pull_requests);
        assert!(!app.loading.pending_labels().contains(&"pull requests"));
    }

    #[test]
    fn test_pull_request_failure_shows_error() {
        let mut app = App::new(None, &DisplayConfig::default());
        let generation = app.begin_refresh();
        app.apply(message(
            generation,
            FetchPayload::PullRequests(Err(Error::GraphQl("rate limited".to_string()))),
        ));

        assert!(!app.loading.is_loading());
        let error = app.error.clone().unwrap();
        assert!(error.contains("pull requests"));
        assert!(error.contains("rate limited"));
    }

    #[test]
    fn test_contributions_update_stats() {
        let mut app = App::new(None, &DisplayConfig::default());
        let generation = app.begin_refresh();
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        app.apply(message(
            generation,
            FetchPayload::Contributions(Ok(vec![
                Contribution::new(day(1), 3),
                Contribution::new(day(2), 0),
                Contribution::new(day(3), 5),
            ])),
        ));
        assert_eq!(app.stats.total, 8);
        assert_eq!(app.stats.active_days, 2);
        assert_eq!(app.streaks.longest, 1);
        assert!(!app.loading.contributions);
    }

    #[test]
    fn test_fetch_error_stops_loading() {
        let mut app = App::new(None, &DisplayConfig::default());
        let generation = app.begin_refresh();
        app.apply(message(
            generation,
            FetchPayload::Profile(Err(Error::Api {
                status: 404,
                message: "Not Found".to_string(),
            })),
        ));

        assert!(!app.loading.is_loading());
        let error = app.error.clone().unwrap();
        assert!(error.contains("profile"));
        assert!(error.contains("Not Found"));

        // Retry is allowed from the error screen
        press(&mut app, KeyCode::Char('r'));
        assert!(app.refresh_requested);
        app.begin_refresh();
        assert!(app.error.is_none());
    }
}
