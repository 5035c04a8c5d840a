use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{
    format::{now_local, updated_label},
    listing::ResultSet,
    stats::DashboardStats,
    token::ApiToken,
};
use crate::util::generate_id;

/// Where the result set on screen came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Live,
    Cached,
    Sample,
}

impl LoadSource {
    pub fn label(&self) -> &'static str {
        match self {
            LoadSource::Live => "Live feed",
            LoadSource::Cached => "Saved snapshot",
            LoadSource::Sample => "Sample data",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Searching,
    Success,
    Info,
    Error,
}

impl StatusKind {
    pub fn class(&self) -> &'static str {
        match self {
            StatusKind::Searching => "searching",
            StatusKind::Success => "success",
            StatusKind::Info => "info",
            StatusKind::Error => "error",
        }
    }
}

/// Long-running dashboard actions; each may run at most once at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Busy {
    Refreshing,
    Searching,
    Polling,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub id: String,
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("status"),
            kind,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub results: Option<ResultSet>,
    pub stats: DashboardStats,
    pub source: Option<LoadSource>,
    pub last_updated: Option<OffsetDateTime>,
    pub search_status: Option<StatusLine>,
    /// A "Search Now" request is in flight.
    pub searching: bool,
    /// A manual refresh is in flight or cooling down.
    pub refreshing: bool,
    pub polling: bool,
    pub token: Option<ApiToken>,
}

impl AppState {
    pub fn apply_results(&mut self, results: ResultSet, source: LoadSource) {
        self.stats.apply(&results);
        self.results = Some(results);
        self.source = Some(source);
    }

    pub fn stamp_updated(&mut self) {
        self.last_updated = Some(now_local());
    }

    pub fn last_updated_label(&self) -> String {
        self.last_updated
            .map(updated_label)
            .unwrap_or_else(|| "Never".to_string())
    }

    /// Replaces the search status and returns its id for a later guarded clear.
    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) -> String {
        let status = StatusLine::new(kind, text);
        let id = status.id.clone();
        self.search_status = Some(status);
        id
    }

    /// Clears the status only if it is still the message identified by `id`.
    pub fn clear_status(&mut self, id: &str) -> bool {
        if self
            .search_status
            .as_ref()
            .is_some_and(|status| status.id == id)
        {
            self.search_status = None;
            true
        } else {
            false
        }
    }

    pub fn is_busy(&self, busy: Busy) -> bool {
        match busy {
            Busy::Refreshing => self.refreshing,
            Busy::Searching => self.searching,
            Busy::Polling => self.polling,
        }
    }

    fn busy_flag(&mut self, busy: Busy) -> &mut bool {
        match busy {
            Busy::Refreshing => &mut self.refreshing,
            Busy::Searching => &mut self.searching,
            Busy::Polling => &mut self.polling,
        }
    }

    /// Marks `busy` as running. Returns false if it already was.
    pub fn begin(&mut self, busy: Busy) -> bool {
        let flag = self.busy_flag(busy);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    pub fn finish(&mut self, busy: Busy) {
        *self.busy_flag(busy) = false;
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.token = persisted
            .github_token
            .as_deref()
            .and_then(|raw| ApiToken::parse(raw).ok());
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            github_token: self.token.as_ref().map(|token| token.expose().to_string()),
        }
    }
}

/// What survives a restart: the dispatch token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub github_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::sample_results;

    #[test]
    fn applying_results_updates_stats_and_source() {
        let mut state = AppState::default();
        state.apply_results(sample_results(), LoadSource::Sample);
        assert_eq!(state.source, Some(LoadSource::Sample));
        assert_eq!(state.stats.total_searches, Some(14));
        assert_eq!(state.results.as_ref().map(|r| r.matches.len()), Some(3));
    }

    #[test]
    fn stale_clear_does_not_wipe_newer_status() {
        let mut state = AppState::default();
        let first = state.set_status(StatusKind::Searching, "Running search...");
        let second = state.set_status(StatusKind::Success, "done");
        assert!(!state.clear_status(&first));
        assert_eq!(state.search_status.as_ref().map(|s| s.kind), Some(StatusKind::Success));
        assert!(state.clear_status(&second));
        assert!(state.search_status.is_none());
    }

    #[test]
    fn persisted_token_round_trip_drops_invalid_values() {
        let mut state = AppState::default();
        state.apply_persisted(PersistedState {
            github_token: Some("ghp_secret123".into()),
        });
        assert_eq!(
            state.to_persisted().github_token.as_deref(),
            Some("ghp_secret123")
        );

        state.apply_persisted(PersistedState {
            github_token: Some("not-a-token".into()),
        });
        assert!(state.token.is_none());
    }

    #[test]
    fn busy_flags_admit_one_run_at_a_time() {
        let mut state = AppState::default();
        assert!(state.begin(Busy::Polling));
        assert!(!state.begin(Busy::Polling));
        assert!(state.polling);
        assert!(state.begin(Busy::Searching));

        state.finish(Busy::Polling);
        assert!(!state.is_busy(Busy::Polling));
        assert!(state.is_busy(Busy::Searching));
        assert!(state.begin(Busy::Polling));
    }

    #[test]
    fn last_updated_defaults_to_never() {
        let mut state = AppState::default();
        assert_eq!(state.last_updated_label(), "Never");
        state.stamp_updated();
        assert_ne!(state.last_updated_label(), "Never");
    }
}
