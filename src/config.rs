//! Dashboard settings: where the feed lives, how often to poll it, and which
//! repository runs the search workflow.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "ListingDashboard";
pub const APP_DIR_NAME: &str = "ListingDashboard";

const SETTINGS_FILENAME: &str = "settings.json";

const ENV_DATA_URL: &str = "LISTING_DASHBOARD_DATA_URL";
const ENV_GITHUB_OWNER: &str = "LISTING_DASHBOARD_GITHUB_OWNER";
const ENV_GITHUB_REPO: &str = "LISTING_DASHBOARD_GITHUB_REPO";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config directory unavailable")]
    DirectoryNotFound,
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid settings file: {0}")]
    InvalidFormat(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_base: String,
    /// Repository owner; dispatching is disabled while this or `repo` is empty.
    pub owner: String,
    pub repo: String,
    pub workflow: String,
    pub git_ref: String,
    pub event_type: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: String::new(),
            repo: String::new(),
            workflow: "auto-search.yml".to_string(),
            git_ref: "main".to_string(),
            event_type: "manual-search".to_string(),
        }
    }
}

impl GithubConfig {
    pub fn is_configured(&self) -> bool {
        !self.owner.trim().is_empty() && !self.repo.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// `http(s)://` URL or local path of the listing feed.
    pub data_url: String,
    pub refresh_interval_secs: u64,
    pub poll_interval_secs: u64,
    pub max_polls: u32,
    pub demo_refresh_delay_ms: u64,
    pub status_clear_secs: u64,
    pub setup_status_clear_secs: u64,
    pub refresh_cooldown_ms: u64,
    pub github: GithubConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_url: "data.json".to_string(),
            refresh_interval_secs: 300,
            poll_interval_secs: 30,
            max_polls: 20,
            demo_refresh_delay_ms: 2_000,
            status_clear_secs: 10,
            setup_status_clear_secs: 5,
            refresh_cooldown_ms: 1_000,
            github: GithubConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn demo_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.demo_refresh_delay_ms)
    }

    pub fn status_clear_delay(&self) -> Duration {
        Duration::from_secs(self.status_clear_secs)
    }

    pub fn setup_status_clear_delay(&self) -> Duration {
        Duration::from_secs(self.setup_status_clear_secs)
    }

    pub fn refresh_cooldown(&self) -> Duration {
        Duration::from_millis(self.refresh_cooldown_ms)
    }

    /// Loads `settings.json` from the config directory, then applies env overrides.
    pub fn load() -> ConfigResult<Self> {
        let mut config = match settings_file() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> ConfigResult<PathBuf> {
        let path = settings_file().ok_or(ConfigError::DirectoryNotFound)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_url.trim().is_empty() {
            return Err(ConfigError::Invalid("Data URL must not be empty".into()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "Refresh interval must be at least one second".into(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "Poll interval must be at least one second".into(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = lookup(ENV_DATA_URL) {
            self.data_url = url;
        }
        if let Some(owner) = lookup(ENV_GITHUB_OWNER) {
            self.github.owner = owner;
        }
        if let Some(repo) = lookup(ENV_GITHUB_REPO) {
            self.github.repo = repo;
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_DIR_NAME)
}

fn settings_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
}
