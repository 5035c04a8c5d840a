//! Triggers the remote search workflow through the GitHub REST API.
//!
//! - Workflow dispatch when a personal access token is stored.
//! - Repository dispatch as an unauthenticated fallback.
//! - Demo mode when neither is accepted.

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode, Url,
};
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::config::GithubConfig;
use crate::domain::ApiToken;
use crate::util::USER_AGENT;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const TRIGGERED_BY: &str = "search_now_button";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub rejected the dispatch with {0}")]
    Rejected(StatusCode),
    #[error("repository owner and name are not configured")]
    NotConfigured,
    #[error("invalid token header")]
    InvalidToken,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    WorkflowDispatched,
    RepositoryDispatched,
    DemoMode,
}

impl TriggerOutcome {
    pub fn is_live(&self) -> bool {
        !matches!(self, TriggerOutcome::DemoMode)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WorkflowDispatchBody<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
    pub inputs: WorkflowInputs<'a>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WorkflowInputs<'a> {
    pub triggered_by: &'a str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RepositoryDispatchBody<'a> {
    pub event_type: &'a str,
    pub client_payload: ClientPayload<'a>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ClientPayload<'a> {
    pub triggered_by: &'a str,
    pub timestamp: String,
}

#[derive(Clone)]
pub struct SearchTrigger {
    http: Client,
    api_base: Url,
    config: GithubConfig,
}

impl SearchTrigger {
    pub fn new(config: GithubConfig) -> Result<Self, DispatchError> {
        let mut api_base = Url::parse(&config.api_base)?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base,
            config,
        })
    }

    pub fn workflow_url(&self) -> Result<Url, DispatchError> {
        self.repo_url(&format!(
            "actions/workflows/{}/dispatches",
            self.config.workflow
        ))
    }

    pub fn repository_url(&self) -> Result<Url, DispatchError> {
        self.repo_url("dispatches")
    }

    fn repo_url(&self, tail: &str) -> Result<Url, DispatchError> {
        if !self.config.is_configured() {
            return Err(DispatchError::NotConfigured);
        }
        let path = format!(
            "repos/{owner}/{repo}/{tail}",
            owner = self.config.owner.trim(),
            repo = self.config.repo.trim(),
        );
        Ok(self.api_base.join(&path)?)
    }

    pub fn workflow_body(&self) -> WorkflowDispatchBody<'_> {
        WorkflowDispatchBody {
            git_ref: &self.config.git_ref,
            inputs: WorkflowInputs {
                triggered_by: TRIGGERED_BY,
            },
        }
    }

    pub fn repository_body(&self, now: OffsetDateTime) -> RepositoryDispatchBody<'_> {
        RepositoryDispatchBody {
            event_type: &self.config.event_type,
            client_payload: ClientPayload {
                triggered_by: TRIGGERED_BY,
                timestamp: now.format(&Rfc3339).unwrap_or_else(|_| now.to_string()),
            },
        }
    }

    pub async fn dispatch_workflow(&self, token: &ApiToken) -> Result<(), DispatchError> {
        let url = self.workflow_url()?;
        let auth = HeaderValue::from_str(&format!("token {}", token.expose()))
            .map_err(|_| DispatchError::InvalidToken)?;
        debug!(%url, "sending workflow dispatch");
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, auth)
            .json(&self.workflow_body())
            .send()
            .await?;
        ensure_accepted(response.status())
    }

    pub async fn dispatch_repository(&self) -> Result<(), DispatchError> {
        let url = self.repository_url()?;
        debug!(%url, "sending repository dispatch");
        let response = self
            .http
            .post(url)
            .json(&self.repository_body(OffsetDateTime::now_utc()))
            .send()
            .await?;
        ensure_accepted(response.status())
    }

    /// Tries each dispatch method in turn and reports which one was accepted.
    pub async fn trigger(&self, token: Option<&ApiToken>) -> TriggerOutcome {
        if !self.config.is_configured() {
            info!("no repository configured; search trigger runs in demo mode");
            return TriggerOutcome::DemoMode;
        }

        if let Some(token) = token {
            match self.dispatch_workflow(token).await {
                Ok(()) => {
                    info!(workflow = %self.config.workflow, "workflow dispatch accepted");
                    return TriggerOutcome::WorkflowDispatched;
                }
                Err(err) => warn!("workflow dispatch failed: {err}"),
            }
        }

        match self.dispatch_repository().await {
            Ok(()) => {
                info!(event = %self.config.event_type, "repository dispatch accepted");
                TriggerOutcome::RepositoryDispatched
            }
            Err(err) => {
                warn!("repository dispatch failed: {err}");
                TriggerOutcome::DemoMode
            }
        }
    }
}

fn ensure_accepted(status: StatusCode) -> Result<(), DispatchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(DispatchError::Rejected(status))
    }
}
