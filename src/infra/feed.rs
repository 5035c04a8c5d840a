//! Fetches the listing feed from a URL or a file on disk.

use std::path::PathBuf;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

use crate::domain::ResultSet;
use crate::util::USER_AGENT;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned {0}")]
    Status(StatusCode),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode feed: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Http(Url),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(location: &str) -> Result<Self, FeedError> {
        let location = location.trim();
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(DataSource::Http(Url::parse(location)?));
        }
        let path = location.strip_prefix("file://").unwrap_or(location);
        Ok(DataSource::File(PathBuf::from(path)))
    }
}

#[derive(Clone)]
pub struct ListingFeed {
    http: Client,
    source: DataSource,
}

impl ListingFeed {
    pub fn new(location: &str) -> Result<Self, FeedError> {
        let source = DataSource::parse(location)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, source })
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub async fn fetch(&self) -> Result<ResultSet, FeedError> {
        let body = match &self.source {
            DataSource::Http(url) => {
                debug!(%url, "requesting listing feed");
                let response = self.http.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FeedError::Status(status));
                }
                response.text().await?
            }
            DataSource::File(path) => {
                debug!(path = %path.display(), "reading listing feed");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FeedError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
        };

        let results: ResultSet = serde_json::from_str(&body)?;
        debug!(listings = results.matches.len(), "decoded listing feed");
        Ok(results)
    }
}
