use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use super::payload::parse_activity;
use super::ActivityError;
use crate::config::ActivityConfig;
use crate::models::ActivityDay;

/// Source of per-day contribution counts, keyed by external identity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityClient: Send + Sync {
    /// Full contribution history for `identity`, flattened to one day series
    async fn fetch_activity(&self, identity: &str) -> Result<Vec<ActivityDay>, ActivityError>;

    /// Succeeds when the service knows `identity`
    async fn check_identity(&self, identity: &str) -> Result<(), ActivityError>;
}

/// HTTP client for the github-contributions API.
///
/// One GET per call, no retries. Any non-200 answer means the identity is unknown.
#[derive(Debug, Clone)]
pub struct ContributionsApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ContributionsApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ActivityError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ActivityError::LookupFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ActivityConfig) -> Result<Self, ActivityError> {
        Self::new(config.base_url.clone(), config.timeout)
    }

    fn url(&self, identity: &str, extension: &str) -> String {
        format!("{}/{}.{}", self.base_url, identity, extension)
    }

    async fn get(&self, identity: &str, extension: &str) -> Result<reqwest::Response, ActivityError> {
        let response = self
            .http
            .get(self.url(identity, extension))
            .send()
            .await
            .map_err(|e| ActivityError::LookupFailed(e.to_string()))?;

        if response.status() != StatusCode::OK {
            warn!(identity = %identity, status = %response.status(), "Contributions service did not return 200");
            return Err(ActivityError::NotFound(identity.to_string()));
        }

        Ok(response)
    }
}

#[async_trait]
impl ActivityClient for ContributionsApiClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_activity(&self, identity: &str) -> Result<Vec<ActivityDay>, ActivityError> {
        let body = self
            .get(identity, "json")
            .await?
            .bytes()
            .await
            .map_err(|e| ActivityError::LookupFailed(e.to_string()))?;

        let days = parse_activity(&body)?;
        debug!(days = days.len(), "Fetched contribution history");

        Ok(days)
    }

    #[tracing::instrument(skip(self))]
    async fn check_identity(&self, identity: &str) -> Result<(), ActivityError> {
        self.get(identity, "text").await.map(|_| ())
    }
}
