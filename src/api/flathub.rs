//! Flathub search API (`POST /api/v2/search`).

use crate::error::{MeowError, Result};
use crate::project_identity;
use crate::ui as output;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub const FLATHUB_SEARCH_URL: &str = "https://flathub.org/api/v2/search";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlathubHit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub summary: String,
}

impl FlathubHit {
    /// Loose match used by existence checks: equal to or contained in the
    /// app id or display name, case-insensitively.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        let app_id = self.app_id.to_lowercase();
        let name = self.name.to_lowercase();
        app_id.contains(&needle) || name.contains(&needle)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<FlathubHit>,
}

pub struct FlathubClient {
    endpoint: String,
    http: Client,
}

impl FlathubClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_endpoint(FLATHUB_SEARCH_URL, timeout)
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(project_identity::USER_AGENT)
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            http,
        })
    }

    pub fn search(&self, query: &str) -> Result<Vec<FlathubHit>> {
        output::verbose(&format!("POST {} ({})", self.endpoint, query));

        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query, "filters": [] }))
            .send()
            .map_err(|e| MeowError::from_transport(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MeowError::BackendFailure {
                backend: "Flathub".to_string(),
                diagnostic: format!("HTTP {}", status),
            });
        }

        let body: SearchResponse = response
            .json()
            .map_err(|e| MeowError::from_transport(&self.endpoint, e))?;
        Ok(body.hits)
    }

    /// App id of the first hit, which is what installs target.
    pub fn first_app_id(&self, query: &str) -> Result<Option<String>> {
        Ok(self
            .search(query)?
            .into_iter()
            .map(|hit| hit.app_id)
            .find(|id| !id.trim().is_empty()))
    }
}
