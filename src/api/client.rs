//! Blocking client for the Meow registry HTTP API.

use crate::api::types::{HealthStatus, NewPackage, PackageListing, PackageUpdate, RegistryPackage};
use crate::config::settings::Settings;
use crate::error::{MeowError, Result};
use crate::project_identity;
use crate::ui as output;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const BACKEND_NAME: &str = "Meow registry";
const API_KEY_HEADER: &str = "X-API-Key";

/// Packages fetched for client-side search.
pub const SEARCH_FETCH_LIMIT: usize = 1000;
pub const DEFAULT_RESULT_LIMIT: usize = 50;

pub struct MeowApiClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl MeowApiClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(project_identity::USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            http,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.registry_url(),
            settings.api_key(),
            settings.http_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    // ---- read-only ----

    /// Exact lookup, `GET /api/packages/{name}`. 404 is `NotFound`.
    pub fn find_package(&self, name: &str) -> Result<RegistryPackage> {
        let endpoint = package_endpoint(name, "");
        self.send_json(self.request(Method::GET, &endpoint), &endpoint)
    }

    /// `GET /api/packages?name=`: the entry whose name matches exactly, if any.
    pub fn lookup_by_query(&self, name: &str) -> Result<Option<RegistryPackage>> {
        let endpoint = "/api/packages";
        let listing: PackageListing = self.send_json(
            self.request(Method::GET, endpoint).query(&[("name", name)]),
            endpoint,
        )?;

        Ok(listing
            .into_packages()
            .into_iter()
            .find(|pkg| pkg.name.eq_ignore_ascii_case(name)))
    }

    pub fn get_all_packages(
        &self,
        skip: usize,
        limit: usize,
        active_only: bool,
        verified_only: bool,
    ) -> Result<Vec<RegistryPackage>> {
        let endpoint = "/api/packages";
        let builder = self.request(Method::GET, endpoint).query(&[
            ("skip", skip.to_string()),
            ("limit", limit.to_string()),
            ("active_only", active_only.to_string()),
            ("verified_only", verified_only.to_string()),
        ]);
        let listing: PackageListing = self.send_json(builder, endpoint)?;
        Ok(listing.into_packages())
    }

    /// Fetch up to 1000 packages and filter them locally.
    pub fn search_packages(
        &self,
        query: &str,
        limit: usize,
        verified_only: bool,
    ) -> Result<Vec<RegistryPackage>> {
        let packages = self.get_all_packages(0, SEARCH_FETCH_LIMIT, true, verified_only)?;
        Ok(filter_packages(packages, query, limit))
    }

    pub fn health_check(&self) -> Result<HealthStatus> {
        let endpoint = "/health";
        self.send_json(self.request(Method::GET, endpoint), endpoint)
    }

    // ---- writes ----

    pub fn increment_download_count(&self, name: &str) -> Result<()> {
        let endpoint = package_endpoint(name, "/download");
        self.send(self.request(Method::POST, &endpoint), &endpoint)?;
        Ok(())
    }

    pub fn publish(&self, package: &NewPackage) -> Result<RegistryPackage> {
        let endpoint = "/api/packages";
        self.send_json(self.request(Method::POST, endpoint).json(package), endpoint)
    }

    // ---- admin (X-API-Key) ----

    pub fn verify_package(&self, name: &str, verified: bool) -> Result<()> {
        self.require_api_key()?;
        let endpoint = package_endpoint(name, "/verify");
        let body = serde_json::json!({ "verified": verified });
        self.send(self.request(Method::POST, &endpoint).json(&body), &endpoint)?;
        Ok(())
    }

    pub fn update_package_info(
        &self,
        name: &str,
        update: &PackageUpdate,
    ) -> Result<RegistryPackage> {
        self.require_api_key()?;
        let endpoint = package_endpoint(name, "");
        self.send_json(self.request(Method::PUT, &endpoint).json(update), &endpoint)
    }

    /// Soft delete unless `hard` is set. The server answers 204.
    pub fn delete_package(&self, name: &str, hard: bool) -> Result<()> {
        self.require_api_key()?;
        let endpoint = package_endpoint(name, "");
        let mut builder = self.request(Method::DELETE, &endpoint);
        if hard {
            builder = builder.query(&[("hard_delete", "true")]);
        }
        self.send(builder, &endpoint)?;
        Ok(())
    }

    pub fn admin_info(&self) -> Result<serde_json::Value> {
        self.require_api_key()?;
        let endpoint = "/admin/info";
        self.send_json(self.request(Method::GET, endpoint), endpoint)
    }

    // ---- plumbing ----

    fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_none() {
            return Err(MeowError::MissingApiKey);
        }
        Ok(())
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        output::verbose(&format!("{} {}", method, url));

        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<Response> {
        let response = builder
            .send()
            .map_err(|e| MeowError::from_transport(&self.describe(endpoint), e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let detail = error_detail(&body);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MeowError::NotFound(
                detail.unwrap_or_else(|| endpoint.to_string()),
            ));
        }

        Err(MeowError::BackendFailure {
            backend: BACKEND_NAME.to_string(),
            diagnostic: match detail {
                Some(detail) => format!("HTTP {}: {}", status.as_u16(), detail),
                None => format!("HTTP {}", status),
            },
        })
    }

    fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, endpoint: &str) -> Result<T> {
        self.send(builder, endpoint)?
            .json::<T>()
            .map_err(|e| MeowError::from_transport(&self.describe(endpoint), e))
    }

    fn describe(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

/// `/api/packages/{name}{suffix}` with the name as one encoded path segment.
fn package_endpoint(name: &str, suffix: &str) -> String {
    format!("/api/packages/{}{}", urlencoding::encode(name), suffix)
}

/// Local filter used by registry search, preserving server order.
pub fn filter_packages(
    packages: Vec<RegistryPackage>,
    query: &str,
    limit: usize,
) -> Vec<RegistryPackage> {
    packages
        .into_iter()
        .filter(|pkg| pkg.matches(query))
        .take(limit)
        .collect()
}

/// FastAPI-style `{"detail": ...}`, else the trimmed body.
fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed)
        && let Some(detail) = value.get("detail")
    {
        return Some(match detail.as_str() {
            Some(s) => s.to_string(),
            None => detail.to_string(),
        });
    }

    Some(trimmed.chars().take(200).collect())
}
