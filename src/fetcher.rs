use crate::config::SiteSettings;
use crate::constants::{GITHUB_API_BASE, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::future::Future;
use std::process::Command;
use std::time::Duration;

/// One entry of a remote folder listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl RemoteEntry {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// Where enrichment data comes from. The network implementation is
/// [`GitHubSource`]; tests substitute an in-memory one.
pub trait ContentSource {
    /// List the configured photos folder
    fn list_folder(&self) -> impl Future<Output = Result<Vec<RemoteEntry>>> + Send;

    /// Download the published member roster as CSV text
    fn fetch_member_csv(&self) -> impl Future<Output = Result<String>> + Send;
}

// ============================================================================
// GitHub / Published Sheet
// ============================================================================

pub struct GitHubSource {
    http: reqwest::Client,
    contents_url: String,
    csv_url: String,
    token: Option<String>,
}

impl GitHubSource {
    pub fn new(settings: &SiteSettings, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            contents_url: contents_url(settings),
            csv_url: settings.csv_url.clone(),
            token,
        })
    }
}

/// GitHub contents API URL for the photos folder
pub fn contents_url(settings: &SiteSettings) -> String {
    format!(
        "{}/repos/{}/{}/contents/{}",
        GITHUB_API_BASE, settings.repo_owner, settings.repo_name, settings.photos_folder
    )
}

/// Decode a contents listing, rejecting anything that is not a JSON array
pub fn parse_listing(url: &str, body: &str) -> Result<Vec<RemoteEntry>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(Error::MalformedResponse {
            url: url.to_string(),
            reason: "expected a JSON array".to_string(),
        });
    }
    Ok(serde_json::from_value(value)?)
}

impl GitHubSource {
    fn listing_request(&self) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(&self.contents_url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            // GitHub accepts both `token` and `Bearer`; `token` is what the
            // gallery loader has always sent.
            Some(token) => request.header("Authorization", format!("token {}", token)),
            None => request,
        }
    }
}

impl ContentSource for GitHubSource {
    async fn list_folder(&self) -> Result<Vec<RemoteEntry>> {
        let started = std::time::Instant::now();
        let resp = self.listing_request().send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: self.contents_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let entries = parse_listing(&self.contents_url, &body)?;
        log::debug!(
            "Listed {} entries in {:?} (HTTP {})",
            entries.len(),
            started.elapsed(),
            status.as_u16()
        );
        Ok(entries)
    }

    async fn fetch_member_csv(&self) -> Result<String> {
        let resp = self.http.get(&self.csv_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: self.csv_url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Resolve an optional GitHub token: explicit setting, then
/// `PERSONAL_ACCESS_TOKEN`, then `GITHUB_TOKEN`, then `gh auth token`.
pub fn resolve_github_token(configured: Option<&str>) -> Option<String> {
    configured
        .map(str::to_string)
        .or_else(|| env::var("PERSONAL_ACCESS_TOKEN").ok())
        .or_else(|| env::var("GITHUB_TOKEN").ok())
        .or_else(gh_cli_token)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}
