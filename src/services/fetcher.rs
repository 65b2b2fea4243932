//! HTTP fetch of the contribution calendar markup

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};

use crate::types::{ContribError, Result};

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent sent with every request
const CLIENT_USER_AGENT: &str = concat!("contribgraph/", env!("CARGO_PKG_VERSION"));

/// Source of raw calendar markup
pub trait ContributionFetcher: Send + Sync {
    /// Fetch the document at `url`. Any failure is a `ContribError::Transport`.
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ContribError::Transport(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

impl ContributionFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "text/html")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .map_err(|e| ContribError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} returned {}", url, status);
            return Err(ContribError::Transport(status_summary(status)));
        }

        response
            .text()
            .map_err(|e| ContribError::Transport(format!("Failed to read response: {}", e)))
    }
}

/// Human-readable status line, e.g. "HTTP 404: Not Found"
pub fn status_summary(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_summary() {
        assert_eq!(status_summary(StatusCode::NOT_FOUND), "HTTP 404: Not Found");
        assert_eq!(
            status_summary(StatusCode::INTERNAL_SERVER_ERROR),
            "HTTP 500: Internal Server Error"
        );
        assert_eq!(
            status_summary(StatusCode::TOO_MANY_REQUESTS),
            "HTTP 429: Too Many Requests"
        );
    }

    #[test]
    fn test_status_summary_unknown_code() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(status_summary(status), "HTTP 599: Unknown Status");
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(CLIENT_USER_AGENT.starts_with("contribgraph/"));
    }

    #[test]
    #[ignore] // Network required
    fn test_github_reachable() {
        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse("https://github.com/users/octocat/contributions").unwrap();
        let html = fetcher.fetch(&url).unwrap();
        assert!(html.contains("ContributionCalendar-day"));
    }
}
