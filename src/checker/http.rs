// src/checker/http.rs
// =============================================================================
// Optional liveness check for external links (--check-external).
//
// Internal links are judged against the file index only. External http(s)
// links can additionally be requested over the network:
// - HEAD request (no body download), up to 5 redirects, 10 s timeout
// - up to MAX_IN_FLIGHT requests at once
// - failures are sorted into timeout / DNS / TLS / redirect loop / other
//
// The outcome only feeds the report. It never changes internal
// classification or reachability.
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

const MAX_IN_FLIGHT: usize = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "target", rename_all = "snake_case")]
pub enum LinkStatus {
    /// 2xx
    Ok,
    /// 3xx left unfollowed; holds the Location header
    Redirect(String),
    /// 404 or 410
    Broken,
    Timeout,
    SslError,
    TooManyRedirects,
    DnsError,
    /// Any other status or transport failure
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCheckResult {
    pub url: String,
    #[serde(flatten)]
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LinkCheckResult {
    /// Ok and Redirect count as alive.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, LinkStatus::Ok | LinkStatus::Redirect(_))
    }
}

// Checks every URL once, concurrently
//
// Results come back in completion order; callers that need a stable
// order sort them.
pub async fn check_links(urls: Vec<String>) -> Result<Vec<LinkCheckResult>> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .context("failed to create HTTP client")?;

    info!("checking {} external link(s)", urls.len());

    let checks = urls.into_iter().map(|url| {
        let client = client.clone();
        async move { check_single_link(client, url).await }
    });

    let mut results: Vec<LinkCheckResult> = stream::iter(checks)
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await;
    results.sort_by(|a, b| a.url.cmp(&b.url));
    Ok(results)
}

async fn check_single_link(client: Client, url: String) -> LinkCheckResult {
    let result = match client.head(&url).send().await {
        Ok(response) => analyze_response(url, response.status(), location(&response)),
        Err(e) => categorize_error(url, e),
    };
    debug!("{} -> {:?}", result.url, result.status);
    result
}

fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// Maps an HTTP status onto a LinkStatus
fn analyze_response(url: String, status: StatusCode, location: Option<String>) -> LinkCheckResult {
    let code = status.as_u16();

    let (status, message) = if status.is_success() {
        (LinkStatus::Ok, format!("HTTP {}", code))
    } else if status.is_redirection() {
        let target = location.unwrap_or_else(|| "unknown".to_string());
        let message = format!("HTTP {} -> {}", code, target);
        (LinkStatus::Redirect(target), message)
    } else if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
        (LinkStatus::Broken, format!("HTTP {}", code))
    } else {
        (LinkStatus::Error, format!("HTTP {}", code))
    };

    LinkCheckResult {
        url,
        status,
        message: Some(message),
    }
}

fn categorize_error(url: String, error: reqwest::Error) -> LinkCheckResult {
    let (status, message) = classify_failure(
        error.is_timeout(),
        error.is_redirect(),
        error.is_connect(),
        &error.to_string(),
    );
    LinkCheckResult {
        url,
        status,
        message: Some(message),
    }
}

// Separated from categorize_error so it can be tested without a network
fn classify_failure(
    timeout: bool,
    redirect: bool,
    connect: bool,
    text: &str,
) -> (LinkStatus, String) {
    let lower = text.to_lowercase();

    if timeout {
        (LinkStatus::Timeout, "Request timed out".to_string())
    } else if redirect {
        (LinkStatus::TooManyRedirects, "Too many redirects".to_string())
    } else if connect && lower.contains("dns") {
        (LinkStatus::DnsError, "Could not resolve hostname".to_string())
    } else if lower.contains("certificate") || lower.contains("ssl") || lower.contains("tls") {
        (LinkStatus::SslError, "SSL certificate error".to_string())
    } else if connect {
        (LinkStatus::Error, "Connection failed".to_string())
    } else {
        (LinkStatus::Error, text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_result_is_ok() {
        let ok = LinkCheckResult {
            url: "https://example.com".to_string(),
            status: LinkStatus::Redirect("https://www.example.com/".to_string()),
            message: None,
        };
        assert!(ok.is_ok());

        let broken = LinkCheckResult {
            url: "https://example.com/gone".to_string(),
            status: LinkStatus::Broken,
            message: None,
        };
        assert!(!broken.is_ok());
    }

    #[test]
    fn test_analyze_response_statuses() {
        let url = || "https://example.com".to_string();
        assert_eq!(analyze_response(url(), StatusCode::OK, None).status, LinkStatus::Ok);
        assert_eq!(analyze_response(url(), StatusCode::GONE, None).status, LinkStatus::Broken);
        assert_eq!(
            analyze_response(url(), StatusCode::INTERNAL_SERVER_ERROR, None).status,
            LinkStatus::Error
        );

        let moved = analyze_response(
            url(),
            StatusCode::MOVED_PERMANENTLY,
            Some("https://www.example.com/".to_string()),
        );
        assert_eq!(moved.status, LinkStatus::Redirect("https://www.example.com/".to_string()));
        assert_eq!(moved.message.as_deref(), Some("HTTP 301 -> https://www.example.com/"));
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(classify_failure(true, false, false, "").0, LinkStatus::Timeout);
        assert_eq!(classify_failure(false, true, false, "").0, LinkStatus::TooManyRedirects);
        assert_eq!(
            classify_failure(false, false, true, "dns error: no record").0,
            LinkStatus::DnsError
        );
        assert_eq!(
            classify_failure(false, false, false, "invalid peer certificate").0,
            LinkStatus::SslError
        );
        assert_eq!(classify_failure(false, false, true, "refused").0, LinkStatus::Error);
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = LinkCheckResult {
            url: "https://example.com/gone".to_string(),
            status: LinkStatus::Broken,
            message: Some("HTTP 404".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "broken");
        assert_eq!(json["message"], "HTTP 404");
    }

    #[tokio::test]
    async fn test_no_urls_means_no_requests() {
        let results = check_links(Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }
}
