//! Remote history client.
//!
//! Fetches `/api/reports` from a running server so a history can be
//! rendered without local access to the store. One request, no retry: a
//! failure is terminal.

use crate::models::{ReportEntry, Snapshot};
use crate::scanner::parse_ordinal;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::{Host, Url};

/// Failure to fetch a history from a remote server.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the report history API.
pub struct ReportsClient {
    base_url: String,
    timeout_seconds: u64,
    http_client: reqwest::Client,
    show_progress: bool,
}

impl ReportsClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str, timeout_seconds: u64, show_progress: bool) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_seconds));
        if is_loopback(base_url) {
            builder = builder.no_proxy();
        }
        let http_client = builder.build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds,
            http_client,
            show_progress,
        })
    }

    fn reports_url(&self) -> String {
        format!("{}/api/reports", self.base_url)
    }

    /// Fetch a website's snapshots, newest first.
    pub async fn fetch_reports(&self, website_id: &str) -> Result<Vec<ReportEntry>, FetchError> {
        let url = self.reports_url();
        info!("Fetching reports for {} from {}", website_id, url);

        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} [{elapsed}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(format!("Fetching {}", website_id));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let result = self.send(&url, website_id).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let entries = result?;
        debug!("Fetched {} reports", entries.len());
        Ok(entries)
    }

    async fn send(&self, url: &str, website_id: &str) -> Result<Vec<ReportEntry>, FetchError> {
        let response = self
            .http_client
            .get(url)
            .query(&[("website_id", website_id)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    FetchError::Connect(self.base_url.clone())
                } else {
                    FetchError::Request(e)
                }
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Whether a base URL points at this machine; such requests skip proxies.
fn is_loopback(base_url: &str) -> bool {
    let Ok(url) = Url::parse(base_url) else {
        return false;
    };

    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Convert fetched entries back into snapshots, keeping their order.
///
/// Entries whose name carries no ordinal are skipped.
pub fn into_snapshots(entries: Vec<ReportEntry>) -> Vec<Snapshot> {
    entries
        .into_iter()
        .filter_map(|entry| match parse_ordinal(&entry.report_name) {
            Some(ordinal) => Some(Snapshot {
                name: entry.report_name,
                ordinal,
                issues: entry.issues,
            }),
            None => {
                warn!("Skipping fetched report '{}': name has no ordinal", entry.report_name);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_url_trims_slash() {
        let client = ReportsClient::new("http://localhost:3000/", 5, false).unwrap();
        assert_eq!(client.reports_url(), "http://localhost:3000/api/reports");
    }

    #[test]
    fn test_is_loopback() {
        assert!(is_loopback("http://127.0.0.1:3000"));
        assert!(is_loopback("http://localhost:3000"));
        assert!(is_loopback("http://[::1]:3000"));
        assert!(!is_loopback("https://reports.example.com"));
        assert!(!is_loopback("not a url"));
    }

    #[test]
    fn test_into_snapshots() {
        let entries: Vec<ReportEntry> = serde_json::from_str(
            r#"[
                {"reportName": "report-2", "issues": [
                    {"issue_type": "label", "code": "<input>", "impact": "serious", "llm_suggestions": ""}
                ]},
                {"reportName": "latest", "issues": []},
                {"reportName": "report-1", "issues": []}
            ]"#,
        )
        .unwrap();

        let snapshots = into_snapshots(entries);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].name, "report-2");
        assert_eq!(snapshots[0].ordinal, 2);
        assert_eq!(snapshots[0].issues.len(), 1);
        assert_eq!(snapshots[1].ordinal, 1);
    }

    async fn spawn_server() -> String {
        use crate::config::Config;
        use crate::server::{create_router, AppState};
        use crate::store::MemoryStore;
        use std::sync::Arc;

        let store = MemoryStore::new()
            .with_snapshot("example_com", "report-1", "[]")
            .with_snapshot(
                "example_com",
                "report-2",
                r#"[{"issue_type": "label", "code": "<input>", "llm_suggestions": "x"}]"#,
            );
        let router = create_router(AppState::new(Arc::new(store), Config::default()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_reports_from_server() {
        let base_url = spawn_server().await;
        let client = ReportsClient::new(&base_url, 5, false).unwrap();

        let entries = client.fetch_reports("example_com").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.report_name.as_str()).collect();
        assert_eq!(names, vec!["report-2", "report-1"]);
        assert_eq!(entries[0].issues[0].issue_type, "label");
    }

    #[tokio::test]
    async fn test_fetch_unknown_website_is_status_error() {
        let base_url = spawn_server().await;
        let client = ReportsClient::new(&base_url, 5, false).unwrap();

        let err = client.fetch_reports("nowhere_org").await.unwrap_err();
        match err {
            FetchError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Reports not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
