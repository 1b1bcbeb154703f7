//! End-of-build notification to the Simile service.
//!
//! [`SimileNotifier`] issues one `POST {base}/repository` carrying the job's
//! repository, branch and contact email as query parameters. There are no
//! retries. Whatever happens (success, a rejected request or a transport
//! failure) is written to the build log and returned as a
//! [`NotificationOutcome`]; nothing escapes as an error, so a notification
//! can never fail the build that triggered it.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;

use simile_core::{NotificationConfig, ServerConfig};

use crate::sink::LogSink;

/// First banner line; the separator below it has the same length.
pub const BANNER_TITLE: &str = "Simile Build Notifier";

pub const MSG_SENDING: &str = "Sending data to Simile for component search.";
pub const MSG_SUCCESS: &str = "Data sent successfully!";
pub const MSG_FAILURE: &str = "An error happened when sending data to Simile.";

/// Stand-in body when a rejected response cannot be read.
const UNREADABLE_BODY: &str = "<unreadable body>";

const JSON_MEDIA_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a single delivery attempt did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The request never produced a response (connection refused, DNS,
    /// timeout, invalid URL, malformed response, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Simile answered with something other than `200 OK`.
    #[error("Simile returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of one notification, used to drive the log lines and reported to
/// the caller. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub succeeded: bool,
    /// Absent when no HTTP response was received.
    pub http_status: Option<u16>,
    /// Response body or failure description; empty on success.
    pub detail: String,
}

impl NotificationOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            http_status: Some(StatusCode::OK.as_u16()),
            detail: String::new(),
        }
    }

    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            http_status: Some(status),
            detail: body.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            http_status: None,
            detail: detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SimileNotifier
// ---------------------------------------------------------------------------

/// Sends build notifications to Simile.
///
/// Holds a [`reqwest::Client`] so repeated notifications from the same
/// process share a connection pool. Redirects are not followed: a `3xx`
/// answer is reported like any other non-200 status.
#[derive(Debug, Clone)]
pub struct SimileNotifier {
    client: reqwest::Client,
}

impl SimileNotifier {
    /// Notifier without a request timeout.
    pub fn new() -> Result<Self, NotifyError> {
        let client = client_builder().build()?;
        Ok(Self { client })
    }

    /// Notifier whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, NotifyError> {
        let client = client_builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Reuse an existing [`reqwest::Client`]. Its redirect policy is used
    /// as configured.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send the notification for a finished build and report progress to
    /// `log`.
    ///
    /// Resolves once the request has completed or failed. Never returns an
    /// error: failures are logged and described by the returned outcome.
    pub async fn notify<L>(
        &self,
        config: &NotificationConfig,
        server: &ServerConfig,
        log: &mut L,
    ) -> NotificationOutcome
    where
        L: LogSink + ?Sized,
    {
        let endpoint = server.endpoint();
        write_banner(log, &endpoint);

        match self.send(&endpoint, config).await {
            Ok(()) => {
                tracing::info!(%endpoint, "Simile notification delivered");
                log.write_line(MSG_SUCCESS);
                log.write_line(&separator());
                NotificationOutcome::success()
            }
            Err(NotifyError::HttpStatus { status, body }) => {
                tracing::warn!(%endpoint, status, "Simile rejected notification");
                log.write_line(MSG_FAILURE);
                log.write_line(&body);
                NotificationOutcome::rejected(status, body)
            }
            Err(NotifyError::Request(e)) => {
                let description = e.to_string();
                tracing::warn!(%endpoint, error = %description, "Simile notification failed");

                log.write_line(MSG_FAILURE);
                log.write_line(&description);
                let err = anyhow::Error::new(e);
                for cause in err.chain().skip(1) {
                    log.write_line(&format!("Caused by: {cause}"));
                }

                NotificationOutcome::failed(description)
            }
        }
    }

    /// Execute the POST and check for an exact `200 OK`.
    async fn send(&self, endpoint: &str, config: &NotificationConfig) -> Result<(), NotifyError> {
        tracing::debug!(
            endpoint,
            repository = config.repository(),
            branch = config.branch(),
            "Sending Simile notification"
        );

        let response = self
            .client
            .post(endpoint)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .query(&[
                ("repo", config.repository()),
                ("branch", config.branch()),
                ("email", config.email()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            return Err(NotifyError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder().redirect(reqwest::redirect::Policy::none())
}

fn separator() -> String {
    "=".repeat(BANNER_TITLE.chars().count())
}

fn write_banner<L: LogSink + ?Sized>(log: &mut L, endpoint: &str) {
    log.write_line(BANNER_TITLE);
    log.write_line(&separator());
    log.write_line(MSG_SENDING);
    log.write_line(&format!("Simile Endpoint: {endpoint}"));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
