//! Report delivery.
//!
//! Reports are handed to an external channels service, which owns the actual
//! email transport. Without a configured endpoint the report is only logged.

use async_trait::async_trait;
use bizval_common::config::NotificationConfig;
use bizval_common::util::{mask_email, truncate_with_ellipsis};
use bizval_common::{Error, Result};
use bizval_valuation::ValuationReport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Maximum characters of an error response body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Delivers a rendered report to the submitter.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, email: &str, report: &ValuationReport) -> Result<()>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Build the notifier selected by configuration.
pub fn notifier_from_config(config: &NotificationConfig) -> Arc<dyn Notifier> {
    match config.endpoint.as_deref() {
        Some(endpoint) if config.enabled => Arc::new(ChannelsNotifier::new(
            endpoint,
            Duration::from_secs(config.timeout_secs),
            config.retry_count,
        )),
        _ => Arc::new(LogNotifier),
    }
}

// ============================================================================
// Log Notifier
// ============================================================================

/// Logs the delivery instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, email: &str, report: &ValuationReport) -> Result<()> {
        tracing::info!(
            recipient = %mask_email(email),
            subject = %report.subject,
            html_bytes = report.html.len(),
            "Notification delivery disabled, report logged only"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// ============================================================================
// Channels Notifier
// ============================================================================

/// Request to send a message via the channels service
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    channel_type: &'static str,
    channel_id: &'a str,
    content: SendContent<'a>,
}

/// Message content
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SendContent<'a> {
    Html {
        subject: &'a str,
        html: &'a str,
        text: &'a str,
    },
}

/// Response from the channels service
#[derive(Debug, Deserialize)]
struct SendResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Sends reports as email through the channels service's `/api/v1/send`.
pub struct ChannelsNotifier {
    endpoint: String,
    retry_count: u32,
    client: reqwest::Client,
}

impl ChannelsNotifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, retry_count: u32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            retry_count: retry_count.max(1),
            client,
        }
    }

    pub fn send_url(&self) -> String {
        format!("{}/api/v1/send", self.endpoint)
    }

    async fn try_send(&self, url: &str, request: &SendRequest<'_>) -> Result<()> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::Notification(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Notification(format!(
                "HTTP {}: {}",
                status,
                truncate_with_ellipsis(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        let result: SendResponse = response
            .json()
            .await
            .map_err(|e| Error::Notification(format!("invalid response: {e}")))?;

        if result.success {
            Ok(())
        } else {
            Err(Error::Notification(
                result.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[async_trait]
impl Notifier for ChannelsNotifier {
    async fn notify(&self, email: &str, report: &ValuationReport) -> Result<()> {
        let url = self.send_url();
        let request = SendRequest {
            channel_type: "email",
            channel_id: email,
            content: SendContent::Html {
                subject: &report.subject,
                html: &report.html,
                text: &report.text,
            },
        };

        let mut last_error = None;

        for attempt in 1..=self.retry_count {
            match self.try_send(&url, &request).await {
                Ok(()) => {
                    tracing::info!(
                        recipient = %mask_email(email),
                        attempt,
                        "Valuation report sent"
                    );
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry_count,
                        error = %e,
                        "Failed to send valuation report"
                    );
                    last_error = Some(e);

                    if attempt < self.retry_count {
                        tokio::time::sleep(Duration::from_millis(500 * u64::from(attempt))).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::Notification("no delivery attempt made".into()))
            .with_context(format!("delivering report to {}", mask_email(email))))
    }

    fn name(&self) -> &'static str {
        "channels"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> ValuationReport {
        ValuationReport {
            subject: "Business Valuation Report - Acme".into(),
            html: "<h1>Report</h1>".into(),
            text: "Report".into(),
        }
    }

    #[test]
    fn test_send_request_shape() {
        let report = make_report();
        let request = SendRequest {
            channel_type: "email",
            channel_id: "owner@acme.test",
            content: SendContent::Html {
                subject: &report.subject,
                html: &report.html,
                text: &report.text,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["channel_type"], "email");
        assert_eq!(json["channel_id"], "owner@acme.test");
        assert_eq!(json["content"]["type"], "html");
        assert_eq!(json["content"]["subject"], "Business Valuation Report - Acme");
        assert_eq!(json["content"]["text"], "Report");
    }

    #[test]
    fn test_send_url_trims_trailing_slash() {
        let notifier = ChannelsNotifier::new("http://127.0.0.1:4431/", Duration::from_secs(1), 0);
        assert_eq!(notifier.send_url(), "http://127.0.0.1:4431/api/v1/send");
        assert_eq!(notifier.retry_count, 1);
    }

    #[test]
    fn test_notifier_from_config() {
        let mut config = NotificationConfig::default();
        assert_eq!(notifier_from_config(&config).name(), "log");

        config.endpoint = Some("http://127.0.0.1:4431".into());
        assert_eq!(notifier_from_config(&config).name(), "log");

        config.enabled = true;
        assert_eq!(notifier_from_config(&config).name(), "channels");
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        assert!(LogNotifier.notify("owner@acme.test", &make_report()).await.is_ok());
    }
}
