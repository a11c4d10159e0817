//! Chat webhook notifier
//!
//! Best-effort: posts a Google Chat card announcing a finished video. Every
//! failure is logged and dropped; nothing is retried and nothing reaches the
//! caller of the pipeline.

use serde_json::{json, Value};
use std::time::Duration;

use crate::models::WorkflowResult;
use crate::providers::{build_http_client, ProviderError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TITLE: &str = "Nuevo video generado";
const DOWNLOAD_LABEL: &str = "Descargar video";

/// What happened to one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// No webhook configured
    Disabled,
    Delivered,
    /// Network error or non-success status; already logged
    Failed(String),
}

/// Webhook notifier
#[derive(Clone)]
pub struct Notifier {
    webhook_url: Option<String>,
    http_client: reqwest::Client,
}

impl Notifier {
    /// Notifier posting to `webhook_url`; `None` makes every call a no-op
    pub fn new(webhook_url: Option<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            webhook_url: webhook_url.filter(|u| !u.trim().is_empty()),
            http_client: build_http_client(REQUEST_TIMEOUT)?,
        })
    }

    pub fn disabled() -> Self {
        Self {
            webhook_url: None,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Post the summary card
    pub async fn notify(&self, result: &WorkflowResult) -> NotifyOutcome {
        let Some(url) = &self.webhook_url else {
            return NotifyOutcome::Disabled;
        };

        let response = self
            .http_client
            .post(url)
            .json(&build_message(result))
            .send()
            .await;

        let outcome = match response {
            Ok(response) if response.status().is_success() => NotifyOutcome::Delivered,
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                NotifyOutcome::Failed(format!("webhook returned {}: {}", status.as_u16(), body))
            }
            Err(e) => NotifyOutcome::Failed(format!("webhook unreachable: {}", e)),
        };

        match &outcome {
            NotifyOutcome::Delivered => {
                tracing::info!(video_id = %result.video_id, "Chat notification sent")
            }
            NotifyOutcome::Failed(reason) => {
                tracing::warn!(video_id = %result.video_id, reason = %reason, "Chat notification failed")
            }
            NotifyOutcome::Disabled => {}
        }

        outcome
    }
}

/// Google Chat `cardsV2` message for a finished video
pub fn build_message(result: &WorkflowResult) -> Value {
    let title = if result.title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        result.title.as_str()
    };
    let references = if result.references.trim().is_empty() {
        "Sin referencias"
    } else {
        result.references.as_str()
    };

    json!({
        "cardsV2": [{
            "cardId": format!("video-{}", result.video_id),
            "card": {
                "header": {
                    "title": title,
                    "subtitle": "Video listo",
                },
                "sections": [
                    {
                        "widgets": [{
                            "buttonList": {
                                "buttons": [{
                                    "text": DOWNLOAD_LABEL,
                                    "onClick": { "openLink": { "url": result.video_url } },
                                }]
                            }
                        }]
                    },
                    {
                        "header": "Referencias",
                        "widgets": [{ "textParagraph": { "text": references } }]
                    }
                ]
            }
        }]
    })
}
