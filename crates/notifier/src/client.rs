//! Webhook delivery primitive.
//!
//! One POST per message, body `{"Content": "<message>"}`. Responses outside
//! the 2xx range are reported as errors so the dispatcher can log them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use chime_common::config::AppConfig;

/// Longest response body excerpt kept in a [`DeliveryError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// JSON body expected by the chat webhook.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(rename = "Content")]
    content: &'a str,
}

/// Sends a formatted message to a single webhook URL.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(&self, url: &str, message: &str) -> Result<(), DeliveryError>;
}

/// `reqwest`-backed webhook sender. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, DeliveryError> {
        Self::new(
            &config.user_agent,
            Duration::from_secs(config.http_timeout_secs),
        )
    }
}

#[async_trait]
impl WebhookSender for WebhookClient {
    async fn send(&self, url: &str, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&WebhookPayload { content: message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        tracing::debug!(status = status.as_u16(), "Webhook accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_has_single_content_key() {
        let json = serde_json::to_value(WebhookPayload {
            content: "/md ### hello",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "Content": "/md ### hello" }));
    }

    #[test]
    fn test_status_error_display() {
        let err = DeliveryError::Status {
            status: 404,
            body: "no such hook".to_string(),
        };
        assert_eq!(err.to_string(), "Webhook returned HTTP 404: no such hook");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Reserve a free port, then close it so the connection is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = WebhookClient::new("test-agent", Duration::from_secs(2)).unwrap();
        let err = client
            .send(&format!("http://{}/hook", addr), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }
}
