use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use rpas_core::LoaderConfig;

use super::error::{DeliveryError, DeliveryOperation, NotifyError};
use super::retry::{retry_with_backoff, RetryPolicy};

const USER_AGENT_VALUE: &str = "RPAS-Data-Loader/1.0";

/// Configuration for webhook delivery
#[derive(Debug, Clone)]
pub struct WebhookNotifierConfig {
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// First backoff wait; doubles after every failed attempt
    pub backoff_base: Duration,
}

impl Default for WebhookNotifierConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl From<&LoaderConfig> for WebhookNotifierConfig {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            timeout_seconds: config.webhook_timeout_seconds,
            ..Default::default()
        }
    }
}

/// File sent as the `file` part of a multipart upload
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Posts job notifications to an operator-configured webhook.
///
/// Every call is independent: the URL is checked, then the request is
/// attempted up to the retry budget with exponential backoff between
/// attempts. Nothing is kept between calls.
#[derive(Clone)]
pub struct WebhookNotifier {
    http_client: Client,
    config: WebhookNotifierConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookNotifierConfig) -> Result<Self, NotifyError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// POST `payload` as JSON.
    ///
    /// Fails with [`NotifyError::NotConfigured`] without any request when the
    /// URL is blank.
    #[tracing::instrument(skip(self, payload))]
    pub async fn send_json<T>(
        &self,
        url: &str,
        payload: &T,
        retry_count: u32,
    ) -> Result<(), NotifyError>
    where
        T: Serialize + ?Sized,
    {
        let url = require_url(url)?;
        let policy = RetryPolicy::new(retry_count, self.config.backoff_base);

        retry_with_backoff(DeliveryOperation::WebhookCall, policy, |_| async move {
            let body = serde_json::to_vec(payload)?;
            let response = self
                .http_client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .header(USER_AGENT, USER_AGENT_VALUE)
                .body(body)
                .send()
                .await?;

            check_status(response, false).await
        })
        .await?;

        tracing::info!(url = %url, "Webhook call successful");
        Ok(())
    }

    /// POST a multipart form with one `file` part plus one text part per
    /// metadata entry. Null metadata values are skipped.
    ///
    /// The content type is left to the client so that it carries the
    /// multipart boundary.
    #[tracing::instrument(skip(self, file, metadata), fields(file_name = %file.file_name))]
    pub async fn upload_file(
        &self,
        url: &str,
        file: &FileUpload,
        metadata: &Map<String, Value>,
        retry_count: u32,
    ) -> Result<(), NotifyError> {
        let url = require_url(url)?;
        if file.file_name.trim().is_empty() {
            return Err(NotifyError::MissingFile);
        }

        let policy = RetryPolicy::new(retry_count, self.config.backoff_base);

        retry_with_backoff(DeliveryOperation::FileUpload, policy, |_| async move {
            // A form is consumed by the request, so each attempt builds its own.
            let response = self
                .http_client
                .post(url)
                .header(USER_AGENT, USER_AGENT_VALUE)
                .multipart(build_form(file, metadata))
                .send()
                .await?;

            check_status(response, true).await
        })
        .await?;

        tracing::info!(
            url = %url,
            file_size = file.bytes.len(),
            metadata_fields = metadata.len(),
            "File upload to webhook successful"
        );
        Ok(())
    }
}

fn require_url(url: &str) -> Result<&str, NotifyError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(NotifyError::NotConfigured);
    }
    Ok(trimmed)
}

fn build_form(file: &FileUpload, metadata: &Map<String, Value>) -> Form {
    let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    let mut form = Form::new().part("file", part);

    for (key, value) in metadata {
        if let Some(text) = metadata_text(value) {
            form = form.text(key.clone(), text);
        }
    }

    form
}

/// Text sent for a metadata value: strings verbatim, other values as JSON
/// text, `None` for null.
pub fn metadata_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

async fn check_status(response: Response, include_body: bool) -> Result<(), DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = if include_body {
        Some(
            response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Failed to read response body")),
        )
    } else {
        None
    };

    Err(DeliveryError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_defaults() {
        let config = WebhookNotifierConfig::default();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn config_from_loader_config() {
        let loader = LoaderConfig {
            webhook_timeout_seconds: 5,
            ..Default::default()
        };
        let config = WebhookNotifierConfig::from(&loader);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn metadata_text_conversion() {
        assert_eq!(metadata_text(&json!("WestMine")).as_deref(), Some("WestMine"));
        assert_eq!(metadata_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(metadata_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(metadata_text(&json!(1.5)).as_deref(), Some("1.5"));
        assert_eq!(metadata_text(&Value::Null), None);
    }

    #[test]
    fn blank_url_is_not_configured() {
        assert!(matches!(require_url(""), Err(NotifyError::NotConfigured)));
        assert!(matches!(require_url(" \t "), Err(NotifyError::NotConfigured)));
        assert_eq!(
            require_url(" https://example.com/hook ").unwrap(),
            "https://example.com/hook"
        );
    }
}
