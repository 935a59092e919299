use std::fmt;

use rpas_core::{ErrorMetadata, LogLevel};

/// Which delivery a retry loop is running, used in logs and the aggregate error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOperation {
    WebhookCall,
    FileUpload,
}

impl fmt::Display for DeliveryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOperation::WebhookCall => f.write_str("Webhook call"),
            DeliveryOperation::FileUpload => f.write_str("File upload"),
        }
    }
}

/// Failure of a single delivery attempt. Always retried while budget remains.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("request error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status} {reason}{}", body_suffix(.body))]
    Status {
        status: u16,
        reason: String,
        body: Option<String>,
    },

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn body_suffix(body: &Option<String>) -> String {
    match body.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(". {}", text),
        _ => String::new(),
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Transport(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Blank target URL. Raised before any network call.
    #[error("Webhook URL not configured")]
    NotConfigured,

    #[error("File is required for upload")]
    MissingFile,

    #[error("Failed to create HTTP client for webhooks: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    Exhausted {
        operation: DeliveryOperation,
        attempts: u32,
        #[source]
        last_error: DeliveryError,
    },
}

impl ErrorMetadata for NotifyError {
    fn error_code(&self) -> &'static str {
        match self {
            NotifyError::NotConfigured => "WEBHOOK_NOT_CONFIGURED",
            NotifyError::MissingFile => "MISSING_FILE",
            NotifyError::Client(_) => "HTTP_CLIENT_ERROR",
            NotifyError::Exhausted { .. } => "DELIVERY_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, NotifyError::Exhausted { .. })
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        match self {
            NotifyError::NotConfigured | NotifyError::MissingFile => LogLevel::Warn,
            NotifyError::Client(_) | NotifyError::Exhausted { .. } => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message() {
        let err = DeliveryError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
            body: None,
        };
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");

        let err = DeliveryError::Status {
            status: 400,
            reason: "Bad Request".to_string(),
            body: Some("missing projectName\n".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 400 Bad Request. missing projectName");
    }

    #[test]
    fn exhausted_names_attempts_and_last_error() {
        let err = NotifyError::Exhausted {
            operation: DeliveryOperation::FileUpload,
            attempts: 3,
            last_error: DeliveryError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
                body: Some(String::new()),
            },
        };
        assert_eq!(
            err.to_string(),
            "File upload failed after 3 attempts: HTTP 500 Internal Server Error"
        );
        assert_eq!(err.error_code(), "DELIVERY_FAILED");
        assert!(err.is_recoverable());
    }

    #[test]
    fn not_configured_is_not_recoverable() {
        let err = NotifyError::NotConfigured;
        assert_eq!(err.to_string(), "Webhook URL not configured");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }
}
