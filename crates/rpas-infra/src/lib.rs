//! RPAS Data Loader Infrastructure Library
//!
//! Outbound integrations used after a survey submission:
//! - Webhook delivery (JSON payload or multipart file upload)
//! - Bounded exponential-backoff retry

#[cfg(feature = "webhook")]
pub mod webhook;

// Re-export commonly used types
#[cfg(feature = "webhook")]
pub use webhook::{
    DeliveryError, FileUpload, NotifyError, RetryPolicy, WebhookNotifier, WebhookNotifierConfig,
};
