pub mod error;
pub mod retry;
pub mod service;

pub use error::{DeliveryError, DeliveryOperation, NotifyError};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use service::{metadata_text, FileUpload, WebhookNotifier, WebhookNotifierConfig};
