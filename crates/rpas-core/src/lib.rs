//! RPAS Data Loader Core Library
//!
//! This crate provides the domain models, validation rules, loader configuration,
//! error types and geoprocessing helpers shared by the notifier and the CLI.

pub mod config;
pub mod error;
pub mod gp;
pub mod models;
pub mod projections;
pub mod validation;

// Re-export commonly used types
pub use config::{parse_allowed_extensions, parse_max_file_size_mb, LoaderConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use gp::{parse_upload_item_id, upload_endpoint, GpJobParameters, GpUtility};
pub use models::{InputField, SurveyFile, SurveyInput, SurveyType, ValidationResult, WebhookPayload};
pub use projections::{is_known_projection, projection_options, ProjectionOption};
pub use validation::{validate_project_name, validate_time, validate_webhook_url, SurveyValidator};
