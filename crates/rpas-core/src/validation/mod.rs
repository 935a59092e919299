//! Validation modules

pub mod fields;
pub mod survey;
pub mod webhook_url;

pub use fields::{validate_project_name, validate_time};
pub use survey::{
    merge_extensions, SurveyValidator, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB,
    IMAGERY_EXTENSIONS,
};
pub use webhook_url::validate_webhook_url;
