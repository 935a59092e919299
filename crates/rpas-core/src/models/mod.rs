pub mod survey;
pub mod validation;
pub mod webhook;

pub use survey::{SurveyFile, SurveyInput, SurveyType};
pub use validation::{InputField, ValidationResult};
pub use webhook::WebhookPayload;
