//! Submission validation for the survey forms.
//!
//! Every shape runs a fixed list of rules and stops at the first failure, so
//! the order of the checks decides which message the user sees. Keep it
//! stable.

use crate::config::LoaderConfig;
use crate::models::{InputField, SurveyFile, SurveyInput, SurveyType, ValidationResult};

pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = [".las", ".laz", ".xyz", ".txt"];
pub const DEFAULT_MAX_FILE_SIZE_MB: f64 = 500.0;
/// Always accepted for Small Project Imagery on top of the configured set
pub const IMAGERY_EXTENSIONS: [&str; 5] = [".tif", ".tiff", ".jpg", ".jpeg", ".png"];

const SURVEY_FILE_REQUIRED: &str = "Survey File is required. Please select a file.";
const FILE_NAME_REQUIRED: &str = "File Name is required. Please enter the file name.";
const FILE_NAME_IS_PATH: &str =
    "Please enter only the filename, not a full path (for example: imagery.tif).";
const PROJECT_NAME_REQUIRED: &str = "Project Name is required. Please enter a project name.";
const PROJECTION_REQUIRED: &str = "Projection is required. Please select a projection.";
const ACQUISITION_DATE_REQUIRED: &str = "Acquisition Date is required. Please select a date.";
const SURVEY_TIME_REQUIRED: &str = "Survey Time is required. Please enter a time.";

/// Survey form validator
///
/// Holds the file rules (allowed extensions, size limit) resolved from the
/// loader configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyValidator {
    allowed_extensions: Vec<String>,
    max_file_size_mb: f64,
}

impl Default for SurveyValidator {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl SurveyValidator {
    /// `None` (or a zero/negative size) falls back to the defaults.
    pub fn new(allowed_extensions: Option<Vec<String>>, max_file_size_mb: Option<f64>) -> Self {
        let allowed_extensions = allowed_extensions.unwrap_or_else(|| {
            DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect()
        });
        let max_file_size_mb = max_file_size_mb
            .filter(|mb| *mb > 0.0)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        Self {
            allowed_extensions,
            max_file_size_mb,
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.allowed_extensions.clone(), config.max_file_size_mb)
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Configured extensions followed by the imagery extensions
    pub fn imagery_extensions(&self) -> Vec<String> {
        merge_extensions(&self.allowed_extensions, &IMAGERY_EXTENSIONS[..])
    }

    pub fn max_file_size_mb(&self) -> f64 {
        self.max_file_size_mb
    }

    /// Validate with the shape the survey type uses for an uploaded file.
    pub fn validate(&self, survey_type: SurveyType, input: &SurveyInput) -> ValidationResult {
        match survey_type {
            SurveyType::RpasElevation => self.validate_rpas_inputs(input),
            SurveyType::TlsElevation => self.validate_tls_inputs(input),
            SurveyType::SmallProjectImagery => self.validate_imagery_inputs(input),
        }
    }

    /// File, required fields, then extension and size. Extension and size
    /// failures carry no field.
    pub fn validate_rpas_inputs(&self, input: &SurveyInput) -> ValidationResult {
        let Some(file) = input.file.as_ref() else {
            return ValidationResult::invalid_field(SURVEY_FILE_REQUIRED, InputField::SelectedFile);
        };

        if let Some(failure) = check_required_fields(input) {
            return failure;
        }

        if let Some(failure) = check_extension(&file.name, &self.allowed_extensions, None) {
            return failure;
        }

        if let Some(failure) = self.check_size(file, None) {
            return failure;
        }

        ValidationResult::valid()
    }

    /// TLS submissions follow the RPAS rules.
    pub fn validate_tls_inputs(&self, input: &SurveyInput) -> ValidationResult {
        self.validate_rpas_inputs(input)
    }

    /// Imagery with an inline file: file, extension and size first (all
    /// attributed to `selectedFile`), then the required fields.
    pub fn validate_imagery_inputs(&self, input: &SurveyInput) -> ValidationResult {
        let Some(file) = input.file.as_ref() else {
            return ValidationResult::invalid_field(SURVEY_FILE_REQUIRED, InputField::SelectedFile);
        };

        let allowed = self.imagery_extensions();
        if let Some(failure) = check_extension(&file.name, &allowed, Some(InputField::SelectedFile))
        {
            return failure;
        }

        if let Some(failure) = self.check_size(file, Some(InputField::SelectedFile)) {
            return failure;
        }

        check_required_fields(input).unwrap_or_else(ValidationResult::valid)
    }

    /// Imagery referenced by file name only (no upload, so no size check).
    /// The name must be a bare filename; any path separator is rejected.
    pub fn validate_imagery_filename_inputs(&self, input: &SurveyInput) -> ValidationResult {
        let file_name = input.file_name().unwrap_or_default();

        if file_name.trim().is_empty() {
            return ValidationResult::invalid_field(FILE_NAME_REQUIRED, InputField::FileName);
        }

        if contains_path_separator(file_name) {
            return ValidationResult::invalid_field(FILE_NAME_IS_PATH, InputField::FileName);
        }

        let allowed = self.imagery_extensions();
        if let Some(failure) = check_extension(file_name, &allowed, Some(InputField::FileName)) {
            return failure;
        }

        check_required_fields(input).unwrap_or_else(ValidationResult::valid)
    }

    fn check_size(&self, file: &SurveyFile, field: Option<InputField>) -> Option<ValidationResult> {
        if file.size_mb() > self.max_file_size_mb {
            return Some(ValidationResult::invalid(
                format!(
                    "File size exceeds maximum allowed size of {} MB",
                    self.max_file_size_mb
                ),
                field,
            ));
        }
        None
    }
}

/// Merge two extension lists keeping first-seen order and dropping exact
/// duplicates.
pub fn merge_extensions<S: AsRef<str>>(base: &[String], extra: &[S]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(base.len() + extra.len());
    for ext in base
        .iter()
        .map(String::as_str)
        .chain(extra.iter().map(|ext| ext.as_ref()))
    {
        if !merged.iter().any(|existing| existing == ext) {
            merged.push(ext.to_string());
        }
    }
    merged
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Project name, projection, acquisition date, survey time, in that order.
fn check_required_fields(input: &SurveyInput) -> Option<ValidationResult> {
    if is_blank(&input.project_name) {
        return Some(ValidationResult::invalid_field(
            PROJECT_NAME_REQUIRED,
            InputField::ProjectName,
        ));
    }

    if is_blank(&input.projection) {
        return Some(ValidationResult::invalid_field(
            PROJECTION_REQUIRED,
            InputField::Projection,
        ));
    }

    if input.acquisition_date.is_none() {
        return Some(ValidationResult::invalid_field(
            ACQUISITION_DATE_REQUIRED,
            InputField::AcquisitionDate,
        ));
    }

    if is_blank(&input.survey_time) {
        return Some(ValidationResult::invalid_field(
            SURVEY_TIME_REQUIRED,
            InputField::SurveyTime,
        ));
    }

    None
}

/// Case-insensitive suffix match against the allowed list.
fn check_extension(
    file_name: &str,
    allowed: &[String],
    field: Option<InputField>,
) -> Option<ValidationResult> {
    let file_name = file_name.to_lowercase();
    let has_valid_extension = allowed
        .iter()
        .any(|ext| file_name.ends_with(&ext.to_lowercase()));

    if has_valid_extension {
        return None;
    }

    tracing::debug!(file_name = %file_name, "Rejected survey file extension");
    Some(ValidationResult::invalid(
        format!("Invalid file type. Allowed extensions: {}", allowed.join(", ")),
        field,
    ))
}

/// Forward slash, backslash, or a UNC `\\server` prefix.
fn contains_path_separator(file_name: &str) -> bool {
    file_name.starts_with(r"\\") || file_name.contains(['/', '\\'])
}
