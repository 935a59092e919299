use serde::{Deserialize, Serialize};

/// Form input a validation failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    SelectedFile,
    FileName,
    ProjectName,
    Projection,
    AcquisitionDate,
    SurveyTime,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::SelectedFile => "selectedFile",
            InputField::FileName => "fileName",
            InputField::ProjectName => "projectName",
            InputField::Projection => "projection",
            InputField::AcquisitionDate => "acquisitionDate",
            InputField::SurveyTime => "surveyTime",
        }
    }
}

/// Outcome of validating a submission. `error` is empty when valid; `field`
/// names the first offending input when the failure is attributable to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<InputField>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: String::new(),
            field: None,
        }
    }

    pub fn invalid(error: impl Into<String>, field: Option<InputField>) -> Self {
        Self {
            is_valid: false,
            error: error.into(),
            field,
        }
    }

    pub fn invalid_field(error: impl Into<String>, field: InputField) -> Self {
        Self::invalid(error, Some(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_result_serializes_without_field() {
        let json = serde_json::to_value(ValidationResult::valid()).unwrap();
        assert_eq!(json, serde_json::json!({ "isValid": true, "error": "" }));
    }

    #[test]
    fn invalid_result_serializes_field_name() {
        let result = ValidationResult::invalid_field("Projection is required.", InputField::Projection);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["field"], "projection");
        assert_eq!(InputField::AcquisitionDate.as_str(), "acquisitionDate");
    }
}
