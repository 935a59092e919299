use serde::{Deserialize, Serialize};

use super::survey::{SurveyInput, SurveyType};

/// Job notification sent to the configured webhook. Passed through to the
/// endpoint unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub survey_type: String,
    pub project_name: String,
    pub projection: String,
    pub acquisition_date: String,
    pub survey_time: String,
    pub output_file_path: String,
    pub gp_job_id: String,
}

impl WebhookPayload {
    pub fn for_job(
        survey_type: SurveyType,
        input: &SurveyInput,
        output_file_path: impl Into<String>,
        gp_job_id: impl Into<String>,
    ) -> Self {
        Self {
            survey_type: survey_type.key().to_string(),
            project_name: input.project_name.clone(),
            projection: input.projection.clone(),
            acquisition_date: input.acquisition_date_string().unwrap_or_default(),
            survey_time: input.survey_time.clone(),
            output_file_path: output_file_path.into(),
            gp_job_id: gp_job_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn payload_uses_camel_case_keys() {
        let input = SurveyInput {
            file: None,
            project_name: "TestProject".to_string(),
            projection: "EPSG:4326".to_string(),
            acquisition_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            survey_time: "10:30".to_string(),
        };
        let payload = WebhookPayload::for_job(
            SurveyType::RpasElevation,
            &input,
            "/path/to/output",
            "job123",
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "surveyType": "rpas",
                "projectName": "TestProject",
                "projection": "EPSG:4326",
                "acquisitionDate": "2024-01-01",
                "surveyTime": "10:30",
                "outputFilePath": "/path/to/output",
                "gpJobId": "job123"
            })
        );
    }
}
