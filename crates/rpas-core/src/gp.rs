//! Geoprocessing (GP) service helpers
//!
//! Elevation surveys upload the file to the GP service's `uploads/upload`
//! endpoint first and submit the returned item id; imagery jobs pass the file
//! name. The HTTP side lives with the host; these helpers only build URLs and
//! parameter records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::{SurveyInput, SurveyType};

const GP_SERVER_SEGMENT: &str = "/GPServer";
const UPLOAD_PATH: &str = "/uploads/upload";
const GUEST_USER: &str = "guest";

/// GP utility entry as stored in the widget settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpUtility {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
}

impl GpUtility {
    /// Full task URL: `url/task` when a task is set, `url` otherwise,
    /// `None` when no url is configured.
    pub fn resolve_task_url(&self) -> Option<String> {
        let url = self.url.as_deref().filter(|url| !url.trim().is_empty())?;
        match self.task.as_deref().filter(|task| !task.is_empty()) {
            Some(task) => Some(format!("{}/{}", url, task)),
            None => Some(url.to_string()),
        }
    }
}

/// Upload endpoint for a GP task URL:
/// `.../Service/GPServer/Task` becomes `.../Service/GPServer/uploads/upload`.
pub fn upload_endpoint(gp_task_url: &str) -> Result<String, AppError> {
    let url = gp_task_url.trim();
    let index = url.find(GP_SERVER_SEGMENT).ok_or_else(|| {
        AppError::Configuration(
            "Invalid GP Service URL format. Must contain /GPServer".to_string(),
        )
    })?;

    let base = &url[..index + GP_SERVER_SEGMENT.len()];
    Ok(format!("{}{}", base, UPLOAD_PATH))
}

/// Extract `item.itemID` from an upload response.
pub fn parse_upload_item_id(response: &Value) -> Result<String, AppError> {
    let item_id = response
        .get("item")
        .and_then(|item| item.get("itemID"))
        .ok_or_else(|| {
            AppError::InvalidInput("Upload response does not contain itemID".to_string())
        })?;

    match item_id {
        Value::String(id) => Ok(id.clone()),
        Value::Number(id) => Ok(id.to_string()),
        _ => Err(AppError::InvalidInput(
            "Upload response itemID is not a string".to_string(),
        )),
    }
}

/// Parameter record for the GP `submitJob` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpJobParameters {
    #[serde(rename = "Survey_File", skip_serializing_if = "Option::is_none")]
    pub survey_file: Option<String>,
    #[serde(rename = "File_Name", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "Project_Name")]
    pub project_name: String,
    #[serde(rename = "Projection")]
    pub projection: String,
    #[serde(rename = "Survey_Type")]
    pub survey_type: String,
    #[serde(rename = "Acquisition_Date")]
    pub acquisition_date: String,
    #[serde(rename = "Survey_Time")]
    pub survey_time: String,
    #[serde(rename = "Logged_User_Email")]
    pub logged_user_email: String,
}

impl GpJobParameters {
    /// Build the job parameters for a validated submission.
    ///
    /// Elevation surveys need the uploaded `item_id`; imagery uses the file
    /// name from the input. A blank `user` is sent as `guest`.
    pub fn for_survey(
        survey_type: SurveyType,
        input: &SurveyInput,
        item_id: Option<&str>,
        user: &str,
    ) -> Result<Self, AppError> {
        let (survey_file, file_name) = if survey_type.references_file_by_name() {
            let name = input
                .file_name()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| AppError::InvalidInput("File name is required".to_string()))?;
            (None, Some(name.to_string()))
        } else {
            let item_id = item_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "Uploaded item id is required for {} surveys",
                        survey_type.gp_label()
                    ))
                })?;
            (Some(item_id.to_string()), None)
        };

        let acquisition_date = input
            .acquisition_date_string()
            .ok_or_else(|| AppError::InvalidInput("Acquisition date is required".to_string()))?;

        let user = user.trim();
        let logged_user_email = if user.is_empty() { GUEST_USER } else { user };

        Ok(Self {
            survey_file,
            file_name,
            project_name: input.project_name.clone(),
            projection: input.projection.clone(),
            survey_type: survey_type.gp_label().to_string(),
            acquisition_date,
            survey_time: input.survey_time.clone(),
            logged_user_email: logged_user_email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SurveyFile;
    use chrono::NaiveDate;
    use serde_json::json;

    fn input(file_name: &str) -> SurveyInput {
        SurveyInput {
            file: Some(SurveyFile::new(file_name, 2048)),
            project_name: "WestMine".to_string(),
            projection: "MGA50".to_string(),
            acquisition_date: NaiveDate::from_ymd_opt(2024, 3, 7),
            survey_time: "09:15".to_string(),
        }
    }

    #[test]
    fn task_url_resolution() {
        let utility = GpUtility {
            url: Some("https://server/arcgis/rest/services/Loader/GPServer".to_string()),
            task: Some("Load".to_string()),
        };
        assert_eq!(
            utility.resolve_task_url().as_deref(),
            Some("https://server/arcgis/rest/services/Loader/GPServer/Load")
        );

        let no_task = GpUtility {
            task: None,
            ..utility.clone()
        };
        assert_eq!(
            no_task.resolve_task_url().as_deref(),
            Some("https://server/arcgis/rest/services/Loader/GPServer")
        );

        assert_eq!(GpUtility::default().resolve_task_url(), None);
        let blank = GpUtility {
            url: Some("  ".to_string()),
            task: Some("Load".to_string()),
        };
        assert_eq!(blank.resolve_task_url(), None);
    }

    #[test]
    fn upload_endpoint_from_task_url() {
        assert_eq!(
            upload_endpoint(" https://server/arcgis/rest/services/Folder/Svc/GPServer/Task ")
                .unwrap(),
            "https://server/arcgis/rest/services/Folder/Svc/GPServer/uploads/upload"
        );
        assert_eq!(
            upload_endpoint("https://server/arcgis/rest/services/Svc/GPServer").unwrap(),
            "https://server/arcgis/rest/services/Svc/GPServer/uploads/upload"
        );

        let err = upload_endpoint("https://server/arcgis/rest/services/Svc/MapServer").unwrap_err();
        assert!(err.to_string().contains("Must contain /GPServer"));
    }

    #[test]
    fn extracts_upload_item_id() {
        let response = json!({ "success": true, "item": { "itemID": "i3f2c" } });
        assert_eq!(parse_upload_item_id(&response).unwrap(), "i3f2c");

        assert!(parse_upload_item_id(&json!({ "success": true })).is_err());
        assert!(parse_upload_item_id(&json!({ "item": { "itemID": null } })).is_err());
    }

    #[test]
    fn elevation_parameters() {
        let params = GpJobParameters::for_survey(
            SurveyType::TlsElevation,
            &input("scan.las"),
            Some("i3f2c"),
            "surveyor@example.com",
        )
        .unwrap();

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "Survey_File": "i3f2c",
                "Project_Name": "WestMine",
                "Projection": "MGA50",
                "Survey_Type": "TLS",
                "Acquisition_Date": "2024-03-07",
                "Survey_Time": "09:15",
                "Logged_User_Email": "surveyor@example.com"
            })
        );
    }

    #[test]
    fn elevation_requires_item_id() {
        let err = GpJobParameters::for_survey(SurveyType::RpasElevation, &input("a.las"), None, "")
            .unwrap_err();
        assert!(err.to_string().contains("RPAS"));
    }

    #[test]
    fn imagery_parameters_use_file_name_and_guest() {
        let params = GpJobParameters::for_survey(
            SurveyType::SmallProjectImagery,
            &input("ortho.tif"),
            Some("ignored"),
            "  ",
        )
        .unwrap();

        assert_eq!(params.survey_file, None);
        assert_eq!(params.file_name.as_deref(), Some("ortho.tif"));
        assert_eq!(params.survey_type, "Small Project Imagery");
        assert_eq!(params.logged_user_email, "guest");

        let value = serde_json::to_value(&params).unwrap();
        assert!(value.get("Survey_File").is_none());
        assert_eq!(value["File_Name"], "ortho.tif");
    }

    #[test]
    fn missing_date_is_rejected() {
        let mut input = input("a.las");
        input.acquisition_date = None;
        assert!(
            GpJobParameters::for_survey(SurveyType::RpasElevation, &input, Some("id"), "u")
                .is_err()
        );
    }
}
