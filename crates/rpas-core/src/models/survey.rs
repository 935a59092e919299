//! Survey submission models

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of survey being submitted. Each kind maps to a GP service and a
/// validation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurveyType {
    #[serde(rename = "rpas")]
    RpasElevation,
    #[serde(rename = "tls")]
    TlsElevation,
    #[serde(rename = "imagery")]
    SmallProjectImagery,
}

impl SurveyType {
    pub const ALL: [SurveyType; 3] = [
        SurveyType::RpasElevation,
        SurveyType::TlsElevation,
        SurveyType::SmallProjectImagery,
    ];

    /// Short key used in webhook payloads and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            SurveyType::RpasElevation => "rpas",
            SurveyType::TlsElevation => "tls",
            SurveyType::SmallProjectImagery => "imagery",
        }
    }

    /// Label sent as the GP `Survey_Type` parameter
    pub fn gp_label(&self) -> &'static str {
        match self {
            SurveyType::RpasElevation => "RPAS",
            SurveyType::TlsElevation => "TLS",
            SurveyType::SmallProjectImagery => "Small Project Imagery",
        }
    }

    /// Imagery jobs reference the survey file by name; the elevation jobs
    /// upload it first and pass the returned item id.
    pub fn references_file_by_name(&self) -> bool {
        matches!(self, SurveyType::SmallProjectImagery)
    }
}

impl fmt::Display for SurveyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SurveyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rpas" | "rpas-elevation" => Ok(SurveyType::RpasElevation),
            "tls" | "tls-elevation" => Ok(SurveyType::TlsElevation),
            "imagery" | "smallproject" | "small-project-imagery" => {
                Ok(SurveyType::SmallProjectImagery)
            }
            other => {
                let expected: Vec<&str> = SurveyType::ALL.iter().map(SurveyType::key).collect();
                Err(format!(
                    "Unknown survey type '{}'. Expected one of: {}",
                    other,
                    expected.join(", ")
                ))
            }
        }
    }
}

/// Metadata of the survey file. The file content is never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyFile {
    pub name: String,
    pub size_bytes: u64,
}

impl SurveyFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// A file referenced by name only (no upload, size unknown)
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, 0)
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Field values collected by the submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyInput {
    pub file: Option<SurveyFile>,
    pub project_name: String,
    pub projection: String,
    pub acquisition_date: Option<NaiveDate>,
    /// "HH:MM"
    pub survey_time: String,
}

impl SurveyInput {
    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name.as_str())
    }

    /// Acquisition date as sent to the GP service and webhook ("YYYY-MM-DD")
    pub fn acquisition_date_string(&self) -> Option<String> {
        self.acquisition_date
            .map(|d| d.format("%Y-%m-%d").to_string())
    }
}
