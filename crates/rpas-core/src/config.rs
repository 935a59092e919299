//! Configuration module
//!
//! Loader configuration mirrors the settings an administrator sets for the
//! submission widget: file rules, webhook target and GP services. It loads
//! from the environment or from the widget's JSON config. Loading a `.env`
//! file is left to the binary.

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::gp::GpUtility;
use crate::validation::{validate_webhook_url, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB};

const WEBHOOK_RETRY_COUNT: u32 = 3;
const WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Loader configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderConfig {
    /// Dot-prefixed suffixes. `None` means the default point-cloud set.
    pub allowed_extensions: Option<Vec<String>>,
    /// `None` or a non-positive value means the 500 MB default.
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: Option<f64>,
    pub webhook_url: Option<String>,
    pub webhook_retry_count: u32,
    pub webhook_timeout_seconds: u64,
    /// GP utility for RPAS and TLS Elevation
    #[serde(rename = "rpasGPUtility")]
    pub rpas_gp_utility: Vec<GpUtility>,
    /// GP utility for Small Project Imagery
    #[serde(rename = "smallProjectGPUtility")]
    pub small_project_gp_utility: Vec<GpUtility>,
    /// Admin-selected projections, label -> value
    pub selected_projections: BTreeMap<String, String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: None,
            max_file_size_mb: None,
            webhook_url: None,
            webhook_retry_count: WEBHOOK_RETRY_COUNT,
            webhook_timeout_seconds: WEBHOOK_TIMEOUT_SECS,
            rpas_gp_utility: Vec::new(),
            small_project_gp_utility: Vec::new(),
            selected_projections: BTreeMap::new(),
        }
    }
}

impl LoaderConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let allowed_extensions = env::var("RPAS_ALLOWED_EXTENSIONS")
            .ok()
            .map(|value| parse_allowed_extensions(&value));

        let max_file_size_mb = match env::var("RPAS_MAX_FILE_SIZE_MB") {
            Ok(value) => Some(parse_max_file_size_mb(&value).ok_or_else(|| {
                anyhow::anyhow!("RPAS_MAX_FILE_SIZE_MB must be a positive integer")
            })?),
            Err(_) => None,
        };

        let rpas_gp_utility = gp_utility_from_env("RPAS_GP_TASK_URL");
        let small_project_gp_utility = gp_utility_from_env("SMALL_PROJECT_GP_TASK_URL");

        let config = LoaderConfig {
            allowed_extensions,
            max_file_size_mb,
            webhook_url: env::var("RPAS_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            webhook_retry_count: env::var("RPAS_WEBHOOK_RETRY_COUNT")
                .unwrap_or_else(|_| WEBHOOK_RETRY_COUNT.to_string())
                .parse()
                .unwrap_or(WEBHOOK_RETRY_COUNT),
            webhook_timeout_seconds: env::var("RPAS_WEBHOOK_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| WEBHOOK_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(WEBHOOK_TIMEOUT_SECS),
            rpas_gp_utility,
            small_project_gp_utility,
            selected_projections: BTreeMap::new(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, anyhow::Error> {
        let config: LoaderConfig =
            serde_json::from_str(json).context("Failed to parse loader config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(max) = self.max_file_size_mb {
            if max < 0.0 || !max.is_finite() {
                return Err(anyhow::anyhow!(
                    "maxFileSizeMB must be a positive number, got {}",
                    max
                ));
            }
        }

        if let Some(url) = self.webhook_url.as_deref() {
            if !url.trim().is_empty() && !validate_webhook_url(url) {
                return Err(anyhow::anyhow!(
                    "Webhook URL must be a valid http(s) URL: {}",
                    url
                ));
            }
        }

        if self.webhook_retry_count == 0 {
            return Err(anyhow::anyhow!("Webhook retry count must be at least 1"));
        }

        for task_url in [self.rpas_gp_task_url(), self.small_project_gp_task_url()]
            .into_iter()
            .flatten()
        {
            if !task_url.contains("/GPServer") {
                return Err(anyhow::anyhow!(
                    "GP task URL must contain /GPServer: {}",
                    task_url
                ));
            }
        }

        Ok(())
    }

    /// Allowed extensions with the default applied
    pub fn allowed_extensions(&self) -> Vec<String> {
        self.allowed_extensions.clone().unwrap_or_else(|| {
            DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect()
        })
    }

    /// Size limit with the default applied (zero counts as unset)
    pub fn max_file_size_mb(&self) -> f64 {
        self.max_file_size_mb
            .filter(|mb| *mb > 0.0)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB)
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn rpas_gp_task_url(&self) -> Option<String> {
        self.rpas_gp_utility.first().and_then(GpUtility::resolve_task_url)
    }

    pub fn small_project_gp_task_url(&self) -> Option<String> {
        self.small_project_gp_utility
            .first()
            .and_then(GpUtility::resolve_task_url)
    }
}

fn gp_utility_from_env(key: &str) -> Vec<GpUtility> {
    env::var(key)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(|url| {
            vec![GpUtility {
                url: Some(url),
                task: None,
            }]
        })
        .unwrap_or_default()
}

/// Parse a comma-separated extension list as entered in the settings panel.
/// Entries are trimmed and empty entries dropped.
pub fn parse_allowed_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|ext| ext.trim())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_string())
        .collect()
}

/// Parse the max file size entered in the settings panel. Only positive
/// integers are accepted.
pub fn parse_max_file_size_mb(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|mb| *mb > 0)
        .map(f64::from)
}
