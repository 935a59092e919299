use std::path::{Component, Path};

use anyhow::Context;
use serde::Serialize;
use serde_json::{Map, Value};

use rpas_core::{
    parse_upload_item_id, AppError, ErrorMetadata, LoaderConfig, LogLevel, SurveyFile, SurveyType,
};
use rpas_infra::{FileUpload, NotifyError};

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the widget JSON config when a path is given, the environment otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LoaderConfig> {
    match path {
        Some(path) => LoaderConfig::from_json_file(path),
        None => LoaderConfig::from_env().context("Failed to load config from environment"),
    }
}

fn reject_parent_dir(path: &Path) -> anyhow::Result<()> {
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
    }
    Ok(())
}

fn file_name_of(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("Path has no file name: {}", path.display()))
}

/// Name and size of a local survey file. The content is not read.
pub fn survey_file_from_path(path: &Path) -> anyhow::Result<SurveyFile> {
    reject_parent_dir(path)?;
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    if !metadata.is_file() {
        return Err(anyhow::anyhow!("Not a file: {}", path.display()));
    }

    Ok(SurveyFile::new(file_name_of(path)?, metadata.len()))
}

pub fn read_file_upload(path: &Path) -> anyhow::Result<FileUpload> {
    reject_parent_dir(path)?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(FileUpload::new(file_name_of(path)?, bytes))
}

/// Survey file referenced by name only. Only imagery surveys may skip the
/// local file, elevation surveys need its size checked.
pub fn survey_file_from_name(survey_type: SurveyType, name: &str) -> anyhow::Result<SurveyFile> {
    if !survey_type.references_file_by_name() {
        return Err(AppError::InvalidInput(format!(
            "--file-name is only supported for {} surveys, use --file for {}",
            SurveyType::SmallProjectImagery,
            survey_type
        ))
        .into());
    }
    Ok(SurveyFile::named(name))
}

/// Item id from a saved GP upload response (`{"item": {"itemID": ...}}`).
pub fn item_id_from_upload_response(path: &Path) -> anyhow::Result<String> {
    reject_parent_dir(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read upload response: {}", path.display()))?;
    let response: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse upload response: {}", path.display()))?;
    Ok(parse_upload_item_id(&response)?)
}

/// Parse `key=value` pairs into upload metadata. Values are kept as text.
pub fn parse_metadata_pairs(pairs: &[String]) -> anyhow::Result<Map<String, Value>> {
    let mut metadata = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Metadata must be key=value, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow::anyhow!("Metadata key is empty in '{}'", pair));
        }
        metadata.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(metadata)
}

/// Failure as printed by the CLI
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    pub recoverable: bool,
    #[serde(skip)]
    pub level: LogLevel,
}

/// Report for the first typed error in the chain; anything else is internal.
pub fn error_report(err: &anyhow::Error) -> ErrorReport {
    let typed = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<NotifyError>()
            .map(|e| e as &dyn ErrorMetadata)
            .or_else(|| cause.downcast_ref::<AppError>().map(|e| e as &dyn ErrorMetadata))
    });

    match typed {
        Some(meta) => ErrorReport {
            code: meta.error_code(),
            message: meta.client_message(),
            recoverable: meta.is_recoverable(),
            level: meta.log_level(),
        },
        None => ErrorReport {
            code: "INTERNAL_ERROR",
            message: format!("{:#}", err),
            recoverable: false,
            level: LogLevel::Error,
        },
    }
}

pub fn log_error_report(report: &ErrorReport, err: &anyhow::Error) {
    let detail = format!("{:#}", err);
    match report.level {
        LogLevel::Debug => tracing::debug!(code = report.code, error = %detail, "Command failed"),
        LogLevel::Warn => tracing::warn!(code = report.code, error = %detail, "Command failed"),
        LogLevel::Error => tracing::error!(code = report.code, error = %detail, "Command failed"),
    }
}
