//! RPAS Data Loader CLI: validate survey submissions and send job
//! notifications.
//!
//! Configuration comes from `--config <widget json>` or from the RPAS_*
//! environment variables (a `.env` file is honoured).

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use rpas_cli::{
    error_report, init_tracing, item_id_from_upload_response, load_config, log_error_report,
    parse_metadata_pairs, read_file_upload, survey_file_from_name, survey_file_from_path,
};
use rpas_core::gp::upload_endpoint;
use rpas_core::{
    is_known_projection, projection_options, validate_project_name, validate_time,
    validate_webhook_url, GpJobParameters, LoaderConfig, SurveyInput, SurveyType,
    SurveyValidator, WebhookPayload,
};
use rpas_infra::{WebhookNotifier, WebhookNotifierConfig};

const INVALID_EXIT_CODE: i32 = 2;
const FAILURE_EXIT_CODE: i32 = 1;

#[derive(Parser)]
#[command(name = "rpas", about = "RPAS Data Loader CLI")]
struct Cli {
    /// Widget JSON config (defaults to environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SurveyArgs {
    /// Survey type: rpas, tls or imagery
    survey_type: SurveyType,
    /// Local survey file (name and size are checked)
    #[arg(long, conflicts_with = "file_name")]
    file: Option<PathBuf>,
    /// Reference the survey file by name only (imagery)
    #[arg(long)]
    file_name: Option<String>,
    #[arg(long, default_value = "")]
    project_name: String,
    #[arg(long, default_value = "")]
    projection: String,
    /// Acquisition date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Survey time (HH:MM)
    #[arg(long, default_value = "")]
    time: String,
}

impl SurveyArgs {
    fn to_input(&self) -> anyhow::Result<SurveyInput> {
        let file = match (&self.file, &self.file_name) {
            (Some(path), _) => Some(survey_file_from_path(path)?),
            (None, Some(name)) => Some(survey_file_from_name(self.survey_type, name)?),
            (None, None) => None,
        };

        Ok(SurveyInput {
            file,
            project_name: self.project_name.clone(),
            projection: self.projection.clone(),
            acquisition_date: self.date,
            survey_time: self.time.clone(),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a survey submission and print the result
    Validate {
        #[command(flatten)]
        survey: SurveyArgs,
    },
    /// Send a job notification to the webhook
    Notify {
        #[command(flatten)]
        survey: SurveyArgs,
        /// Output file path reported to the webhook
        #[arg(long)]
        output_file_path: Option<String>,
        /// GP job id reported to the webhook
        #[arg(long)]
        gp_job_id: Option<String>,
        /// Overrides the configured webhook URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Upload a file with metadata to the webhook as multipart form data
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Metadata field as key=value (repeatable)
        #[arg(long = "meta")]
        metadata: Vec<String>,
        /// Overrides the configured webhook URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Check webhook URL syntax
    CheckUrl { url: String },
    /// Check project name syntax (letters, digits, '-' and '_')
    CheckProjectName { name: String },
    /// Check a 24-hour HH:MM time
    CheckTime { time: String },
    /// List the projection options
    Projections,
    /// Print the GP job parameters and upload endpoint for a submission
    GpParams {
        #[command(flatten)]
        survey: SurveyArgs,
        /// Item id returned by the GP upload (elevation surveys)
        #[arg(long, conflicts_with = "upload_response")]
        item_id: Option<String>,
        /// Saved JSON response of the GP upload; the item id is read from it
        #[arg(long)]
        upload_response: Option<PathBuf>,
        /// Logged-in user (defaults to guest)
        #[arg(long, default_value = "")]
        user: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn print_check(valid: bool) -> anyhow::Result<()> {
    print_json(&serde_json::json!({ "valid": valid }))?;
    if !valid {
        std::process::exit(INVALID_EXIT_CODE);
    }
    Ok(())
}

fn webhook_target(config: &LoaderConfig, url: Option<String>) -> String {
    url.or_else(|| config.webhook_url().map(str::to_string))
        .unwrap_or_default()
}

fn gp_task_url(config: &LoaderConfig, survey_type: SurveyType) -> Option<String> {
    match survey_type {
        SurveyType::RpasElevation | SurveyType::TlsElevation => config.rpas_gp_task_url(),
        SurveyType::SmallProjectImagery => config.small_project_gp_task_url(),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let report = error_report(&err);
        log_error_report(&report, &err);
        match serde_json::to_string_pretty(&report) {
            Ok(out) => eprintln!("{}", out),
            Err(_) => eprintln!("{}: {}", report.code, report.message),
        }
        std::process::exit(FAILURE_EXIT_CODE);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Validate { survey } => {
            let config = load_config(cli.config.as_deref())?;
            let validator = SurveyValidator::from_config(&config);
            let input = survey.to_input()?;

            let result = if survey.file_name.is_some()
                && survey.survey_type == SurveyType::SmallProjectImagery
            {
                validator.validate_imagery_filename_inputs(&input)
            } else {
                validator.validate(survey.survey_type, &input)
            };

            if result.is_valid && !is_known_projection(&config, &input.projection) {
                tracing::warn!(
                    projection = %input.projection,
                    "Projection is not one of the configured options"
                );
            }

            print_json(&result)?;
            if !result.is_valid {
                std::process::exit(INVALID_EXIT_CODE);
            }
        }
        Commands::Notify {
            survey,
            output_file_path,
            gp_job_id,
            url,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let input = survey.to_input()?;
            let payload = WebhookPayload::for_job(
                survey.survey_type,
                &input,
                output_file_path.unwrap_or_default(),
                gp_job_id.unwrap_or_default(),
            );

            let notifier = WebhookNotifier::new(WebhookNotifierConfig::from(&config))?;
            let target = webhook_target(&config, url);
            notifier
                .send_json(&target, &payload, config.webhook_retry_count)
                .await?;
            print_json(&serde_json::json!({ "success": true, "payload": payload }))?;
        }
        Commands::Upload {
            file,
            metadata,
            url,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let metadata = parse_metadata_pairs(&metadata)?;
            let upload = read_file_upload(&file)?;

            let notifier = WebhookNotifier::new(WebhookNotifierConfig::from(&config))?;
            let target = webhook_target(&config, url);
            notifier
                .upload_file(&target, &upload, &metadata, config.webhook_retry_count)
                .await?;
            print_json(&serde_json::json!({
                "success": true,
                "fileName": upload.file_name,
                "fileSize": upload.bytes.len(),
            }))?;
        }
        Commands::CheckUrl { url } => print_check(validate_webhook_url(&url))?,
        Commands::CheckProjectName { name } => print_check(validate_project_name(&name))?,
        Commands::CheckTime { time } => print_check(validate_time(&time))?,
        Commands::Projections => {
            let config = load_config(cli.config.as_deref())?;
            print_json(&projection_options(&config))?;
        }
        Commands::GpParams {
            survey,
            item_id,
            upload_response,
            user,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let input = survey.to_input()?;
            let item_id = match upload_response {
                Some(path) => Some(item_id_from_upload_response(&path)?),
                None => item_id,
            };
            let params =
                GpJobParameters::for_survey(survey.survey_type, &input, item_id.as_deref(), &user)?;

            let task_url = gp_task_url(&config, survey.survey_type);
            let upload_url = match (&task_url, survey.survey_type.references_file_by_name()) {
                (Some(task_url), false) => Some(upload_endpoint(task_url)?),
                _ => None,
            };

            print_json(&serde_json::json!({
                "taskUrl": task_url,
                "uploadUrl": upload_url,
                "parameters": params,
            }))?;
        }
    }

    Ok(())
}
