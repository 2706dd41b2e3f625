use anyhow::{Context, Result};
use clap::Parser;

use super::commands::Cli;
use crate::config::{Config, ConfigLoader};
use crate::logging::setup_logging;
use crate::tracker::{resolve_execution, TraceOutcome, TraceSession, TraceSettings};
use lens_aws::AwsClients;
use lens_common::api::PipelineApi;
use lens_common::{error_message, info_message, success_message, warning_message, Colorize};

/// Exit code for failures of the tool itself, as opposed to a failed pipeline.
const TOOL_ERROR_EXIT_CODE: i32 = 2;

/// Parses the command line, traces the pipeline and returns the process exit code.
pub fn process_command() -> i32 {
    // NOTE: exits with clap's own code on parsing errors
    let cli = Cli::parse();

    match run(&cli) {
        Ok(outcome) => {
            report_outcome(&cli.name, &outcome);
            outcome.exit_code()
        }
        Err(err) => {
            error_message!("{err:#}");
            TOOL_ERROR_EXIT_CODE
        }
    }
}

fn run(cli: &Cli) -> Result<TraceOutcome> {
    let config = ConfigLoader::load(&cli.config_overrides())?;
    let _guard = setup_logging(cli.verbose, config.log_file.as_deref())?;
    tracing::debug!(sources = ?config.config_sources, "Configuration loaded");

    tokio::runtime::Runtime::new()
        .context("Failed to start the async runtime")?
        .block_on(run_trace(cli, &config))
}

async fn run_trace(cli: &Cli, config: &Config) -> Result<TraceOutcome> {
    let aws_init_type = config.aws_init_type();
    tracing::info!(%aws_init_type, region = ?config.aws_region, "Resolving AWS credentials");
    let clients = AwsClients::resolve(aws_init_type, config.aws_region.as_deref()).await?;

    let definition = clients
        .pipelines
        .get_pipeline(&cli.name)
        .await
        .with_context(|| format!("Failed to read the definition of pipeline {}", cli.name))?;
    let execution_id =
        resolve_execution(&clients.pipelines, &cli.name, &cli.execution_selector()).await?;

    info_message!("Starting to trace {} ...", cli.name);
    println!();

    let settings = TraceSettings {
        pipeline_name: cli.name.clone(),
        poll_interval: config.poll_interval(),
        follow: !cli.no_follow,
        log_group_prefix: config.log_group_prefix.clone(),
        resolve_build_logs_config: config.resolve_build_logs_config,
    };
    let mut session = TraceSession::new(
        &clients.pipelines,
        &clients.builds,
        &clients.logs,
        settings,
        std::io::stdout(),
    );
    session.run(&definition, &execution_id).await
}

/// Final console lines for a finished trace.
pub fn report_outcome(pipeline_name: &str, outcome: &TraceOutcome) {
    match outcome {
        TraceOutcome::Completed => {
            success_message!("🎂 {pipeline_name} has been completed successfully!");
        }
        TraceOutcome::Failed {
            stage,
            action,
            status,
            error_message,
            external_url,
        } => {
            error_message!("🚫 {pipeline_name} has been failed.");
            match action {
                Some(action) => {
                    error_message!("🚫 stage: {stage}, action: {action}, state: {status}");
                }
                None => {
                    error_message!("🚫 stage: {stage}, state: {status}");
                }
            }
            if let Some(message) = error_message {
                error_message!("🚫 {message}");
            }
            if let Some(url) = external_url {
                error_message!("🚫 {url}");
            }
        }
        TraceOutcome::WaitingForApproval { stage, action } => {
            warning_message!("🖐 {pipeline_name} is waiting for approval");
            warning_message!("🖐 stage: {stage}, action: {action}");
        }
        TraceOutcome::Running { stage, action } => match (stage, action) {
            (Some(stage), Some(action)) => {
                info_message!("{pipeline_name} is running stage: {stage}, action: {action}");
            }
            (Some(stage), None) => {
                info_message!("{pipeline_name} is entering stage: {stage}");
            }
            _ => {
                info_message!("{pipeline_name} is between stages");
            }
        },
    }
}
